pub(crate) mod post_repository;
pub(crate) mod profile_repository;

use crate::domain::error::DomainError;

pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Store(err.to_string())
}
