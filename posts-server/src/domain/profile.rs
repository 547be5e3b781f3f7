use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user profile. Only its existence matters to post interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Profile {
    pub(crate) id: Uuid,
    pub(crate) user: Uuid,
    pub(crate) handle: String,
}
