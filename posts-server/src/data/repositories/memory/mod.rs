pub(crate) mod post_repository;
pub(crate) mod profile_repository;

pub(crate) use post_repository::InMemoryPostRepository;
pub(crate) use profile_repository::InMemoryProfileRepository;
