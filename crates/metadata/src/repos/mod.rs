//! Repository traits for metadata operations.

pub mod images;
pub mod repositories;
pub mod tags;
pub mod tokens;
pub mod users;

pub use images::ImageRepo;
pub use repositories::RepositoryRepo;
pub use tags::TagRepo;
pub use tokens::TokenRepo;
pub use users::UserRepo;
