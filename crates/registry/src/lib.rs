//! Registry core for dockyard.
//!
//! The components here coordinate a docker v1 push across many independent
//! requests and serve the pull side once a push is complete:
//! - [`RegistrationService`] records a repository's declared manifest and
//!   issues a repository-scoped write token
//! - [`TagService`] points tag names at head images
//! - [`UploadCompletionVerifier`] is the all-or-nothing completion gate
//! - [`AncestryResolver`] builds the deduplicated pull manifest and tag map
//!
//! Every component takes the metadata store in its constructor; mutating
//! components share a [`RepositoryLocks`] table.

pub mod ancestry;
pub mod completion;
pub mod error;
pub mod locks;
pub mod registration;
pub mod tagging;
pub mod visibility;

pub use ancestry::AncestryResolver;
pub use completion::{CompletionSummary, UploadCompletionVerifier};
pub use error::{RegistryError, RegistryResult};
pub use locks::RepositoryLocks;
pub use registration::{Registrant, Registration, RegistrationService};
pub use tagging::TagService;
pub use visibility::is_pull_visible;
