//! Repository trait definitions for peak window persistence.
//!
//! The registry keeps its working copy in memory; a repository is only the
//! durable backing for it. The contract is deliberately small:
//!
//! - [`PeakWindowRepository::load_all`] once at start-up
//! - [`PeakWindowRepository::replace_all`] on every registration
//!
//! ```ignore
//! async fn restore<R: PeakWindowRepository + ?Sized>(repo: &R) -> RepositoryResult<usize> {
//!     let records = repo.load_all().await?;
//!     Ok(records.len())
//! }
//! ```

pub mod error;
pub mod peak_windows;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use peak_windows::PeakWindowRepository;
