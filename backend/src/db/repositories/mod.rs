//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON-lines file implementation for single-node deployments
pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;
