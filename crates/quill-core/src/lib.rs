//! # Quill Core
//!
//! The domain layer of the Quill blog engine.
//! Entity types, the content renderer, the read-time estimator and the
//! repository ports live here, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod readtime;
pub mod render;

pub use error::RepoError;
