//! Object store adapters
//!
//! - [`S3ObjectStore`] — production artifact storage, one adapter per
//!   bucket
//! - [`LocalObjectStore`] — directory-backed store for tests and
//!   offline runs

mod local;
mod s3;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;
