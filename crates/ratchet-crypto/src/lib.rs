//! Versioned password hashing.
//!
//! Stored hashes carry their own format: tagged strings (`PBKDF2v1…`, `SSHA1Xv1…`) or
//! raw legacy hex digests. [`format::classify`] recognises the format, and the
//! [`Dispatcher`] routes verification to the matching algorithm and decides whether a
//! stored hash should be re-hashed with the current PBKDF2 parameters.

pub mod algorithm;
pub mod config;
pub mod digest;
pub mod dispatch;
pub mod eq;
pub mod error;
pub mod format;
pub mod kdf;
pub mod salt;

pub use algorithm::Algorithm;
pub use dispatch::{AlgorithmSelector, Dispatcher};
pub use error::Error;
pub use format::{classify, Classification, EncodedHash, Variant};
