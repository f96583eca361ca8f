//! Database adapter
//!
//! Classifies `sqlx` errors, or any driver error implementing
//! [`VendorError`], into error records by SQLSTATE code. The
//! driver error always becomes the record's cause.

pub mod adapter;
pub mod vendor;

pub use adapter::*;
pub use vendor::*;
