//! Server-side error definitions

pub mod error;

pub use error::{ApiError, ApiResult};
