//! Shared HTTP types

pub mod error;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
