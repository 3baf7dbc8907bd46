//! API Error Module
//!
//! Error types returned by handlers and their conversion to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - ApiError, FieldError and conversions from lower layers
//! └── conversion.rs - IntoResponse implementation and the error body
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use conversion::ErrorBody;
pub use types::{ApiError, FieldError};
