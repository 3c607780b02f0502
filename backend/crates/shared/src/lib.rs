//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Error classification and the unified [`error::app_error::AppError`]
//! - Typed identifiers for domain entities
//!
//! Only things with the same meaning in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
