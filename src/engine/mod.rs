//! Order sizing and order submission.

pub mod executor;
pub mod sizer;
