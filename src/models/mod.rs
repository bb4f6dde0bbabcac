//! Data models

pub mod reading;
pub mod prediction;

pub use reading::*;
pub use prediction::*;
