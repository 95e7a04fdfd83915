//! CLI library components for statement mapping review.

pub mod logging;
pub mod render;
pub mod review;
pub mod settings;
