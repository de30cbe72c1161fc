//! Shared domain — host capabilities, используемые несколькими доменами
//!
//! - Viewport mapping (Viewport, OrthographicViewport, ActiveViewport)

pub mod viewport;

pub use viewport::*;
