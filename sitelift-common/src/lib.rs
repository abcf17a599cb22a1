//! # sitelift Common Library
//!
//! Shared code for the sitelift services including:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Conversion progress event types
//! - NDJSON streaming responses
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod ndjson;
pub mod time;

pub use error::{Error, Result};
pub use events::{ConversionEvent, ConversionStage};
