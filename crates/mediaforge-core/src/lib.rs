//! Mediaforge core library
//!
//! Shared types for the conversion pipeline: the error taxonomy, runtime
//! configuration, and the format registry.

pub mod config;
pub mod error;
pub mod formats;

pub use config::ConverterConfig;
pub use error::{ConvertError, Result};
pub use formats::FormatClass;
