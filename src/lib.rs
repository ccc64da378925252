//! HTML record harvester
//!
//! Extracts name/link/image records from arbitrary HTML:
//! - CSS selector extraction in AUTO, LINKS, IMAGES and TEXT modes
//! - Lazy-load and srcset aware image sources
//! - Image class frequency scanning to suggest selectors
//! - JSON-over-FFI interface for host applications

pub mod error;
pub mod extractors;
pub mod ffi;

pub use error::{HarvestError, Result};
pub use extractors::*;
pub use ffi::*;
