//! Utility functions for cyberthum

pub mod filename;
pub mod url;

pub use filename::*;
pub use self::url::*;
