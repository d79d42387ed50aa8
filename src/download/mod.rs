//! Download system for cyberthum

pub mod downloader;
pub mod sink;

pub use downloader::*;
pub use sink::*;
