//! Core functionality for cyberthum

pub mod downloader;
pub mod progress;
pub mod queue;
pub mod state;
pub mod thumbnail;

pub use downloader::*;
pub use progress::*;
pub use queue::*;
pub use state::*;
pub use thumbnail::*;
