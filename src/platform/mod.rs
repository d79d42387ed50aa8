//! Thumbnail host client and availability probing

pub mod client;
pub mod probe;

pub use client::*;
pub use probe::*;
