//! Static map images for the printable report.
//!
//! The document surface cannot embed an interactive map, so it asks the
//! provider for a raster of the route instead.

mod client;

pub use client::{StaticMapClient, StaticMapConfig, StaticMapError};
