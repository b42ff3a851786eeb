//! glyphcam library crate.
//!
//! Converts camera frames and still images into glyph grids. The pieces,
//! leaves first:
//!
//! - [`ascii`] - glyph ramps, block reduction and glyph-grid rendering
//! - [`camera`] - the frame source contract and concrete sources
//! - [`still`] - still-image decoding for uploads
//! - [`coordinator`] - capture thread and latest-snapshot slot
//! - [`session`] - the live/frozen/uploaded state machine
//! - [`config`] - TOML configuration

pub mod ascii;
pub mod camera;
pub mod config;
pub mod coordinator;
pub mod session;
pub mod still;
