//! Photo gallery core: permission-gated media enumeration, grid/viewer
//! navigation and image rendering.
//!
//! The Slint front end in `main.rs` wires these pieces to the window.

pub mod config;
pub mod error;
pub mod gallery;
pub mod identifier;
pub mod media_index;
pub mod navigation;
pub mod permission;
pub mod render;

pub use error::{GalleryError, Result};
pub use identifier::ResourceIdentifier;
