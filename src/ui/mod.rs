//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: gallery mount and the authorization dialog (must stay on the main thread)
//! - `async_std::task::spawn_blocking`: the media index scan, awaited by the mount future
//! - `rayon::spawn`: image decoding
//! - `slint::invoke_from_event_loop`: returning decoded images from rayon to the UI thread

pub mod authorization;
pub mod gallery_view;
pub mod handlers;
pub mod image_display;
pub mod startup;
mod state_helpers;

pub use handlers::setup_handlers;
pub use state_helpers::*;
