//! Helper functions to set related UI state properties in one place.

use log::error;
use media_gallery::gallery::Phase;
use slint::ComponentHandle;

/// Mirrors the controller phase into GalleryState.
pub fn set_phase(ui: &crate::AppWindow, phase: Phase) {
    let phase = match phase {
        Phase::Uninitialized => crate::GalleryPhase::Uninitialized,
        Phase::Requesting => crate::GalleryPhase::Requesting,
        Phase::Authorized => crate::GalleryPhase::Authorized,
        Phase::Unauthorized => crate::GalleryPhase::Unauthorized,
    };
    ui.global::<crate::GalleryState>().set_phase(phase);
}

/// Sets all viewer properties at once.
///
/// Groups: open, current-id, image-loaded, not-found
pub fn set_viewer_info(
    ui: &crate::AppWindow,
    open: bool,
    current_id: &str,
    image_loaded: bool,
    not_found: bool,
) {
    let viewer_state = ui.global::<crate::ViewerState>();
    viewer_state.set_open(open);
    viewer_state.set_current_id(current_id.into());
    viewer_state.set_image_loaded(image_loaded);
    viewer_state.set_not_found(not_found);
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the GalleryState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::GalleryState>()
        .set_error_message(error_message.into());
}
