//! Event handlers for UI callbacks.
//!
//! Sets up the Logic callbacks (open_image, back). Both only touch the router
//! and the viewer; the grid model is left as it is.

use crate::ui::image_display::{GalleryRenderer, show_route};
use media_gallery::ResourceIdentifier;
use media_gallery::navigation::Router;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, router: Rc<RefCell<Router>>, renderer: GalleryRenderer) {
    // Thumbnail tap
    ui.global::<crate::Logic>().on_open_image({
        let ui_handle = ui.as_weak();
        let router = router.clone();
        let renderer = renderer.clone();
        move |raw_id| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let id = match ResourceIdentifier::parse(raw_id.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    crate::ui::set_error_with_prefix(&ui, "Cannot open image", e.to_string());
                    return;
                }
            };

            let route = router.borrow_mut().open(&id).clone();
            show_route(&ui, &route, &renderer);
        }
    });

    // Tap on the viewer
    ui.global::<crate::Logic>().on_back({
        let ui_handle = ui.as_weak();
        move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let route = {
                let mut router = router.borrow_mut();
                router.back();
                router.current().clone()
            };
            show_route(&ui, &route, &renderer);
        }
    });
}
