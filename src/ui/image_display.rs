//! Image decoding and display for the grid and the viewer.
//!
//! Uses `rayon::spawn` for decoding, then `slint::invoke_from_event_loop` to
//! update UI from the background thread.

use log::{debug, error, warn};
use media_gallery::ResourceIdentifier;
use media_gallery::media_index::DirectoryIndex;
use media_gallery::navigation::{Route, ViewerContent};
use media_gallery::render::{DecodedImage, PixelLayout, RenderOptions, Renderer};
use slint::{ComponentHandle, Image, Model, Rgb8Pixel, Rgba8Pixel, SharedPixelBuffer};

pub type GalleryRenderer = Renderer<DirectoryIndex>;

/// Wraps decoded pixels in a Slint image.
pub fn create_slint_image(decoded: DecodedImage) -> Image {
    match decoded.layout {
        PixelLayout::Rgb8 => Image::from_rgb8(SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(
            &decoded.data,
            decoded.width,
            decoded.height,
        )),
        PixelLayout::Rgba8 => Image::from_rgba8(SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
            &decoded.data,
            decoded.width,
            decoded.height,
        )),
    }
}

/// Decodes one grid thumbnail and drops it into row `row` of the items model.
pub fn load_thumbnail(
    ui: slint::Weak<crate::AppWindow>,
    row: usize,
    id: ResourceIdentifier,
    renderer: GalleryRenderer,
    options: RenderOptions,
) {
    rayon::spawn(move || {
        let result = renderer.render(&id, &options);

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            match result {
                Ok(decoded) => {
                    let items = ui.global::<crate::GalleryState>().get_items();
                    let Some(mut item) = items.row_data(row) else {
                        return;
                    };
                    if item.id.as_str() != id.as_str() {
                        debug!("Grid changed before thumbnail for {} arrived", id);
                        return;
                    }
                    item.thumbnail = create_slint_image(decoded);
                    item.loaded = true;
                    items.set_row_data(row, item);
                }
                Err(e) => warn!("Failed to load thumbnail for {}: {}", id, e),
            }
        });
    });
}

/// Shows `route`: hides the viewer for the grid, or loads the viewer image.
pub fn show_route(ui: &crate::AppWindow, route: &Route, renderer: &GalleryRenderer) {
    match route {
        Route::Grid => crate::ui::set_viewer_info(ui, false, "", false, false),
        Route::Viewer(_) => match route.viewer_content() {
            ViewerContent::NotFound => crate::ui::set_viewer_info(ui, true, "", false, true),
            ViewerContent::Image(id) => {
                crate::ui::set_viewer_info(ui, true, id.as_str(), false, false);
                load_and_display_image(ui.as_weak(), id, renderer.clone());
            }
        },
    }
}

/// Loads the full-screen rendition of `id` in a background thread.
///
/// The result is dropped if the viewer has moved on to another image (or
/// closed) by the time decoding finishes.
fn load_and_display_image(
    ui: slint::Weak<crate::AppWindow>,
    id: ResourceIdentifier,
    renderer: GalleryRenderer,
) {
    rayon::spawn(move || {
        let result = renderer.render(&id, &RenderOptions::full_screen());

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            let viewer_state = ui.global::<crate::ViewerState>();
            if !viewer_state.get_open() || viewer_state.get_current_id().as_str() != id.as_str() {
                debug!("Viewer moved on before {} finished loading", id);
                return;
            }
            match result {
                Ok(decoded) => {
                    viewer_state.set_image(create_slint_image(decoded));
                    viewer_state.set_image_loaded(true);
                }
                Err(e) => {
                    error!("Failed to load {}: {}", id, e);
                    viewer_state.set_not_found(true);
                }
            }
        });
    });
}
