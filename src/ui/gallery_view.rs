//! Mirrors gallery controller events into the grid.
//!
//! Thumbnails are decoded per row as the grid reports rows coming into view,
//! and released again once they scroll far enough away.

use crate::ui::image_display::{GalleryRenderer, load_thumbnail, show_route};
use async_std::channel::Receiver;
use log::{debug, info};
use media_gallery::ResourceIdentifier;
use media_gallery::config::THUMBNAIL_RESIDENT_ROWS;
use media_gallery::gallery::{GalleryEvent, ThumbnailWindow};
use media_gallery::navigation::{Router, StartupRoute};
use media_gallery::render::RenderOptions;
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

/// Everything the grid needs besides the window itself.
pub struct GridContext {
    pub renderer: GalleryRenderer,
    pub thumbnail_options: RenderOptions,
    pub router: Rc<RefCell<Router>>,
    pub columns: usize,
}

/// Listens for controller events until the channel closes or the window is gone.
///
/// `startup_route` is entered once the first image list has been shown, so a
/// viewer route resolves against a scanned index and never skips authorization.
pub fn attach(
    ui: &crate::AppWindow,
    events: Receiver<GalleryEvent>,
    context: GridContext,
    mut startup_route: StartupRoute,
) {
    let window = Rc::new(RefCell::new(ThumbnailWindow::new(
        context.columns,
        THUMBNAIL_RESIDENT_ROWS,
    )));

    // Row reported by the grid
    ui.global::<crate::Logic>().on_row_shown({
        let ui_handle = ui.as_weak();
        let window = window.clone();
        let renderer = context.renderer.clone();
        let options = context.thumbnail_options;
        move |row| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let Ok(row) = usize::try_from(row) else {
                return;
            };
            let update = window.borrow_mut().show_row(row);
            for range in update.release {
                release_thumbnails(&ui, range);
            }
            let items = ui.global::<crate::GalleryState>().get_items();
            for index in update.load {
                let Some(item) = items.row_data(index) else {
                    continue;
                };
                match ResourceIdentifier::parse(item.id.as_str()) {
                    Ok(id) => load_thumbnail(ui.as_weak(), index, id, renderer.clone(), options),
                    Err(e) => debug!("Skipping thumbnail for {}: {}", item.id, e),
                }
            }
        }
    });

    if startup_route.is_pending() {
        debug!("Holding startup route until images are loaded");
    }

    let ui_handle = ui.as_weak();
    let _ = slint::spawn_local(async move {
        while let Ok(event) = events.recv().await {
            let Some(ui) = ui_handle.upgrade() else {
                break;
            };
            match &event {
                GalleryEvent::PhaseChanged(phase) => crate::ui::set_phase(&ui, *phase),
                GalleryEvent::ImagesLoaded(identifiers) => {
                    window.borrow_mut().reset(identifiers.len());
                    show_images(&ui, identifiers, context.thumbnail_options);
                }
            }
            if let Some(path) = startup_route.on_event(&event) {
                info!("Entering startup route {}", path);
                let route = context.router.borrow_mut().navigate_path(&path).clone();
                show_route(&ui, &route, &context.renderer);
            }
        }
        debug!("Gallery event stream closed");
    });
}

/// Replaces the grid with `identifiers`. Thumbnails load as rows are shown.
fn show_images(ui: &crate::AppWindow, identifiers: &[ResourceIdentifier], options: RenderOptions) {
    let items: Vec<crate::GalleryItem> = identifiers
        .iter()
        .map(|id| crate::GalleryItem {
            id: id.as_str().into(),
            thumbnail: slint::Image::default(),
            loaded: false,
        })
        .collect();

    let gallery_state = ui.global::<crate::GalleryState>();
    gallery_state.set_fade_duration(if options.crossfade { 200 } else { 0 });
    gallery_state.set_items(ModelRc::new(VecModel::from(items)));
}

/// Drops decoded thumbnails for `range`; the renderer's cache keeps recent ones.
fn release_thumbnails(ui: &crate::AppWindow, range: Range<usize>) {
    let items = ui.global::<crate::GalleryState>().get_items();
    for index in range {
        let Some(mut item) = items.row_data(index) else {
            continue;
        };
        if !item.loaded {
            continue;
        }
        item.thumbnail = slint::Image::default();
        item.loaded = false;
        items.set_row_data(index, item);
    }
}
