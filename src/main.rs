// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod ui;

use media_gallery::config::{
    IMAGES_COLLECTION_ADDRESS, THUMBNAIL_CACHE_MAX_BYTES, UserSettings, VIEWER_CACHE_MAX_BYTES,
};
use media_gallery::gallery::GalleryController;
use media_gallery::media_index::{DirectoryIndex, MediaIndexGateway};
use media_gallery::navigation::Router;
use media_gallery::permission::{CapabilityTable, PermissionGate};
use media_gallery::render::{ImageCache, RenderOptions, Renderer};
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let settings_path = UserSettings::settings_path();
    let mut settings = UserSettings::load(&settings_path);
    settings.apply_args(std::env::args_os().skip(1));

    let library_dir = settings.resolved_library_dir();
    let capability = CapabilityTable::images().resolve(settings.platform_version);
    log::info!("Library {:?}, capability {}", library_dir, capability);

    let index = Arc::new(DirectoryIndex::new(&library_dir, IMAGES_COLLECTION_ADDRESS));
    let renderer = Renderer::new(
        index.clone(),
        ImageCache::new(settings.thumbnail_cache_capacity, THUMBNAIL_CACHE_MAX_BYTES),
        ImageCache::new(settings.viewer_cache_capacity, VIEWER_CACHE_MAX_BYTES),
    );
    let router = Rc::new(RefCell::new(Router::new()));

    let app = AppWindow::new()?;
    let columns = settings.grid_columns.max(1);
    app.global::<GalleryState>().set_columns(columns as i32);

    let authorizer = ui::authorization::PromptAuthorizer::new(library_dir, settings_path, &settings);
    let gate = PermissionGate::new(authorizer, capability);
    let mut controller = GalleryController::new(gate, MediaIndexGateway::new(index));

    ui::gallery_view::attach(
        &app,
        controller.subscribe(),
        ui::gallery_view::GridContext {
            renderer: renderer.clone(),
            thumbnail_options: RenderOptions::thumbnail(settings.thumbnail_size),
            router: router.clone(),
            columns: columns as usize,
        },
        ui::startup::startup_route(),
    );
    ui::setup_handlers(&app, router, renderer);
    ui::startup::mount_gallery(controller)?;

    app.run()?;

    Ok(())
}
