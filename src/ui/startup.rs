//! Startup wiring: the one-shot gallery mount and an optional initial route.

use crate::ui::authorization::PromptAuthorizer;
use log::info;
use media_gallery::gallery::GalleryController;
use media_gallery::media_index::DirectoryIndex;
use media_gallery::navigation::StartupRoute;
use std::sync::Arc;

const ROUTE_FLAG: &str = "--route=";

/// Returns the value of `--route=<path>`, if given.
fn startup_route_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .find_map(|arg| arg.strip_prefix(ROUTE_FLAG).map(str::to_string))
}

/// The `--route=` argument, e.g. `--route=image/<encoded id>`, held until the
/// gallery has loaded its images.
pub fn startup_route() -> StartupRoute {
    let path = startup_route_from_args(std::env::args().skip(1));
    if let Some(path) = &path {
        info!("Startup route requested: {}", path);
    }
    StartupRoute::new(path)
}

/// Mounts the gallery on the UI event loop.
///
/// The controller moves into the spawned future, so nothing else can touch
/// its state; the UI only sees the events it publishes.
pub fn mount_gallery(
    mut controller: GalleryController<PromptAuthorizer, Arc<DirectoryIndex>>,
) -> Result<(), slint::EventLoopError> {
    slint::spawn_local(async move {
        let phase = controller.mount().await;
        info!("Gallery mounted in phase {:?}", phase);
    })?;
    Ok(())
}
