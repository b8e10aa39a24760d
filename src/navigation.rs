//! Navigation between the thumbnail grid and the full-screen viewer.

use crate::gallery::{GalleryEvent, Phase};
use crate::identifier::ResourceIdentifier;
use log::{debug, info};

const GRID_PATH: &str = "gallery";
const VIEWER_PREFIX: &str = "image/";

/// A logical screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Initial route: the thumbnail grid.
    Grid,
    /// Full-screen viewer; holds the percent-encoded identifier.
    Viewer(String),
}

/// What the viewer should show for its route parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerContent {
    Image(ResourceIdentifier),
    NotFound,
}

impl Route {
    /// Parses `gallery` or `image/{imageUri}`.
    pub fn parse(path: &str) -> Option<Self> {
        if path == GRID_PATH {
            return Some(Route::Grid);
        }
        path.strip_prefix(VIEWER_PREFIX)
            .map(|param| Route::Viewer(param.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Grid => GRID_PATH.to_string(),
            Route::Viewer(param) => format!("{}{}", VIEWER_PREFIX, param),
        }
    }

    /// Decodes the viewer parameter. Anything unusable is `NotFound`.
    pub fn viewer_content(&self) -> ViewerContent {
        let Route::Viewer(param) = self else {
            return ViewerContent::NotFound;
        };
        match ResourceIdentifier::decode(param) {
            Ok(id) => ViewerContent::Image(id),
            Err(e) => {
                debug!("Viewer parameter {:?} rejected: {}", param, e);
                ViewerContent::NotFound
            }
        }
    }
}

/// Back stack of routes. The grid at the bottom is never popped.
#[derive(Debug, Clone)]
pub struct Router {
    stack: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Grid],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack always holds at least the grid.
        self.stack.last().unwrap_or(&Route::Grid)
    }

    /// Opens the viewer for `id`.
    pub fn open(&mut self, id: &ResourceIdentifier) -> &Route {
        self.push(Route::Viewer(id.encode()))
    }

    /// Navigates to a raw route path. Unknown paths are ignored.
    pub fn navigate_path(&mut self, path: &str) -> &Route {
        match Route::parse(path) {
            Some(Route::Grid) => {
                self.stack.truncate(1);
                self.current()
            }
            Some(route) => self.push(route),
            None => {
                debug!("Ignoring unknown route {:?}", path);
                self.current()
            }
        }
    }

    /// Pops the current route. Returns false if already on the grid.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        let popped = self.stack.pop();
        debug!("Navigated back from {:?}", popped);
        true
    }

    fn push(&mut self, route: Route) -> &Route {
        debug!("Navigating to {}", route.path());
        self.stack.push(route);
        self.current()
    }
}

/// A route requested at launch, held until the gallery can resolve it.
///
/// Viewer identifiers only resolve once the media index has been read, and
/// that only happens after authorization. The route is released with the
/// first image list and dropped if authorization is refused.
#[derive(Debug, Default)]
pub struct StartupRoute {
    path: Option<String>,
}

impl StartupRoute {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }

    pub fn is_pending(&self) -> bool {
        self.path.is_some()
    }

    /// Feeds one controller event. Returns the path to enter, at most once.
    pub fn on_event(&mut self, event: &GalleryEvent) -> Option<String> {
        match event {
            GalleryEvent::ImagesLoaded(_) => self.path.take(),
            GalleryEvent::PhaseChanged(Phase::Unauthorized) => {
                if let Some(path) = self.path.take() {
                    info!("Dropping startup route {}: not authorized", path);
                }
                None
            }
            GalleryEvent::PhaseChanged(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ResourceIdentifier {
        ResourceIdentifier::with_appended_id("content://media/external/images/media", n)
    }

    #[test]
    fn starts_on_the_grid() {
        let router = Router::new();
        assert_eq!(router.current(), &Route::Grid);
        assert_eq!(router.current().path(), "gallery");
    }

    #[test]
    fn open_then_back_returns_to_grid() {
        let mut router = Router::new();
        let route = router.open(&id(2)).clone();

        assert_eq!(
            route.path(),
            "image/content%3A%2F%2Fmedia%2Fexternal%2Fimages%2Fmedia%2F2"
        );
        assert_eq!(route.viewer_content(), ViewerContent::Image(id(2)));

        assert!(router.back());
        assert_eq!(router.current(), &Route::Grid);
        assert!(!router.back());
        assert_eq!(router.stack.len(), 1);
    }

    #[test]
    fn paths_parse_back_to_routes() {
        assert_eq!(Route::parse("gallery"), Some(Route::Grid));
        assert_eq!(
            Route::parse("image/abc"),
            Some(Route::Viewer("abc".to_string()))
        );
        assert_eq!(Route::parse("settings"), None);

        let viewer = Route::Viewer(id(5).encode());
        assert_eq!(Route::parse(&viewer.path()), Some(viewer));
    }

    #[test]
    fn undecodable_parameter_is_not_found() {
        let mut router = Router::new();
        let route = router.navigate_path("image/%FF%FE").clone();
        assert_eq!(route.viewer_content(), ViewerContent::NotFound);

        let empty = router.navigate_path("image/").clone();
        assert_eq!(empty.viewer_content(), ViewerContent::NotFound);

        assert_eq!(Route::Grid.viewer_content(), ViewerContent::NotFound);
    }

    #[test]
    fn navigating_to_grid_clears_the_stack() {
        let mut router = Router::new();
        router.open(&id(1));
        router.open(&id(2));
        assert_eq!(router.stack.len(), 3);

        router.navigate_path("gallery");
        assert_eq!(router.stack.len(), 1);
    }

    #[test]
    fn unknown_path_keeps_current_route() {
        let mut router = Router::new();
        router.open(&id(1));
        let current = router.navigate_path("nowhere").clone();
        assert_eq!(current, Route::Viewer(id(1).encode()));
    }

    #[test]
    fn startup_route_waits_for_images() {
        let mut pending = StartupRoute::new(Some("image/abc".to_string()));

        assert_eq!(pending.on_event(&GalleryEvent::PhaseChanged(Phase::Requesting)), None);
        assert_eq!(pending.on_event(&GalleryEvent::PhaseChanged(Phase::Authorized)), None);
        assert!(pending.is_pending());

        assert_eq!(
            pending.on_event(&GalleryEvent::ImagesLoaded(vec![id(1)])),
            Some("image/abc".to_string())
        );
        assert_eq!(pending.on_event(&GalleryEvent::ImagesLoaded(vec![id(1)])), None);
    }

    #[test]
    fn startup_route_is_dropped_when_unauthorized() {
        let mut pending = StartupRoute::new(Some("image/abc".to_string()));

        assert_eq!(pending.on_event(&GalleryEvent::PhaseChanged(Phase::Unauthorized)), None);
        assert!(!pending.is_pending());
        assert_eq!(pending.on_event(&GalleryEvent::ImagesLoaded(Vec::new())), None);
    }
}
