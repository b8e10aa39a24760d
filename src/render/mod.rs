//! Turns resource identifiers into decoded pixels.
//!
//! [`RenderOptions`] carries the per-request policy (size, scaling, caching).
//! [`Renderer`] resolves an identifier to a file, decodes it and keeps
//! recently used results in memory when the options allow it.

use crate::error::{GalleryError, Result};
use crate::identifier::ResourceIdentifier;
use log::debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub mod image_cache;
pub mod loader;

pub use image_cache::ImageCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Cover the target box, cropping the overflow.
    Fill,
    /// Fit inside the target box.
    Fit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb8,
    Rgba8,
}

/// Per-request rendering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Decode target in pixels, `None` for native size.
    pub target_size: Option<(u32, u32)>,
    pub scale_mode: ScaleMode,
    /// Fade the image in once it is ready.
    pub crossfade: bool,
    pub hardware_accel: bool,
    /// Allow dropping the alpha channel to save memory.
    pub allow_low_color_fallback: bool,
    pub disk_cache: bool,
    pub memory_cache: bool,
    pub network_cache: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_size: None,
            scale_mode: ScaleMode::Fit,
            crossfade: false,
            hardware_accel: true,
            allow_low_color_fallback: false,
            disk_cache: true,
            memory_cache: true,
            network_cache: true,
        }
    }
}

impl RenderOptions {
    /// Square grid thumbnail of `size` pixels.
    pub fn thumbnail(size: u32) -> Self {
        Self {
            target_size: Some((size, size)),
            scale_mode: ScaleMode::Fill,
            crossfade: true,
            hardware_accel: false,
            allow_low_color_fallback: true,
            disk_cache: false,
            memory_cache: true,
            network_cache: true,
        }
    }

    /// Full-screen viewer rendition.
    pub fn full_screen() -> Self {
        Self {
            scale_mode: ScaleMode::Fit,
            ..Self::default()
        }
    }
}

/// Decoded pixel data ready to hand to the UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
}

/// Maps resource identifiers to local files.
pub trait ResourceResolver {
    fn resolve(&self, id: &ResourceIdentifier) -> Option<PathBuf>;
}

/// Resolves, decodes and caches images. Cheap to clone; clones share the caches.
///
/// Sized renditions (thumbnails) and native-size renditions (the viewer) are
/// cached separately, so a few large photos cannot push out the grid.
pub struct Renderer<R> {
    resolver: Arc<R>,
    thumbnails: Arc<Mutex<ImageCache>>,
    full_size: Arc<Mutex<ImageCache>>,
}

impl<R> Clone for Renderer<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            thumbnails: self.thumbnails.clone(),
            full_size: self.full_size.clone(),
        }
    }
}

impl<R: ResourceResolver> Renderer<R> {
    pub fn new(resolver: Arc<R>, thumbnails: ImageCache, full_size: ImageCache) -> Self {
        Self {
            resolver,
            thumbnails: Arc::new(Mutex::new(thumbnails)),
            full_size: Arc::new(Mutex::new(full_size)),
        }
    }

    fn cache_for(&self, options: &RenderOptions) -> &Mutex<ImageCache> {
        if options.target_size.is_some() {
            &self.thumbnails
        } else {
            &self.full_size
        }
    }

    /// Produces pixels for `id` under `options`.
    ///
    /// Blocking; call from a worker thread.
    pub fn render(&self, id: &ResourceIdentifier, options: &RenderOptions) -> Result<DecodedImage> {
        let key = (id.clone(), options.target_size);
        let cache = self.cache_for(options);

        if options.memory_cache {
            if let Some(hit) = cache.lock().ok().and_then(|mut c| c.get(&key)) {
                return Ok(hit);
            }
        }
        if options.disk_cache || options.network_cache {
            debug!("No disk or network cache for local images; decoding {}", id);
        }

        let path = self
            .resolver
            .resolve(id)
            .ok_or_else(|| GalleryError::ImageLoad(format!("no file for {}", id)))?;

        let decoded = loader::load_image_blocking(&path, options)?;

        if options.memory_cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key, decoded.clone());
            }
        }

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::collections::HashMap;

    struct MapResolver(HashMap<ResourceIdentifier, PathBuf>);

    impl ResourceResolver for MapResolver {
        fn resolve(&self, id: &ResourceIdentifier) -> Option<PathBuf> {
            self.0.get(id).cloned()
        }
    }

    fn fixture() -> (tempfile::TempDir, ResourceIdentifier, Renderer<MapResolver>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([1, 2, 3])))
            .save(&path)
            .unwrap();

        let id = ResourceIdentifier::with_appended_id("content://media/external/images/media", 7);
        let resolver = MapResolver(HashMap::from([(id.clone(), path)]));
        let renderer = Renderer::new(
            Arc::new(resolver),
            ImageCache::new(8, usize::MAX),
            ImageCache::new(1, usize::MAX),
        );
        (dir, id, renderer)
    }

    fn cached(cache: &Mutex<ImageCache>, id: &ResourceIdentifier, options: &RenderOptions) -> bool {
        cache
            .lock()
            .unwrap()
            .contains(&(id.clone(), options.target_size))
    }

    #[test]
    fn thumbnail_policy_matches_grid_needs() {
        let options = RenderOptions::thumbnail(150);
        assert_eq!(options.target_size, Some((150, 150)));
        assert_eq!(options.scale_mode, ScaleMode::Fill);
        assert!(options.crossfade);
        assert!(!options.hardware_accel);
        assert!(options.allow_low_color_fallback);
        assert!(!options.disk_cache);
        assert!(options.memory_cache);
        assert!(options.network_cache);
    }

    #[test]
    fn full_screen_fits_at_native_size() {
        let options = RenderOptions::full_screen();
        assert_eq!(options.target_size, None);
        assert_eq!(options.scale_mode, ScaleMode::Fit);
    }

    #[test]
    fn memory_cache_is_filled_on_first_render() {
        let (_dir, id, renderer) = fixture();
        let options = RenderOptions::thumbnail(150);

        assert!(!cached(&renderer.thumbnails, &id, &options));
        let first = renderer.render(&id, &options).unwrap();
        assert!(cached(&renderer.thumbnails, &id, &options));
        assert_eq!(renderer.render(&id, &options).unwrap(), first);
    }

    #[test]
    fn full_size_renditions_use_their_own_cache() {
        let (dir, id, _) = fixture();
        let other_path = dir.path().join("other.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([9, 9, 9])))
            .save(&other_path)
            .unwrap();
        let other = ResourceIdentifier::with_appended_id("content://media/external/images/media", 8);
        let resolver = MapResolver(HashMap::from([
            (id.clone(), dir.path().join("photo.png")),
            (other.clone(), other_path),
        ]));
        let renderer = Renderer::new(
            Arc::new(resolver),
            ImageCache::new(8, usize::MAX),
            ImageCache::new(1, usize::MAX),
        );
        let thumb = RenderOptions::thumbnail(16);
        let full = RenderOptions::full_screen();

        renderer.render(&id, &thumb).unwrap();
        renderer.render(&other, &thumb).unwrap();
        renderer.render(&id, &full).unwrap();
        renderer.render(&other, &full).unwrap();

        // The single viewer slot turned over; the thumbnails did not move.
        assert!(!cached(&renderer.full_size, &id, &full));
        assert!(cached(&renderer.full_size, &other, &full));
        assert!(cached(&renderer.thumbnails, &id, &thumb));
        assert!(cached(&renderer.thumbnails, &other, &thumb));
        assert!(!cached(&renderer.thumbnails, &id, &full));
    }

    #[test]
    fn memory_cache_off_skips_the_cache() {
        let (_dir, id, renderer) = fixture();
        let options = RenderOptions {
            memory_cache: false,
            ..RenderOptions::full_screen()
        };

        renderer.render(&id, &options).unwrap();
        assert!(!cached(&renderer.full_size, &id, &options));
    }

    #[test]
    fn unknown_identifier_is_a_load_error() {
        let (_dir, _id, renderer) = fixture();
        let stranger = ResourceIdentifier::with_appended_id("content://media", 1);

        let result = renderer.render(&stranger, &RenderOptions::full_screen());
        assert!(matches!(result, Err(GalleryError::ImageLoad(_))));
    }
}
