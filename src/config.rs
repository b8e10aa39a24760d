//! Application configuration constants and persisted user settings.

use crate::error::Result;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported image file extensions for the directory-backed media index.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Base address of the images collection; record ids are appended to it.
pub const IMAGES_COLLECTION_ADDRESS: &str = "content://media/external/images/media";

/// First platform version with a dedicated image-read capability.
pub const MEDIA_IMAGES_CAPABILITY_SINCE: u32 = 33;

pub const DEFAULT_PLATFORM_VERSION: u32 = 34;
pub const DEFAULT_GRID_COLUMNS: u32 = 4;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 150;
pub const DEFAULT_THUMBNAIL_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_VIEWER_CACHE_CAPACITY: usize = 4;

/// Byte budgets for decoded pixels held in memory.
pub const THUMBNAIL_CACHE_MAX_BYTES: usize = 64 * 1024 * 1024;
pub const VIEWER_CACHE_MAX_BYTES: usize = 256 * 1024 * 1024;

/// Grid rows kept decoded on either side of the last row shown.
pub const THUMBNAIL_RESIDENT_ROWS: usize = 24;

const SETTINGS_DIR_NAME: &str = "MediaGallery";
const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// User settings that persist across app sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Root of the image library. Defaults to the platform pictures folder.
    #[serde(default)]
    pub library_dir: Option<PathBuf>,

    /// Platform version used to pick the read capability.
    #[serde(default = "default_platform_version")]
    pub platform_version: u32,

    #[serde(default = "default_grid_columns")]
    pub grid_columns: u32,

    /// Thumbnail edge length in pixels.
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    #[serde(default = "default_thumbnail_cache_capacity")]
    pub thumbnail_cache_capacity: usize,

    /// Full-screen renditions kept in memory.
    #[serde(default = "default_viewer_cache_capacity")]
    pub viewer_cache_capacity: usize,

    /// Capabilities the user has already granted.
    #[serde(default)]
    pub granted_capabilities: Vec<String>,
}

fn default_platform_version() -> u32 {
    DEFAULT_PLATFORM_VERSION
}

fn default_grid_columns() -> u32 {
    DEFAULT_GRID_COLUMNS
}

fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}

fn default_thumbnail_cache_capacity() -> usize {
    DEFAULT_THUMBNAIL_CACHE_CAPACITY
}

fn default_viewer_cache_capacity() -> usize {
    DEFAULT_VIEWER_CACHE_CAPACITY
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            library_dir: None,
            platform_version: DEFAULT_PLATFORM_VERSION,
            grid_columns: DEFAULT_GRID_COLUMNS,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_cache_capacity: DEFAULT_THUMBNAIL_CACHE_CAPACITY,
            viewer_cache_capacity: DEFAULT_VIEWER_CACHE_CAPACITY,
            granted_capabilities: Vec::new(),
        }
    }
}

impl UserSettings {
    /// Get the path to the settings file
    /// On macOS: ~/Library/Application Support/MediaGallery/settings.yaml
    /// On Linux: ~/.config/MediaGallery/settings.yaml
    /// On Windows: C:\Users\<user>\AppData\Roaming\MediaGallery\settings.yaml
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME)
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("Settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str::<UserSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    debug!("Settings: {:?}", settings);
                    settings
                }
                Err(e) => {
                    error!("Failed to parse settings file at {:?}: {}", path, e);
                    warn!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read settings file at {:?}: {}", path, e);
                warn!("Using default settings");
                Self::default()
            }
        }
    }

    /// Writes the settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Library root: configured dir, else the pictures folder, else home.
    pub fn resolved_library_dir(&self) -> PathBuf {
        self.library_dir
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn is_granted(&self, capability: &str) -> bool {
        self.granted_capabilities.iter().any(|c| c == capability)
    }

    /// Records a grant. Returns `false` if it was already recorded.
    pub fn record_grant(&mut self, capability: &str) -> bool {
        if self.is_granted(capability) {
            return false;
        }
        self.granted_capabilities.push(capability.to_string());
        true
    }

    /// Applies command-line overrides: the first non-flag argument is the library dir.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        let library_dir = args
            .into_iter()
            .map(Into::into)
            .find(|path: &PathBuf| !path.to_string_lossy().starts_with('-'));

        if let Some(dir) = library_dir {
            info!("Library directory from arguments: {:?}", dir);
            self.library_dir = Some(dir);
        }
    }
}
