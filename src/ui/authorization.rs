//! Desktop authorization: grants remembered in the settings file, requested
//! through a native yes/no dialog.
//!
//! Whether the library folder can actually be read is the media index's
//! concern, not this one: an unreadable folder is an empty grid, not a denial.

use log::{info, warn};
use media_gallery::config::UserSettings;
use media_gallery::permission::{Authorization, Authorizer, Capability};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct PromptAuthorizer {
    library_dir: PathBuf,
    settings_path: PathBuf,
    granted: RefCell<HashSet<String>>,
}

impl PromptAuthorizer {
    pub fn new(library_dir: PathBuf, settings_path: PathBuf, settings: &UserSettings) -> Self {
        Self {
            library_dir,
            settings_path,
            granted: RefCell::new(settings.granted_capabilities.iter().cloned().collect()),
        }
    }

    /// Adds the grant to the settings file on disk. The file is re-read so
    /// command-line overrides are not written back.
    fn persist_grant(&self, capability: &Capability) {
        let mut stored = UserSettings::load(&self.settings_path);
        if stored.record_grant(capability.name()) {
            if let Err(e) = stored.save(&self.settings_path) {
                warn!("Failed to remember grant for {}: {}", capability, e);
            }
        }
    }
}

impl Authorizer for PromptAuthorizer {
    fn current_status(&self, capability: &Capability) -> Authorization {
        if self.granted.borrow().contains(capability.name()) {
            Authorization::Granted
        } else {
            Authorization::Denied
        }
    }

    async fn request(&self, capability: &Capability) -> Authorization {
        // ネイティブダイアログはメインスレッド専用。spawn_local経由で呼ぶこと。
        let answer = AsyncMessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Allow access to photos?")
            .set_description(format!(
                "Media Gallery needs the \"{}\" permission to show the images in {}.",
                capability,
                self.library_dir.display()
            ))
            .set_buttons(MessageButtons::YesNo)
            .show()
            .await;

        if !matches!(answer, MessageDialogResult::Yes) {
            return Authorization::Denied;
        }

        info!("User granted {}", capability);
        self.granted
            .borrow_mut()
            .insert(capability.name().to_string());
        self.persist_grant(capability);
        Authorization::Granted
    }
}
