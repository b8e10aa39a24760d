//! Gallery state owned by the controller.

use crate::identifier::ResourceIdentifier;
use log::warn;

/// Lifecycle of the gallery screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    /// Waiting for the user to answer the authorization prompt.
    Requesting,
    Authorized,
    /// Terminal until the screen is mounted again.
    Unauthorized,
}

/// Observable state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    PhaseChanged(Phase),
    /// Snapshot of the index, newest first.
    ImagesLoaded(Vec<ResourceIdentifier>),
}

/// Authorization flag plus the identifier snapshot.
///
/// Identifiers are only ever stored once permission is granted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    permission_granted: bool,
    identifiers: Vec<ResourceIdentifier>,
}

impl GalleryState {
    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        &self.identifiers
    }

    pub(crate) fn grant(&mut self) {
        self.permission_granted = true;
    }

    /// Replaces the snapshot. Ignored while permission is not granted.
    pub(crate) fn store(&mut self, identifiers: Vec<ResourceIdentifier>) {
        if !self.permission_granted {
            warn!(
                "Dropping {} identifiers fetched without permission",
                identifiers.len()
            );
            return;
        }
        self.identifiers = identifiers;
    }
}
