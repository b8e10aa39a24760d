//! Permission gating for reading the media index.
//!
//! The capability name depends on the platform version and is resolved once at
//! startup through [`CapabilityTable`]. [`PermissionGate`] then checks it and
//! prompts at most once per gate.

use crate::config::MEDIA_IMAGES_CAPABILITY_SINCE;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::fmt;
use std::future::Future;
use std::ops::Range;

pub const MEDIA_IMAGES_READ: &str = "media.images.read";
pub const EXTERNAL_STORAGE_READ: &str = "storage.external.read";

/// A named authorization a process must hold to read a protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability(String);

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of an authorization check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

impl Authorization {
    pub fn is_granted(self) -> bool {
        self == Authorization::Granted
    }
}

/// Maps platform version ranges to the capability that guards image reads.
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    entries: Vec<(Range<u32>, &'static str)>,
}

static DEFAULT_TABLE: Lazy<CapabilityTable> = Lazy::new(|| {
    CapabilityTable::new(vec![
        (0..MEDIA_IMAGES_CAPABILITY_SINCE, EXTERNAL_STORAGE_READ),
        (MEDIA_IMAGES_CAPABILITY_SINCE..u32::MAX, MEDIA_IMAGES_READ),
    ])
});

impl CapabilityTable {
    /// Creates a table from `(version range, capability name)` entries.
    /// Entries are matched in order.
    pub fn new(entries: Vec<(Range<u32>, &'static str)>) -> Self {
        Self { entries }
    }

    /// Built-in table for image reads.
    pub fn images() -> &'static CapabilityTable {
        &DEFAULT_TABLE
    }

    /// Resolves the capability for `version`. Versions no entry covers use the
    /// last entry.
    pub fn resolve(&self, version: u32) -> Capability {
        let name = self
            .entries
            .iter()
            .find(|(range, _)| range.contains(&version))
            .or_else(|| self.entries.last())
            .map(|(_, name)| *name)
            .unwrap_or(MEDIA_IMAGES_READ);

        debug!("Platform version {} resolves to capability {}", version, name);
        Capability::new(name)
    }
}

/// Ambient authorization subsystem.
pub trait Authorizer {
    /// Current authorization for `capability`, without prompting.
    fn current_status(&self, capability: &Capability) -> Authorization;

    /// Asks the user for `capability` and resolves once they answer.
    fn request(&self, capability: &Capability) -> impl Future<Output = Authorization>;
}

/// Checks the read capability and prompts for it at most once.
pub struct PermissionGate<A> {
    authorizer: A,
    capability: Capability,
    prompted: bool,
}

impl<A: Authorizer> PermissionGate<A> {
    pub fn new(authorizer: A, capability: Capability) -> Self {
        Self {
            authorizer,
            capability,
            prompted: false,
        }
    }

    /// Synchronously reads the current authorization.
    pub fn status(&self) -> Authorization {
        self.authorizer.current_status(&self.capability)
    }

    /// Yields `Granted` straight away if already authorized. Otherwise calls
    /// `on_prompt` and issues a single interactive request.
    ///
    /// After the first prompt the gate never prompts again; later calls only
    /// re-read the current status.
    pub async fn check_and_request(&mut self, on_prompt: impl FnOnce()) -> Authorization {
        if self.status().is_granted() {
            debug!("Capability {} already granted", self.capability);
            return Authorization::Granted;
        }

        if self.prompted {
            debug!("Capability {} was already requested once", self.capability);
            return Authorization::Denied;
        }

        self.prompted = true;
        on_prompt();

        let outcome = self.authorizer.request(&self.capability).await;
        info!("Authorization for {}: {:?}", self.capability, outcome);
        outcome
    }
}
