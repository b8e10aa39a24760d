//! Gallery controller: gates the media index behind authorization and owns the
//! resulting identifier snapshot.
//!
//! State changes are published as [`GalleryEvent`]s to every subscriber, so the
//! UI never reads the controller's state directly.

use crate::identifier::ResourceIdentifier;
use crate::media_index::{MediaIndex, MediaIndexGateway};
use crate::permission::{Authorization, Authorizer, PermissionGate};
use async_std::channel::{self, Receiver, Sender};
use log::{debug, info};
use std::sync::Arc;

pub mod state;
pub mod thumbnails;

pub use state::{GalleryEvent, GalleryState, Phase};
pub use thumbnails::{RowUpdate, ThumbnailWindow};

/// Sends `event` to every live subscriber and forgets the closed ones.
fn broadcast(subscribers: &mut Vec<Sender<GalleryEvent>>, event: GalleryEvent) {
    subscribers.retain(|tx| tx.try_send(event.clone()).is_ok());
}

pub struct GalleryController<A, I> {
    gate: PermissionGate<A>,
    gateway: Arc<MediaIndexGateway<I>>,
    phase: Phase,
    state: GalleryState,
    started: bool,
    subscribers: Vec<Sender<GalleryEvent>>,
}

impl<A, I> GalleryController<A, I>
where
    A: Authorizer,
    I: MediaIndex + Send + Sync + 'static,
{
    pub fn new(gate: PermissionGate<A>, gateway: MediaIndexGateway<I>) -> Self {
        Self {
            gate,
            gateway: Arc::new(gateway),
            phase: Phase::Uninitialized,
            state: GalleryState::default(),
            started: false,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new observer of state transitions.
    pub fn subscribe(&mut self) -> Receiver<GalleryEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Runs the mount flow once: authorize, then fetch the index snapshot.
    ///
    /// Later calls return the current phase without doing anything.
    pub async fn mount(&mut self) -> Phase {
        if self.started {
            debug!("Gallery already mounted, phase {:?}", self.phase);
            return self.phase;
        }
        self.started = true;

        let phase = &mut self.phase;
        let subscribers = &mut self.subscribers;
        let outcome = self
            .gate
            .check_and_request(|| {
                debug!("Gallery phase {:?} -> Requesting", phase);
                *phase = Phase::Requesting;
                broadcast(subscribers, GalleryEvent::PhaseChanged(Phase::Requesting));
            })
            .await;

        match outcome {
            Authorization::Granted => self.authorize().await,
            Authorization::Denied => self.enter(Phase::Unauthorized),
        }

        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Gallery phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        broadcast(&mut self.subscribers, GalleryEvent::PhaseChanged(phase));
    }

    /// The only path to the media index.
    async fn authorize(&mut self) {
        self.state.grant();
        self.enter(Phase::Authorized);

        let gateway = self.gateway.clone();
        let identifiers: Vec<ResourceIdentifier> =
            async_std::task::spawn_blocking(move || gateway.list_images()).await;

        info!("Loaded {} images from the media index", identifiers.len());
        self.state.store(identifiers.clone());
        broadcast(
            &mut self.subscribers,
            GalleryEvent::ImagesLoaded(identifiers),
        );
    }
}
