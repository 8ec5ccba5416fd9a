//! Directory events
//!
//! Background work (listing fetches) and state changes are reported to the
//! main loop as typed [`DirectoryEvent`]s over a tokio channel. The UI loop
//! drains them without blocking between frames.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::data::{BoundingBox, Business, CategoryFilter, ListingClient, RequestOptions};
use crate::pipeline::FilterCriteria;

/// Channel capacity before publishers start waiting
const CHANNEL_CAPACITY: usize = 32;

/// Messages delivered to the main loop
#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    /// A listing fetch has started
    LoadStarted,
    /// Listings arrived; `stale` marks an expired cached copy
    DataLoaded {
        businesses: Vec<Business>,
        stale: bool,
    },
    /// A listing fetch failed with nothing cached to fall back on
    LoadFailed(String),
    /// The user picked another category
    CategoryChanged(CategoryFilter),
    /// The attribute filters changed
    FiltersChanged(FilterCriteria),
    /// Distances were recomputed for a new user location
    DistancesUpdated,
}

/// Owns the event channel
pub struct EventBus {
    sender: mpsc::Sender<DirectoryEvent>,
    receiver: mpsc::Receiver<DirectoryEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self { sender, receiver }
    }

    /// A sender for publishing from other tasks or from the app state
    pub fn sender(&self) -> mpsc::Sender<DirectoryEvent> {
        self.sender.clone()
    }

    /// Publishes without waiting; the event is dropped if the channel is full
    pub fn publish(&self, event: DirectoryEvent) {
        publish(&self.sender, event);
    }

    /// Fetches listings on a background task
    ///
    /// Posts `LoadStarted`, then either `DataLoaded` or `LoadFailed`.
    ///
    /// # Arguments
    /// * `client` - Shared listing client
    /// * `bounds` - Area to load
    /// * `options` - Cache options (use [`RequestOptions::refresh`] for a manual refresh)
    pub fn spawn_load(
        &self,
        client: Arc<ListingClient>,
        bounds: BoundingBox,
        options: RequestOptions,
    ) -> JoinHandle<()> {
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let _ = tx.send(DirectoryEvent::LoadStarted).await;

            let event = match client.fetch_businesses(&bounds, options).await {
                Ok(fetched) => DirectoryEvent::DataLoaded {
                    businesses: fetched.data,
                    stale: fetched.stale,
                },
                Err(e) => DirectoryEvent::LoadFailed(e.to_string()),
            };

            if tx.send(event).await.is_err() {
                debug!("Event receiver dropped before load finished");
            }
        })
    }

    /// Returns the next pending event, if any
    pub fn try_recv(&mut self) -> Option<DirectoryEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next event
    pub async fn recv(&mut self) -> Option<DirectoryEvent> {
        self.receiver.recv().await
    }
}

/// Publishes on a sender without waiting
pub fn publish(sender: &mpsc::Sender<DirectoryEvent>, event: DirectoryEvent) {
    if let Err(e) = sender.try_send(event) {
        warn!(error = %e, "Dropped directory event");
    }
}
