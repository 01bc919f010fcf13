//! Controller for the address form.

use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{FormError, FormMachine, FormStep};
use crate::{AppState, Navigator, PlaceStore, PlacesService, Route, SearchGeneration};

/// Delay between the last keystroke and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(750);

/// Queries shorter than this clear the results instead of searching.
pub const MIN_QUERY_CHARS: usize = 2;

/// Address entry settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryConfig {
    /// Quiet period before a search is sent.
    pub debounce: Duration,
    /// Position searches are biased towards.
    pub origin: Option<Coord<f64>>,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            origin: None,
        }
    }
}

struct PendingSearch {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives a [`FormMachine`] from text input and result selection.
///
/// Search results land in the store's `places`; selections move into its
/// route list. Every text change starts a new search generation, so results
/// of an older search are never shown.
pub struct AddressEntry {
    store: PlaceStore,
    places: Arc<dyn PlacesService>,
    state: watch::Receiver<AppState>,
    config: EntryConfig,
    form: FormMachine,
    pending: Option<PendingSearch>,
}

impl std::fmt::Debug for AddressEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressEntry")
            .field("config", &self.config)
            .field("form", &self.form)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl AddressEntry {
    /// Create a form at [`FormStep::First`].
    ///
    /// `state` gates selection: no stop can be added while a route is being
    /// navigated.
    #[must_use]
    pub fn new(
        store: PlaceStore,
        places: Arc<dyn PlacesService>,
        state: watch::Receiver<AppState>,
        config: EntryConfig,
    ) -> Self {
        Self {
            store,
            places,
            state,
            config,
            form: FormMachine::default(),
            pending: None,
        }
    }

    /// Current form state.
    #[must_use]
    pub const fn form(&self) -> &FormMachine {
        &self.form
    }

    /// Bias later searches towards `origin`.
    pub const fn set_origin(&mut self, origin: Coord<f64>) {
        self.config.origin = Some(origin);
    }

    /// React to the text field changing.
    ///
    /// Short input clears the results. Longer input clears them and
    /// schedules a search after the debounce period; further input before
    /// then cancels it. Returns the search generation the results will be
    /// published under, or `None` when no search was scheduled.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn on_text_changed(&mut self, text: &str) -> Option<SearchGeneration> {
        if !self.form.text_entry_enabled() {
            debug!("text entry disabled at {:?}; ignoring input", self.form.step());
            return None;
        }
        self.cancel_pending();
        let generation = self.store.clear_places();
        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        let token = CancellationToken::new();
        let task = tokio::spawn(debounced_search(
            self.store.clone(),
            Arc::clone(&self.places),
            self.config,
            query.to_owned(),
            generation,
            token.clone(),
        ));
        self.pending = Some(PendingSearch { token, task });
        Some(generation)
    }

    /// Wait for the scheduled search, if any, and for its results to land.
    pub async fn wait_for_results(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Err(err) = pending.task.await {
                warn!("search task failed: {err}");
            }
        }
        self.store.settle().await;
    }

    /// Move result `index` into the route list and advance the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EntryComplete`] at [`FormStep::Done`],
    /// [`FormError::RouteActive`] while navigating and
    /// [`FormError::UnknownResult`] when `index` is out of range.
    pub async fn select(&mut self, index: usize) -> Result<FormStep, FormError> {
        if self.form.step() == FormStep::Done {
            return Err(FormError::EntryComplete);
        }
        if !self.state.borrow().accepts_new_route() {
            return Err(FormError::RouteActive);
        }
        let place = self
            .store
            .places()
            .await
            .into_iter()
            .nth(index)
            .ok_or(FormError::UnknownResult { index })?;

        self.cancel_pending();
        debug!("selected {:?} for {:?}", place.name, self.form.step());
        self.store.push_route_stop(place);
        self.store.clear_places();
        let step = self.form.advance();
        self.store.settle().await;
        Ok(step)
    }

    /// Rows to display: result names while collecting, numbered stops once
    /// every address is in.
    pub async fn rows(&self) -> Vec<String> {
        if self.form.step() == FormStep::Done {
            self.store
                .route_list()
                .await
                .iter()
                .zip(1_usize..)
                .map(|(place, n)| format!("{n}) {}", place.name))
                .collect()
        } else {
            self.store
                .places()
                .await
                .into_iter()
                .map(|place| place.name)
                .collect()
        }
    }

    /// Drop every place and stop and return to [`FormStep::First`].
    pub async fn reset(&mut self) {
        self.cancel_pending();
        self.store.remove_all_data();
        self.form.reset();
        self.store.settle().await;
    }

    /// Build the route through the collected stops.
    ///
    /// On success the results are cleared and the form returns to
    /// [`FormStep::First`]; the active route is left alone. On failure the
    /// form stays at [`FormStep::Done`].
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotReady`] before [`FormStep::Done`] and
    /// [`FormError::Build`] when the route cannot be built.
    pub async fn start(&mut self, navigator: &Navigator) -> Result<Route, FormError> {
        let step = self.form.step();
        if step != FormStep::Done {
            return Err(FormError::NotReady { step });
        }
        let route = navigator.start_route().await?;
        self.cancel_pending();
        self.store.clear_places();
        self.form.reset();
        self.store.settle().await;
        Ok(route)
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}

impl Drop for AddressEntry {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

async fn debounced_search(
    store: PlaceStore,
    places: Arc<dyn PlacesService>,
    config: EntryConfig,
    query: String,
    generation: SearchGeneration,
    token: CancellationToken,
) {
    tokio::select! {
        () = token.cancelled() => {
            debug!("search for {query:?} superseded before sending");
            return;
        }
        () = tokio::time::sleep(config.debounce) => {}
    }
    let results = match places.search(config.origin, &query).await {
        Ok(results) => results,
        Err(err) => {
            warn!("search for {query:?} failed: {err}");
            Vec::new()
        }
    };
    debug!("search for {query:?} returned {} places", results.len());
    store.publish_search_results(generation, results);
}
