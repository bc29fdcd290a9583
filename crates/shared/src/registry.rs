//! Station id → map marker lookup and the single selected marker.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::models::StationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Default,
    Selected,
}

/// A handle to something drawn on the map for one station.
pub trait MarkerHandle: Clone {
    fn station_id(&self) -> StationId;

    /// Whether the handle can actually change its icon.
    fn is_marker(&self) -> bool;

    fn set_icon(&self, state: IconState);
}

/// At most one registered marker carries [`IconState::Selected`].
#[derive(Debug)]
pub struct MarkerRegistry<M> {
    entries: HashMap<StationId, M>,
    selected: Option<M>,
}

impl<M> Default for MarkerRegistry<M> {
    fn default() -> Self {
        MarkerRegistry {
            entries: HashMap::new(),
            selected: None,
        }
    }
}

impl<M: MarkerHandle> MarkerRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for the marker's station.
    pub fn register(&mut self, marker: M) {
        self.entries.insert(marker.station_id(), marker);
    }

    /// Forget every entry, then register `markers`. The selection is kept
    /// so it can be restored with [`MarkerRegistry::reselect`].
    pub fn replace_all(&mut self, markers: impl IntoIterator<Item = M>) {
        self.entries.clear();
        for marker in markers {
            self.register(marker);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: StationId) -> Option<&M> {
        let Some(marker) = self.entries.get(&id) else {
            debug!(%id, "no marker registered");
            return None;
        };
        if !marker.is_marker() {
            warn!(%id, "registered entry is not a valid marker");
            return None;
        }
        Some(marker)
    }

    /// Restore the previous selection's default icon and highlight `marker`.
    /// Returns false, leaving everything untouched, for a non-marker.
    pub fn select(&mut self, marker: &M) -> bool {
        if !marker.is_marker() {
            error!(id = %marker.station_id(), "invalid marker passed to select");
            return false;
        }
        if let Some(previous) = self.selected.take() {
            previous.set_icon(IconState::Default);
        }
        marker.set_icon(IconState::Selected);
        self.selected = Some(marker.clone());
        true
    }

    pub fn select_id(&mut self, id: StationId) -> bool {
        match self.find(id).cloned() {
            Some(marker) => self.select(&marker),
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            previous.set_icon(IconState::Default);
        }
    }

    pub fn selected_id(&self) -> Option<StationId> {
        self.selected.as_ref().map(MarkerHandle::station_id)
    }

    /// Re-apply the selection to the marker now registered under the
    /// previously selected id, e.g. after the layer was rebuilt.
    pub fn reselect(&mut self) -> bool {
        match self.selected_id() {
            Some(id) => self.select_id(id),
            None => false,
        }
    }
}
