/// Bidirectional sync between the abstract selection and the externally
/// rendered draggable region.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Seconds, Selection};

/// Synthetic region width while only the start mark exists, so the overlay
/// always has something renderable.
pub const REGION_EPSILON: Seconds = 0.01;

/// Handle for a region owned by the overlay component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RegionId(pub Uuid);

impl RegionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Region bounds pushed to or pulled from the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub start: Seconds,
    pub end: Seconds,
}

/// A `region-updated` notification from the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionUpdate {
    pub id: RegionId,
    pub bounds: RegionBounds,
}

/// Contract of the region-overlay component.
///
/// Overlays commonly report `region-updated` for programmatic mutations as
/// well as user drags; pending notifications are drained with
/// [`take_updates`](RegionOverlay::take_updates) so the sync layer can
/// decide what they mean.
pub trait RegionOverlay {
    fn add_region(&mut self, bounds: RegionBounds) -> RegionId;
    fn update_region(&mut self, id: RegionId, bounds: RegionBounds);
    fn remove_region(&mut self, id: RegionId);

    /// Drain notifications accumulated since the last call.
    fn take_updates(&mut self) -> Vec<RegionUpdate>;
}

/// Keeps at most one mirrored region consistent with the selection.
///
/// Selection and region are two representations of the same fact; the
/// suppression window around a push is what stops them from driving each
/// other in a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionSync {
    region: Option<RegionId>,
    suppressed: bool,
}

impl RegionSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the currently mirrored region, if any.
    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Push selection state out to the overlay.
    ///
    /// An empty selection removes the region; a partial one renders as a
    /// sliver of `REGION_EPSILON` width. Echo notifications raised by the
    /// overlay during the mutation are drained and ignored inside the
    /// suppression window.
    pub fn push<O: RegionOverlay>(
        &mut self,
        overlay: &mut O,
        selection: &mut Selection,
        duration: Option<Seconds>,
    ) {
        self.suppressed = true;

        match selection.start() {
            None => {
                if let Some(id) = self.region.take() {
                    overlay.remove_region(id);
                }
            }
            Some(sel_start) => {
                let start = sel_start.max(0.0);
                let mut end = match (selection.end(), duration) {
                    (Some(e), Some(d)) => e.min(d),
                    (Some(e), None) => e,
                    (None, _) => start + REGION_EPSILON,
                };
                if end <= start {
                    end = start + REGION_EPSILON;
                }

                let bounds = RegionBounds { start, end };
                match self.region {
                    Some(id) => overlay.update_region(id, bounds),
                    None => self.region = Some(overlay.add_region(bounds)),
                }
            }
        }

        // Anything the overlay reported while we were mutating it is an
        // echo of this push, not a user drag.
        for update in overlay.take_updates() {
            self.pull(selection, update);
        }

        self.suppressed = false;
    }

    /// Pull region bounds back into the selection after a direct
    /// manipulation. Returns whether the selection was written.
    ///
    /// Ignored while a push is in flight, and for notifications about a
    /// region this sync does not mirror.
    pub fn pull(&mut self, selection: &mut Selection, update: RegionUpdate) -> bool {
        if self.suppressed {
            return false;
        }
        if self.region != Some(update.id) {
            return false;
        }

        selection.set_start(update.bounds.start);
        selection.set_end(update.bounds.end);
        true
    }
}
