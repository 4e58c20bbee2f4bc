/// Cut list: finalized segments queued for export.
use serde::{Deserialize, Serialize};

use crate::Seconds;

/// Minimum selection span that can become a cut.
pub const MIN_CUT_SECONDS: Seconds = 0.2;

/// Extension used for generated cut filenames.
pub const CUT_EXTENSION: &str = "mp3";

/// A finalized, named segment. Endpoints are fixed at creation; only the
/// filename is user-editable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    pub start_s: Seconds,
    pub end_s: Seconds,
    pub filename: String,

    /// Creation timestamp; not part of the export payload.
    #[serde(default)]
    pub created_at: i64,
}

impl Cut {
    fn new(start_s: Seconds, end_s: Seconds, filename: String) -> Self {
        Self {
            start_s,
            end_s,
            filename,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn duration(&self) -> Seconds {
        self.end_s - self.start_s
    }
}

/// Ordered collection of cuts. Insertion order is creation order, and the
/// index is positional: deleting shifts later entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutList {
    cuts: Vec<Cut>,
}

impl CutList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    pub fn get(&self, index: usize) -> Option<&Cut> {
        self.cuts.get(index)
    }

    /// Filename for the next cut: `cut_<NN>.<ext>` where `NN` is the current
    /// length plus one, padded to at least two digits. The index derives from
    /// the length at call time, so an insert after a deletion can reuse an
    /// earlier generated name.
    pub fn next_filename(&self) -> String {
        format!("cut_{:02}.{}", self.cuts.len() + 1, CUT_EXTENSION)
    }

    /// Append a cut with a generated filename and return a reference to it.
    pub fn push(&mut self, start_s: Seconds, end_s: Seconds) -> &Cut {
        let cut = Cut::new(start_s, end_s, self.next_filename());
        self.cuts.push(cut);
        self.cuts.last().expect("cut was just pushed")
    }

    /// Remove the most recently appended cut; no-op on an empty list.
    pub fn undo_last(&mut self) -> Option<Cut> {
        self.cuts.pop()
    }

    /// Remove the cut at `index` if in bounds; remaining cuts keep their
    /// filenames and shift position.
    pub fn delete_at(&mut self, index: usize) -> Option<Cut> {
        if index < self.cuts.len() {
            Some(self.cuts.remove(index))
        } else {
            None
        }
    }

    /// Overwrite the filename at `index`. No uniqueness or filesystem checks
    /// happen here; the export backend owns those.
    pub fn rename(&mut self, index: usize, filename: impl Into<String>) -> bool {
        match self.cuts.get_mut(index) {
            Some(cut) => {
                cut.filename = filename.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cuts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_padded_and_sequential() {
        let mut cuts = CutList::new();
        assert_eq!(cuts.push(0.0, 1.0).filename, "cut_01.mp3");
        assert_eq!(cuts.push(1.0, 2.0).filename, "cut_02.mp3");
        for i in 2..10 {
            cuts.push(i as f64, i as f64 + 1.0);
        }
        assert_eq!(cuts.cuts()[9].filename, "cut_10.mp3");
    }

    #[test]
    fn test_undo_removes_only_the_most_recent() {
        let mut cuts = CutList::new();
        cuts.push(0.0, 1.0);
        cuts.push(1.0, 2.0);
        cuts.push(2.0, 3.0);

        let removed = cuts.undo_last().unwrap();
        assert_eq!(removed.filename, "cut_03.mp3");
        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts.cuts()[0].filename, "cut_01.mp3");
        assert_eq!(cuts.cuts()[1].filename, "cut_02.mp3");
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut cuts = CutList::new();
        assert!(cuts.undo_last().is_none());
    }

    #[test]
    fn test_delete_at_keeps_names_and_shifts_positions() {
        let mut cuts = CutList::new();
        cuts.push(0.0, 1.0);
        cuts.push(1.0, 2.0);
        cuts.push(2.0, 3.0);

        let removed = cuts.delete_at(1).unwrap();
        assert_eq!(removed.filename, "cut_02.mp3");
        assert_eq!(cuts.len(), 2);
        // survivors are not renumbered
        assert_eq!(cuts.cuts()[0].filename, "cut_01.mp3");
        assert_eq!(cuts.cuts()[1].filename, "cut_03.mp3");
    }

    #[test]
    fn test_delete_out_of_bounds_is_noop() {
        let mut cuts = CutList::new();
        cuts.push(0.0, 1.0);
        assert!(cuts.delete_at(5).is_none());
        assert_eq!(cuts.len(), 1);
    }

    #[test]
    fn test_length_derived_index_can_collide_after_deletion() {
        let mut cuts = CutList::new();
        cuts.push(0.0, 1.0);
        cuts.push(1.0, 2.0);
        cuts.delete_at(0);

        // the next name derives from the current length, so it repeats an
        // earlier generated name
        let cut = cuts.push(2.0, 3.0);
        assert_eq!(cut.filename, "cut_02.mp3");
        assert_eq!(cuts.cuts()[0].filename, "cut_02.mp3");
    }

    #[test]
    fn test_rename_touches_only_the_target() {
        let mut cuts = CutList::new();
        cuts.push(0.0, 1.0);
        cuts.push(1.0, 2.0);

        assert!(cuts.rename(0, "intro.mp3"));
        assert_eq!(cuts.cuts()[0].filename, "intro.mp3");
        assert_eq!(cuts.cuts()[1].filename, "cut_02.mp3");

        assert!(!cuts.rename(7, "nope.mp3"));
    }
}
