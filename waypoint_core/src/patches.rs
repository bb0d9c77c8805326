//! Manual turn-signal fixes.
//!
//! Hand-picked row ranges whose turn-signal label is overwritten after the
//! waypoint pass: missed or late blinker readings, and stretches that must be
//! skipped (sensor occlusion, maneuvers unsuitable for training). The list is
//! data, kept verbatim in `config/manual_patches.json`.

use crate::turn_signal::TurnLabel;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

const BUILTIN_PATCHES: &str = include_str!("../../config/manual_patches.json");

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Malformed patch list: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `start` after `end`
    #[error("Patch {position} for {dataset} has an inverted range {start}..{end}")]
    InvertedRange {
        position: usize,
        dataset: String,
        start: usize,
        end: usize,
    },
}

/// One positional, half-open row range and the label written into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPatch {
    pub dataset: String,
    pub start: usize,
    pub end: usize,
    pub label: TurnLabel,
}

impl ManualPatch {
    /// Row range clamped to a column of `len` rows.
    pub fn rows(&self, len: usize) -> Range<usize> {
        let end = self.end.min(len);
        self.start.min(end)..end
    }

    /// Overwrites the range, clamped to the column length. Returns rows written.
    pub fn apply(&self, labels: &mut [Option<TurnLabel>]) -> usize {
        let rows = self.rows(labels.len());
        labels[rows.clone()].fill(Some(self.label));
        rows.len()
    }
}

/// Ordered list of patches; later entries win where ranges overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchList {
    pub patches: Vec<ManualPatch>,
}

impl PatchList {
    pub fn new(patches: Vec<ManualPatch>) -> Result<Self, PatchError> {
        let list = Self { patches };
        list.validate()?;
        Ok(list)
    }

    pub fn from_json(json: &str) -> Result<Self, PatchError> {
        let list: PatchList = serde_json::from_str(json)?;
        list.validate()?;
        Ok(list)
    }

    /// The fixes shipped with the crate.
    pub fn builtin() -> Result<Self, PatchError> {
        Self::from_json(BUILTIN_PATCHES)
    }

    fn validate(&self) -> Result<(), PatchError> {
        for (position, patch) in self.patches.iter().enumerate() {
            if patch.start > patch.end {
                return Err(PatchError::InvertedRange {
                    position,
                    dataset: patch.dataset.clone(),
                    start: patch.start,
                    end: patch.end,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patches of one dataset, in list order.
    pub fn for_dataset<'a>(&'a self, dataset: &'a str) -> impl Iterator<Item = &'a ManualPatch> + 'a {
        self.patches.iter().filter(move |p| p.dataset == dataset)
    }

    /// Datasets with at least one patch, in order of first appearance.
    pub fn datasets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for patch in &self.patches {
            if !seen.contains(&patch.dataset.as_str()) {
                seen.push(&patch.dataset);
            }
        }
        seen
    }

    /// Applies every patch of `dataset` in list order. Returns rows written
    /// (rows covered by several patches count once per patch).
    pub fn apply(&self, dataset: &str, labels: &mut [Option<TurnLabel>]) -> usize {
        self.for_dataset(dataset).map(|p| p.apply(labels)).sum()
    }

    /// Like [`PatchList::apply`], but hands each clamped range to `write`
    /// instead of touching a label slice, so a column of `len` rows can be
    /// patched without reading it.
    pub fn apply_ranges<F>(&self, dataset: &str, len: usize, mut write: F) -> usize
    where
        F: FnMut(Range<usize>, TurnLabel),
    {
        self.for_dataset(dataset)
            .map(|p| {
                let rows = p.rows(len);
                let count = rows.len();
                write(rows, p.label);
                count
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(dataset: &str, start: usize, end: usize, label: TurnLabel) -> ManualPatch {
        ManualPatch {
            dataset: dataset.to_string(),
            start,
            end,
            label,
        }
    }

    #[test]
    fn test_range_overwrite_exact() {
        let list = PatchList::new(vec![patch("a", 100, 150, TurnLabel::Left)]).unwrap();
        let mut labels = vec![Some(TurnLabel::Straight); 200];

        assert_eq!(list.apply("a", &mut labels), 50);
        for (i, label) in labels.iter().enumerate() {
            let expected = if (100..150).contains(&i) { TurnLabel::Left } else { TurnLabel::Straight };
            assert_eq!(*label, Some(expected), "row {i}");
        }
    }

    #[test]
    fn test_later_patch_wins_overlap() {
        let list = PatchList::new(vec![
            patch("a", 100, 150, TurnLabel::Left),
            patch("a", 120, 140, TurnLabel::Right),
        ])
        .unwrap();
        let mut labels = vec![Some(TurnLabel::Straight); 200];
        list.apply("a", &mut labels);

        assert_eq!(labels[99], Some(TurnLabel::Straight));
        assert_eq!(labels[100], Some(TurnLabel::Left));
        assert_eq!(labels[119], Some(TurnLabel::Left));
        assert!(labels[120..140].iter().all(|l| *l == Some(TurnLabel::Right)));
        assert_eq!(labels[140], Some(TurnLabel::Left));
        assert_eq!(labels[149], Some(TurnLabel::Left));
        assert_eq!(labels[150], Some(TurnLabel::Straight));
    }

    #[test]
    fn test_other_datasets_untouched() {
        let list = PatchList::new(vec![patch("a", 0, 10, TurnLabel::Skip)]).unwrap();
        let mut labels = vec![None; 20];
        assert_eq!(list.apply("b", &mut labels), 0);
        assert!(labels.iter().all(Option::is_none));
    }

    #[test]
    fn test_range_clamped_to_table() {
        let list = PatchList::new(vec![
            patch("a", 15, 40, TurnLabel::Skip),
            patch("a", 30, 40, TurnLabel::Left),
        ])
        .unwrap();
        let mut labels = vec![None; 20];
        assert_eq!(list.apply("a", &mut labels), 5);
        assert!(labels[15..].iter().all(|l| *l == Some(TurnLabel::Skip)));
        assert!(labels[..15].iter().all(Option::is_none));
    }

    #[test]
    fn test_apply_ranges_matches_apply() {
        let list = PatchList::new(vec![
            patch("a", 100, 150, TurnLabel::Left),
            patch("b", 0, 10, TurnLabel::Skip),
            patch("a", 120, 400, TurnLabel::Right),
        ])
        .unwrap();

        let mut seen = Vec::new();
        let written = list.apply_ranges("a", 200, |rows, label| seen.push((rows, label)));
        assert_eq!(seen, vec![(100..150, TurnLabel::Left), (120..200, TurnLabel::Right)]);

        let mut labels = vec![None; 200];
        assert_eq!(list.apply("a", &mut labels), written);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = PatchList::new(vec![patch("a", 10, 5, TurnLabel::Left)]).unwrap_err();
        assert!(matches!(err, PatchError::InvertedRange { position: 0, .. }));
    }

    #[test]
    fn test_builtin_list() {
        let list = PatchList::builtin().unwrap();
        assert_eq!(list.len(), 68);

        let ss3: Vec<_> = list.for_dataset("2021-06-09-14-58-11_e2e_rec_ss3").collect();
        assert_eq!(ss3.len(), 2);
        assert_eq!(ss3[1], &patch("2021-06-09-14-58-11_e2e_rec_ss3", 3775, 4475, TurnLabel::Skip));

        let datasets = list.datasets();
        assert_eq!(datasets[0], "2021-10-20-15-11-29_e2e_rec_vastse_ss13_17_back");
        assert_eq!(datasets.last(), Some(&"2021-09-24-11-40-24_e2e_rec_ss10_2"));
    }
}
