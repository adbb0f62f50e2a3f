//! Label map loading and class-name resolution.
//!
//! The label map is a `labelmap.json` file holding an ordered array of
//! `{object_id, label_id, keyboard_shortcut, object_name}` entries. It is
//! loaded once at converter start and read-only afterward. The entry with
//! `object_id == 0` is the background class and is excluded from the
//! emitted COCO categories.
//!
//! # Name matching
//!
//! Class names in per-image CSVs accumulated spelling variants over the
//! dataset's lifetime ("Bell_pepper leaf", "bell pepper leaf", ...). The
//! resolver therefore case-folds and collapses separator runs before
//! comparing names, while the label map's canonical spelling is what gets
//! emitted. Exact matching is available as an opt-out.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::ids::CategoryId;
use crate::error::PlantCocoError;

/// How CSV label names are matched against label-map entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameMatching {
    /// Case-fold and collapse separator runs before comparing (default).
    #[default]
    Normalized,
    /// Compare names byte-for-byte.
    Exact,
}

/// One entry of the label map, as stored on disk.
#[derive(Debug, Deserialize)]
struct RawEntry {
    object_id: i64,
    label_id: u64,
    #[serde(default)]
    #[allow(dead_code)]
    keyboard_shortcut: String,
    object_name: String,
}

/// A foreground class from the label map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelEntry {
    pub object_id: i64,
    pub label_id: CategoryId,
    /// Canonical spelling, preserved verbatim in emitted categories.
    pub name: String,
}

/// The loaded, read-only label map.
#[derive(Debug)]
pub struct LabelMap {
    entries: Vec<LabelEntry>,
    background_ids: Vec<CategoryId>,
    by_name_exact: BTreeMap<String, CategoryId>,
    by_name_normalized: BTreeMap<String, CategoryId>,
}

impl LabelMap {
    /// Loads a label map from a `labelmap.json` file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if two
    /// entries share a `label_id`.
    pub fn from_path(path: &Path) -> Result<Self, PlantCocoError> {
        let bytes = fs::read(path).map_err(PlantCocoError::Io)?;
        let raw: Vec<RawEntry> =
            serde_json::from_slice(&bytes).map_err(|source| PlantCocoError::LabelMapParse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_raw(raw).map_err(|message| PlantCocoError::LabelMapInvalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Loads a label map from a JSON string.
    ///
    /// Useful for testing without file I/O.
    pub fn from_json_str(json: &str) -> Result<Self, PlantCocoError> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|source| PlantCocoError::LabelMapParse {
                path: Path::new("<string>").to_path_buf(),
                source,
            })?;

        Self::from_raw(raw).map_err(|message| PlantCocoError::LabelMapInvalid {
            path: Path::new("<string>").to_path_buf(),
            message,
        })
    }

    fn from_raw(raw: Vec<RawEntry>) -> Result<Self, String> {
        let mut entries = Vec::new();
        let mut background_ids = Vec::new();
        let mut seen_ids: BTreeMap<u64, String> = BTreeMap::new();
        let mut by_name_exact = BTreeMap::new();
        let mut by_name_normalized = BTreeMap::new();

        for entry in raw {
            if let Some(first) = seen_ids.get(&entry.label_id) {
                return Err(format!(
                    "duplicate label_id {} ('{}' and '{}')",
                    entry.label_id, first, entry.object_name
                ));
            }
            seen_ids.insert(entry.label_id, entry.object_name.clone());

            // Background stays out of every lookup and out of the
            // emitted categories, but its label_id is remembered so the
            // document check can reject it if it ever leaks through.
            if entry.object_id == 0 {
                background_ids.push(CategoryId::new(entry.label_id));
                continue;
            }

            let id = CategoryId::new(entry.label_id);

            // First entry wins on name collisions, keeping resolution
            // independent of map ordering quirks.
            by_name_exact.entry(entry.object_name.clone()).or_insert(id);
            by_name_normalized
                .entry(normalize_label_name(&entry.object_name))
                .or_insert(id);

            entries.push(LabelEntry {
                object_id: entry.object_id,
                label_id: id,
                name: entry.object_name,
            });
        }

        Ok(Self {
            entries,
            background_ids,
            by_name_exact,
            by_name_normalized,
        })
    }

    /// The foreground classes, in label-map order.
    pub fn foreground(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// The label IDs of background entries (`object_id == 0`).
    ///
    /// Background is defined by `object_id`, not by a fixed `label_id`,
    /// so these are whatever IDs the map assigned to its background rows.
    pub fn background_ids(&self) -> &[CategoryId] {
        &self.background_ids
    }

    /// Returns true if `id` names a foreground class.
    pub fn contains_id(&self, id: CategoryId) -> bool {
        self.entries.iter().any(|entry| entry.label_id == id)
    }

    /// Resolves a CSV `label` field to a category ID.
    ///
    /// Numeric labels are treated as label IDs directly; anything else is
    /// matched against class names according to `matching`. Returns `None`
    /// if the label does not resolve - the caller drops and counts the row.
    pub fn resolve(&self, label: &str, matching: NameMatching) -> Option<CategoryId> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        if label.bytes().all(|b| b.is_ascii_digit()) {
            let id = CategoryId::new(label.parse().ok()?);
            return self.contains_id(id).then_some(id);
        }

        match matching {
            NameMatching::Exact => self.by_name_exact.get(label).copied(),
            NameMatching::Normalized => self
                .by_name_normalized
                .get(&normalize_label_name(label))
                .copied(),
        }
    }
}

/// Canonicalizes a class name for matching: case-fold, then collapse every
/// run of spaces, hyphens, and underscores to a single underscore.
pub fn normalize_label_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.trim().chars() {
        if ch == ' ' || ch == '-' || ch == '_' {
            pending_separator = !out.is_empty();
        } else {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.extend(ch.to_lowercase());
        }
    }

    out
}
