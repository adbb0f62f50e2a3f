//! Split lists, split discovery, and image file location.
//!
//! A split is a plain-text file under `sets/` holding one image base-name
//! (no extension) per line. A base-name with no matching file on disk is a
//! recoverable gap, not an error. When a split has no list file, it falls
//! back to every image found in the images directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::PlantCocoError;

/// Supported image extensions, in probe priority order.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A named, ordered set of image base-names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitList {
    pub name: String,
    pub stems: Vec<String>,
}

impl SplitList {
    /// Reads a split list file: one base-name per line, blank lines
    /// skipped, duplicates dropped keeping the first occurrence.
    pub fn from_file(path: &Path, name: &str) -> Result<Self, PlantCocoError> {
        let content = fs::read_to_string(path).map_err(PlantCocoError::Io)?;

        let mut seen = BTreeSet::new();
        let stems = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| seen.insert(line.to_string()))
            .map(str::to_string)
            .collect();

        Ok(Self {
            name: name.to_string(),
            stems,
        })
    }

    /// Builds the fallback split from every image present on disk, in
    /// sorted stem order.
    pub fn from_images_dir(images_dir: &Path, name: &str) -> Result<Self, PlantCocoError> {
        Ok(Self {
            name: name.to_string(),
            stems: scan_image_stems(images_dir)?,
        })
    }
}

/// Lists the split names available under `sets/`, sorted by name.
///
/// A missing `sets/` directory yields an empty list; the caller decides
/// what the fallback split is called.
pub fn discover_splits(sets_dir: &Path) -> Result<Vec<String>, PlantCocoError> {
    if !sets_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(sets_dir).map_err(PlantCocoError::Io)? {
        let entry = entry.map_err(PlantCocoError::Io)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_list = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if !is_list {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Collects the distinct image base-names under `images_dir`, sorted.
pub fn scan_image_stems(images_dir: &Path) -> Result<Vec<String>, PlantCocoError> {
    let mut stems = BTreeSet::new();

    for entry in WalkDir::new(images_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| PlantCocoError::Io(source.into()))?;
        let path = entry.path();
        if !path.is_file() || !has_image_extension(path) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(stem.to_string());
        }
    }

    Ok(stems.into_iter().collect())
}

/// Locates the image file for a base-name by probing the supported
/// extensions in priority order. Returns `None` when no variant exists.
pub fn find_image_file(images_dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| images_dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
