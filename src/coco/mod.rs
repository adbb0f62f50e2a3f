//! COCO JSON document model and writer.
//!
//! # COCO Format Reference
//!
//! COCO bounding boxes use `[x, y, width, height]` format where `(x, y)`
//! is the top-left corner in absolute pixel coordinates. `area` is a float,
//! `iscrowd` is always 0 for this dataset, and `category_id` is 1-based
//! with background excluded.
//!
//! # Deterministic Output
//!
//! The converter assigns IDs sequentially in emission order, so documents
//! serialize with lists already sorted by ID and two runs over identical
//! inputs produce byte-identical files. Field order is fixed by the struct
//! definitions below.
//!
//! # Atomicity
//!
//! [`write_coco_json`] writes to a sibling temp file and renames it into
//! place, so a failed run never leaves a truncated document on disk.

pub mod check;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{AnnotationId, CategoryId, ImageId};
use crate::error::PlantCocoError;

/// Upstream dataset homepage, recorded in every document's info block.
pub const DATASET_URL: &str = "https://github.com/pratikkayal/PlantDoc-Dataset";

/// The supercategory shared by every emitted category.
pub const SUPERCATEGORY: &str = "plant_disease";

/// Top-level COCO dataset structure, one per split.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoDocument {
    pub info: CocoInfo,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
    /// Always empty for this dataset; kept for schema compatibility.
    #[serde(default)]
    pub licenses: Vec<CocoLicense>,
}

/// COCO dataset info block.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoInfo {
    pub year: u32,
    pub version: String,
    pub description: String,
    pub url: String,
}

impl CocoInfo {
    /// Static metadata for one split's document.
    pub fn for_split(category: &str, split: &str) -> Self {
        Self {
            year: 2020,
            version: "1.0.0".to_string(),
            description: format!("PlantDoc {category} {split} split"),
            url: DATASET_URL.to_string(),
        }
    }
}

/// COCO image entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: ImageId,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// COCO annotation entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    /// `[x, y, width, height]` with `(x, y)` as the top-left corner.
    pub bbox: [f64; 4],
    pub area: f64,
    pub iscrowd: u8,
}

/// COCO category entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

/// COCO license entry. Never populated by this converter.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoLicense {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Writes a document to `path` via a temp file renamed into place.
///
/// # Errors
/// Returns an error if the file cannot be written; the target path is
/// left untouched on failure.
pub fn write_coco_json(path: &Path, document: &CocoDocument) -> Result<(), PlantCocoError> {
    let tmp_path = path.with_extension("json.tmp");

    let result = (|| {
        let file = File::create(&tmp_path).map_err(PlantCocoError::Io)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
            PlantCocoError::CocoJsonWrite {
                path: path.to_path_buf(),
                source,
            }
        })?;

        writer.flush().map_err(PlantCocoError::Io)?;
        fs::rename(&tmp_path, path).map_err(PlantCocoError::Io)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Serializes a document to a pretty JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(document: &CocoDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}
