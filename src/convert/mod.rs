//! The per-split conversion pipeline.
//!
//! Each split is converted independently by a pure pass over read-only
//! inputs: resolve the split's base-name list, probe for each image file,
//! read its dimensions, parse its CSV rows, and assemble one COCO document
//! with sequential IDs. The shared label map is loaded once per run and
//! never mutated, so splits have no data dependency on each other; a
//! fatal error in one split leaves the others untouched and is reported
//! in the run outcome instead of aborting the run.

pub mod report;

pub use report::{Gap, GapCode, SplitReport};

use std::fs;
use std::path::{Path, PathBuf};

use crate::coco::{
    check, write_coco_json, CocoAnnotation, CocoCategory, CocoDocument, CocoImage, CocoInfo,
    SUPERCATEGORY,
};
use crate::dataset::{
    csv_boxes, find_image_file, AnnotationId, ImageId, LabelMap, NameMatching, SplitList,
};
use crate::error::PlantCocoError;

/// Default category directory name under the dataset root.
pub const DEFAULT_CATEGORY: &str = "plant_diseases";

/// Options for one conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Dataset root directory.
    pub root: PathBuf,
    /// Output directory for COCO JSON files; created if absent.
    pub out_dir: PathBuf,
    /// Category directory name under the root.
    pub category: String,
    /// Splits to process; empty means every list discovered under `sets/`.
    pub splits: Vec<String>,
    /// How CSV label names are matched against the label map.
    pub name_matching: NameMatching,
}

/// Where the pieces of one category's dataset live.
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    pub category: String,
    pub category_root: PathBuf,
    pub images_dir: PathBuf,
    pub csv_dir: PathBuf,
    pub sets_dir: PathBuf,
    pub labelmap_path: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: &Path, category: &str) -> Self {
        let category_root = root.join(category);
        Self {
            category: category.to_string(),
            images_dir: category_root.join("images"),
            csv_dir: category_root.join("csv"),
            sets_dir: category_root.join("sets"),
            labelmap_path: category_root.join("labelmap.json"),
            category_root,
        }
    }
}

/// One emitted split document and its report.
#[derive(Debug)]
pub struct ConvertedSplit {
    pub path: PathBuf,
    pub report: SplitReport,
}

/// A split whose conversion hit a fatal error. No file is written for it.
#[derive(Debug)]
pub struct SplitFailure {
    pub split: String,
    pub error: PlantCocoError,
}

/// What one conversion run produced, split by split.
#[derive(Debug)]
pub struct RunOutcome {
    /// Splits whose documents were written, in processing order.
    pub converted: Vec<ConvertedSplit>,
    /// Splits that aborted; the remaining splits still ran.
    pub failed: Vec<SplitFailure>,
}

/// Runs the full conversion: one COCO JSON document per requested split.
///
/// A fatal error inside one split (an unreadable image that is present on
/// disk, an unreadable list file, a document that fails its integrity
/// check) aborts only that split; it lands in [`RunOutcome::failed`] and
/// the remaining splits are still processed. Recoverable gaps are counted
/// in each split's report.
///
/// # Errors
/// Run-level conditions only: missing root, category, or label map, or an
/// unwritable output directory.
pub fn run_convert(options: &ConvertOptions) -> Result<RunOutcome, PlantCocoError> {
    if !options.root.is_dir() {
        return Err(PlantCocoError::RootNotFound {
            path: options.root.clone(),
        });
    }

    let layout = DatasetLayout::new(&options.root, &options.category);
    if !layout.category_root.is_dir() {
        return Err(PlantCocoError::CategoryNotFound {
            path: layout.category_root.clone(),
        });
    }
    if !layout.labelmap_path.is_file() {
        return Err(PlantCocoError::LabelMapInvalid {
            path: layout.labelmap_path.clone(),
            message: "label map file not found".to_string(),
        });
    }

    let label_map = LabelMap::from_path(&layout.labelmap_path)?;
    fs::create_dir_all(&options.out_dir).map_err(PlantCocoError::Io)?;

    let split_names = if options.splits.is_empty() {
        let discovered = crate::dataset::discover_splits(&layout.sets_dir)?;
        if discovered.is_empty() {
            // No sets/ directory at all: one synthetic split over
            // everything on disk.
            vec!["all".to_string()]
        } else {
            discovered
        }
    } else {
        options.splits.clone()
    };

    let mut outcome = RunOutcome {
        converted: Vec::with_capacity(split_names.len()),
        failed: Vec::new(),
    };

    for name in &split_names {
        match convert_one_split(&layout, &label_map, name, options) {
            Ok(split) => outcome.converted.push(split),
            Err(error) => outcome.failed.push(SplitFailure {
                split: name.clone(),
                error,
            }),
        }
    }

    Ok(outcome)
}

/// Converts and writes a single split. Any error here is fatal for this
/// split only.
fn convert_one_split(
    layout: &DatasetLayout,
    label_map: &LabelMap,
    name: &str,
    options: &ConvertOptions,
) -> Result<ConvertedSplit, PlantCocoError> {
    let list_path = layout.sets_dir.join(format!("{name}.txt"));
    let split = if list_path.is_file() {
        SplitList::from_file(&list_path, name)?
    } else {
        SplitList::from_images_dir(&layout.images_dir, name)?
    };

    let (document, report) = convert_split(layout, label_map, &split, options.name_matching)?;

    let issues = check::check_document(&document, label_map.background_ids());
    if !issues.is_empty() {
        let message = issues
            .iter()
            .map(|issue| issue.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(PlantCocoError::DocumentInvalid {
            split: name.to_string(),
            message,
        });
    }

    let out_path = options
        .out_dir
        .join(format!("{}_instances_{}.json", layout.category, name));
    write_coco_json(&out_path, &document)?;

    Ok(ConvertedSplit {
        path: out_path,
        report,
    })
}

/// Converts one split into a COCO document.
///
/// # ID Assignment Policy (for determinism)
///
/// Images get sequential IDs in split-list order (fallback: sorted stem
/// order); annotations get sequential IDs in image order then CSV row
/// order. Both start at 1 and are unique within the split's document.
pub fn convert_split(
    layout: &DatasetLayout,
    label_map: &LabelMap,
    split: &SplitList,
    name_matching: NameMatching,
) -> Result<(CocoDocument, SplitReport), PlantCocoError> {
    let mut report = SplitReport::new(&split.name);
    let mut images = Vec::new();
    let mut annotations = Vec::new();

    let mut next_image_id: u64 = 1;
    let mut next_annotation_id: u64 = 1;

    for stem in &split.stems {
        let Some(image_path) = find_image_file(&layout.images_dir, stem) else {
            report.record(
                GapCode::ImageFileMissing,
                format!("no image file for '{stem}'"),
            );
            continue;
        };

        // The image is required by this split, so a file that exists but
        // cannot be sniffed is fatal rather than a countable gap.
        let (width, height) = read_image_dimensions(&image_path)?;

        let image_id = ImageId::new(next_image_id);
        next_image_id += 1;

        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());
        images.push(CocoImage {
            id: image_id,
            file_name: format!("{}/images/{}", layout.category, file_name),
            width,
            height,
        });
        report.images_processed += 1;

        let csv_path = layout.csv_dir.join(format!("{stem}.csv"));
        if !csv_path.is_file() {
            // An image with no disease regions is valid, not an error.
            report.record(
                GapCode::CsvFileMissing,
                format!("no annotation csv for '{stem}'"),
            );
            continue;
        }

        let parsed = csv_boxes::read_csv_boxes(&csv_path)?;
        for rejection in &parsed.rejected {
            report.record(
                GapCode::MalformedRow,
                format!("{stem}.csv row {}: {}", rejection.row, rejection.reason),
            );
        }

        for raw in &parsed.rows {
            let Some(category_id) = label_map.resolve(&raw.label, name_matching) else {
                report.record(
                    GapCode::UnknownLabel,
                    format!("{stem}.csv item {}: unknown label '{}'", raw.item, raw.label),
                );
                continue;
            };

            if !raw.bbox.is_finite() || !raw.bbox.has_positive_size() {
                report.record(
                    GapCode::DegenerateBox,
                    format!(
                        "{stem}.csv item {}: degenerate box {}x{}",
                        raw.item, raw.bbox.width, raw.bbox.height
                    ),
                );
                continue;
            }

            annotations.push(CocoAnnotation {
                id: AnnotationId::new(next_annotation_id),
                image_id,
                category_id,
                bbox: raw.bbox.to_array(),
                area: raw.bbox.area(),
                iscrowd: 0,
            });
            next_annotation_id += 1;
            report.annotations_kept += 1;
        }
    }

    let document = CocoDocument {
        info: CocoInfo::for_split(&layout.category, &split.name),
        images,
        annotations,
        categories: categories_from(label_map),
        licenses: vec![],
    };

    Ok((document, report))
}

/// Derives the shared category list from the label map, background excluded.
pub fn categories_from(label_map: &LabelMap) -> Vec<CocoCategory> {
    label_map
        .foreground()
        .iter()
        .map(|entry| CocoCategory {
            id: entry.label_id,
            name: entry.name.clone(),
            supercategory: SUPERCATEGORY.to_string(),
        })
        .collect()
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), PlantCocoError> {
    let size = imagesize::size(path).map_err(|source| PlantCocoError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((size.width as u32, size.height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_label_map() -> LabelMap {
        LabelMap::from_json_str(
            r#"[
                {"object_id": 0, "label_id": 0, "keyboard_shortcut": "0", "object_name": "background"},
                {"object_id": 1, "label_id": 1, "keyboard_shortcut": "1", "object_name": "apple_leaf"},
                {"object_id": 2, "label_id": 2, "keyboard_shortcut": "2", "object_name": "tomato_leaf"}
            ]"#,
        )
        .expect("label map")
    }

    #[test]
    fn test_categories_exclude_background() {
        let categories = categories_from(&sample_label_map());
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.id.as_u64() != 0));
        assert_eq!(categories[0].name, "apple_leaf");
        assert_eq!(categories[0].supercategory, "plant_disease");
    }

    #[test]
    fn test_layout_paths() {
        let layout = DatasetLayout::new(Path::new("/data"), "plant_diseases");
        assert_eq!(layout.category_root, Path::new("/data/plant_diseases"));
        assert_eq!(layout.images_dir, Path::new("/data/plant_diseases/images"));
        assert_eq!(layout.csv_dir, Path::new("/data/plant_diseases/csv"));
        assert_eq!(layout.sets_dir, Path::new("/data/plant_diseases/sets"));
        assert_eq!(
            layout.labelmap_path,
            Path::new("/data/plant_diseases/labelmap.json")
        );
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let options = ConvertOptions {
            root: temp.path().join("does-not-exist"),
            out_dir: temp.path().join("out"),
            category: DEFAULT_CATEGORY.to_string(),
            splits: vec![],
            name_matching: NameMatching::Normalized,
        };

        let result = run_convert(&options);
        assert!(matches!(result, Err(PlantCocoError::RootNotFound { .. })));
    }

    #[test]
    fn test_missing_label_map_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join("plant_diseases")).expect("mkdir");

        let options = ConvertOptions {
            root: temp.path().to_path_buf(),
            out_dir: temp.path().join("out"),
            category: DEFAULT_CATEGORY.to_string(),
            splits: vec![],
            name_matching: NameMatching::Normalized,
        };

        let result = run_convert(&options);
        assert!(matches!(
            result,
            Err(PlantCocoError::LabelMapInvalid { .. })
        ));
    }
}
