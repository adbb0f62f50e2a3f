//! Input-side dataset model: label map, split lists, and per-image CSV
//! annotation rows.
//!
//! Everything here is loaded from the dataset root and held read-only for
//! the duration of one conversion run. No input file is ever mutated.

mod bbox;
pub mod csv_boxes;
mod ids;
pub mod labelmap;
pub mod split;

// Re-export core types for convenient access
pub use bbox::BBoxXYWH;
pub use csv_boxes::{ParsedCsv, RawBox, RowRejection};
pub use ids::{AnnotationId, CategoryId, ImageId};
pub use labelmap::{normalize_label_name, LabelEntry, LabelMap, NameMatching};
pub use split::{discover_splits, find_image_file, SplitList, IMAGE_EXTENSIONS};
