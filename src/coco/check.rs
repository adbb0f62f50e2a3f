//! Document integrity checks run before every write.
//!
//! Every `annotations[i].image_id` and `category_id` must reference an
//! entry present in the same document, IDs must be unique within their
//! collection, and the background class must never be emitted. Background
//! is identified by the label map's background label IDs rather than a
//! hard-coded zero, since the map defines background by `object_id`. A
//! violation here is a converter bug, so the pipeline treats any issue as
//! fatal for the split instead of writing a broken document.

use std::collections::HashSet;
use std::fmt;

use super::CocoDocument;
use crate::dataset::{AnnotationId, CategoryId, ImageId};

/// A single integrity violation found in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrityIssue {
    DuplicateImageId(ImageId),
    DuplicateAnnotationId(AnnotationId),
    DuplicateCategoryId(CategoryId),
    DanglingImageRef {
        annotation: AnnotationId,
        image_id: ImageId,
    },
    DanglingCategoryRef {
        annotation: AnnotationId,
        category_id: CategoryId,
    },
    BackgroundCategory(CategoryId),
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DuplicateImageId(id) => write!(f, "duplicate image id {id}"),
            IntegrityIssue::DuplicateAnnotationId(id) => {
                write!(f, "duplicate annotation id {id}")
            }
            IntegrityIssue::DuplicateCategoryId(id) => write!(f, "duplicate category id {id}"),
            IntegrityIssue::DanglingImageRef {
                annotation,
                image_id,
            } => write!(
                f,
                "annotation {annotation} references missing image {image_id}"
            ),
            IntegrityIssue::DanglingCategoryRef {
                annotation,
                category_id,
            } => write!(
                f,
                "annotation {annotation} references missing category {category_id}"
            ),
            IntegrityIssue::BackgroundCategory(id) => {
                write!(f, "background category {id} must not be emitted")
            }
        }
    }
}

/// Checks a document's referential integrity.
///
/// `background_ids` holds the label map's background label IDs; a
/// category carrying one of them is flagged. Returns every issue found;
/// an empty vec means the document is sound.
pub fn check_document(
    document: &CocoDocument,
    background_ids: &[CategoryId],
) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let mut image_ids = HashSet::new();
    for image in &document.images {
        if !image_ids.insert(image.id) {
            issues.push(IntegrityIssue::DuplicateImageId(image.id));
        }
    }

    let mut category_ids = HashSet::new();
    for category in &document.categories {
        if !category_ids.insert(category.id) {
            issues.push(IntegrityIssue::DuplicateCategoryId(category.id));
        }
        if background_ids.contains(&category.id) {
            issues.push(IntegrityIssue::BackgroundCategory(category.id));
        }
    }

    let mut annotation_ids = HashSet::new();
    for annotation in &document.annotations {
        if !annotation_ids.insert(annotation.id) {
            issues.push(IntegrityIssue::DuplicateAnnotationId(annotation.id));
        }
        if !image_ids.contains(&annotation.image_id) {
            issues.push(IntegrityIssue::DanglingImageRef {
                annotation: annotation.id,
                image_id: annotation.image_id,
            });
        }
        if !category_ids.contains(&annotation.category_id) {
            issues.push(IntegrityIssue::DanglingCategoryRef {
                annotation: annotation.id,
                category_id: annotation.category_id,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coco::{CocoAnnotation, CocoCategory, CocoImage, CocoInfo, SUPERCATEGORY};

    fn valid_document() -> CocoDocument {
        CocoDocument {
            info: CocoInfo::for_split("plant_diseases", "train"),
            images: vec![CocoImage {
                id: ImageId(1),
                file_name: "plant_diseases/images/a.jpg".to_string(),
                width: 100,
                height: 100,
            }],
            annotations: vec![CocoAnnotation {
                id: AnnotationId(1),
                image_id: ImageId(1),
                category_id: CategoryId(1),
                bbox: [0.0, 0.0, 10.0, 10.0],
                area: 100.0,
                iscrowd: 0,
            }],
            categories: vec![CocoCategory {
                id: CategoryId(1),
                name: "apple_leaf".to_string(),
                supercategory: SUPERCATEGORY.to_string(),
            }],
            licenses: vec![],
        }
    }

    #[test]
    fn test_valid_document_is_clean() {
        assert!(check_document(&valid_document(), &[CategoryId(0)]).is_empty());
    }

    #[test]
    fn test_dangling_image_ref() {
        let mut document = valid_document();
        document.annotations[0].image_id = ImageId(99);

        let issues = check_document(&document, &[CategoryId(0)]);
        assert!(issues.contains(&IntegrityIssue::DanglingImageRef {
            annotation: AnnotationId(1),
            image_id: ImageId(99),
        }));
    }

    #[test]
    fn test_dangling_category_ref() {
        let mut document = valid_document();
        document.annotations[0].category_id = CategoryId(99);

        let issues = check_document(&document, &[CategoryId(0)]);
        assert!(issues.contains(&IntegrityIssue::DanglingCategoryRef {
            annotation: AnnotationId(1),
            category_id: CategoryId(99),
        }));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut document = valid_document();
        document.images.push(CocoImage {
            id: ImageId(1),
            file_name: "plant_diseases/images/b.jpg".to_string(),
            width: 50,
            height: 50,
        });

        let issues = check_document(&document, &[CategoryId(0)]);
        assert!(issues.contains(&IntegrityIssue::DuplicateImageId(ImageId(1))));
    }

    #[test]
    fn test_background_category_flagged() {
        let mut document = valid_document();
        document.categories.push(CocoCategory {
            id: CategoryId(0),
            name: "background".to_string(),
            supercategory: SUPERCATEGORY.to_string(),
        });

        let issues = check_document(&document, &[CategoryId(0)]);
        assert!(issues.contains(&IntegrityIssue::BackgroundCategory(CategoryId(0))));
    }

    #[test]
    fn test_nonzero_background_label_id_flagged() {
        let mut document = valid_document();
        document.categories.push(CocoCategory {
            id: CategoryId(7),
            name: "background".to_string(),
            supercategory: SUPERCATEGORY.to_string(),
        });

        // The map, not a fixed zero, decides which IDs are background.
        let issues = check_document(&document, &[CategoryId(7)]);
        assert!(issues.contains(&IntegrityIssue::BackgroundCategory(CategoryId(7))));
        assert!(check_document(&document, &[CategoryId(0)])
            .iter()
            .all(|issue| !matches!(issue, IntegrityIssue::BackgroundCategory(_))));
    }
}
