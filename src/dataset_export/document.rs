//! Annotation document construction
//!
//! Builds the COCO-style `{images, annotations, categories, info}` document
//! and the `dataset_meta.json` sidecar from a slice of detection events.

use crate::detection_event::{DetectionEvent, Violation};
use serde::{Deserialize, Serialize};

/// Frame dimensions used to denormalize bounding boxes.
///
/// Always 1920x1080 regardless of the actual source image. This is a known
/// simplification carried over from the original pipeline; the event record
/// does not carry per-image dimensions, so do not parameterize it without
/// redesigning the surrounding system.
pub const FRAME_WIDTH: u32 = 1920;
pub const FRAME_HEIGHT: u32 = 1080;

/// Image record in the annotation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u32,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Per-person annotation attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationAttributes {
    pub violation: Violation,
}

/// Annotation record in the annotation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: u32,
    pub image_id: u32,
    /// Pixel-unit `[top-left x, top-left y, width, height]`
    pub bbox: [f64; 4],
    pub category_id: u32,
    pub area: f64,
    pub iscrowd: u32,
    pub attributes: AnnotationAttributes,
}

/// Category record in the annotation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: u32,
    pub name: String,
}

/// The full annotation document (`instances_default.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub images: Vec<ImageRecord>,
    pub annotations: Vec<AnnotationRecord>,
    pub categories: Vec<CategoryRecord>,
    pub info: serde_json::Value,
}

/// The `dataset_meta.json` sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub categories: Vec<String>,
}

impl AnnotationDocument {
    /// Build the annotation document from the selected events.
    ///
    /// Image ids are 1-based in iteration order; annotation ids are globally
    /// sequential from 1 across the whole export. The category list always
    /// contains all four violation states in category-map order, whatever
    /// actually appears in the input.
    pub fn from_events(events: &[DetectionEvent]) -> Self {
        let mut images = Vec::with_capacity(events.len());
        let mut annotations = Vec::new();
        let mut ann_id = 1u32;

        for (i, event) in events.iter().enumerate() {
            let image_id = i as u32 + 1;
            images.push(ImageRecord {
                id: image_id,
                file_name: file_name(&event.image_url),
                width: FRAME_WIDTH,
                height: FRAME_HEIGHT,
            });

            for person in &event.persons {
                let w = f64::from(FRAME_WIDTH);
                let h = f64::from(FRAME_HEIGHT);
                annotations.push(AnnotationRecord {
                    id: ann_id,
                    image_id,
                    bbox: [
                        person.bbox_x * w,
                        person.bbox_y * h,
                        person.bbox_width * w,
                        person.bbox_height * h,
                    ],
                    category_id: person.violation.category_id(),
                    area: person.bbox_width * person.bbox_height * w * h,
                    iscrowd: 0,
                    attributes: AnnotationAttributes {
                        violation: person.violation,
                    },
                });
                ann_id += 1;
            }
        }

        Self {
            images,
            annotations,
            categories: Violation::ALL
                .iter()
                .map(|v| CategoryRecord {
                    id: v.category_id(),
                    name: v.as_str().to_string(),
                })
                .collect(),
            info: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

impl DatasetMeta {
    /// Category names in category-map order.
    pub fn new() -> Self {
        Self {
            categories: Violation::ALL.iter().map(|v| v.as_str().to_string()).collect(),
        }
    }
}

impl Default for DatasetMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Final path component of an image reference, directory components stripped.
fn file_name(image_url: &str) -> String {
    image_url
        .rsplit('/')
        .next()
        .unwrap_or(image_url)
        .to_string()
}
