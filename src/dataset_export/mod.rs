//! Dataset exporter
//!
//! ## Responsibilities
//!
//! - Select detection events (same all-or-nothing filter as the event store)
//! - Build the Datumaro/COCO annotation document and metadata sidecar
//! - Stage the dataset directory tree and package it as a zip archive
//!
//! The archive extracts to:
//!
//! ```text
//! dataset/
//!   annotations/instances_default.json
//!   images/                              (empty; image bytes are not copied)
//! dataset_meta.json
//! ```

mod document;

pub use document::{
    AnnotationAttributes, AnnotationDocument, AnnotationRecord, CategoryRecord, DatasetMeta,
    ImageRecord, FRAME_HEIGHT, FRAME_WIDTH,
};

use crate::detection_event::{select_events, DetectionEventRepository, EventQuery};
use crate::error::Result;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Attachment file name for the exported archive
pub const EXPORT_FILE_NAME: &str = "datumaro_export.zip";

/// A packaged dataset bundle ready for transport as a binary attachment.
#[derive(Debug, Clone)]
pub struct DatasetArchive {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Dataset export service
pub struct DatasetExporter {
    repo: Arc<dyn DetectionEventRepository>,
}

impl DatasetExporter {
    pub fn new(repo: Arc<dyn DetectionEventRepository>) -> Self {
        Self { repo }
    }

    /// Export the selected events as a zipped Datumaro dataset bundle.
    ///
    /// Any failure aborts before the bytes are returned, so a caller never
    /// sees a partial archive. The staging directory lives only for the
    /// duration of this call; the `TempDir` guard removes it on drop.
    pub async fn export(&self, query: &EventQuery) -> Result<DatasetArchive> {
        let events = select_events(self.repo.as_ref(), query).await?;
        let document = AnnotationDocument::from_events(&events);

        let staging = tempfile::tempdir()?;
        let dataset_dir = staging.path().join("dataset");
        let annotations_dir = dataset_dir.join("annotations");
        fs::create_dir_all(&annotations_dir).await?;
        fs::create_dir_all(dataset_dir.join("images")).await?;

        // Pretty-printed UTF-8, non-ASCII characters emitted literally. The
        // sidecar deliberately stays compact; the two files do not share an
        // encoding contract.
        let annotation_json = serde_json::to_string_pretty(&document)?;
        fs::write(
            annotations_dir.join("instances_default.json"),
            annotation_json,
        )
        .await?;

        let meta_json = serde_json::to_string(&DatasetMeta::new())?;
        fs::write(staging.path().join("dataset_meta.json"), meta_json).await?;

        let bytes = zip_directory(staging.path())?;

        info!(
            events = document.images.len(),
            annotations = document.annotations.len(),
            zip_bytes = bytes.len(),
            "Dataset export packaged"
        );

        Ok(DatasetArchive {
            file_name: EXPORT_FILE_NAME,
            content_type: "application/zip",
            bytes,
        })
    }
}

/// Recursively zip a directory tree into memory.
///
/// Entry names are relative to `root`. Directory entries are written too,
/// so empty directories (the `images/` folder) survive extraction.
fn zip_directory(root: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| crate::error::Error::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| crate::error::Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        let name = relative.to_string_lossy();

        if entry.file_type().is_dir() {
            writer.add_directory(name.as_ref(), options)?;
        } else {
            writer.start_file(name.as_ref(), options)?;
            writer.write_all(&std::fs::read(entry.path())?)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection_event::testing::{event, person, InMemoryEventRepository};
    use crate::detection_event::Violation;
    use std::io::Read;
    use zip::ZipArchive;

    fn exporter_with(events: Vec<crate::detection_event::DetectionEvent>) -> DatasetExporter {
        DatasetExporter::new(Arc::new(InMemoryEventRepository::with_events(events)))
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[tokio::test]
    async fn test_export_zip_layout_and_round_trip() {
        let events = vec![
            event(
                1,
                0,
                vec![person(Violation::NoHelmet), person(Violation::NoVest)],
            ),
            event(1, 5, vec![]),
        ];
        let expected = AnnotationDocument::from_events(&events);

        let archive = exporter_with(events)
            .export(&EventQuery::default())
            .await
            .unwrap();
        assert_eq!(archive.file_name, "datumaro_export.zip");
        assert_eq!(archive.content_type, "application/zip");

        let names = entry_names(&archive.bytes);
        assert!(names
            .iter()
            .any(|n| n == "dataset/annotations/instances_default.json"));
        assert!(names.iter().any(|n| n == "dataset_meta.json"));
        assert!(names.iter().any(|n| n.trim_end_matches('/') == "dataset/images"));

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();

        let mut annotation_json = String::new();
        zip.by_name("dataset/annotations/instances_default.json")
            .unwrap()
            .read_to_string(&mut annotation_json)
            .unwrap();
        let document: AnnotationDocument = serde_json::from_str(&annotation_json).unwrap();
        assert_eq!(document, expected);

        let mut meta_json = String::new();
        zip.by_name("dataset_meta.json")
            .unwrap()
            .read_to_string(&mut meta_json)
            .unwrap();
        let meta: DatasetMeta = serde_json::from_str(&meta_json).unwrap();
        assert_eq!(meta, DatasetMeta::new());
    }

    #[tokio::test]
    async fn test_export_partial_filter_selects_all_events() {
        let archive = exporter_with(vec![event(1, 0, vec![]), event(2, 5, vec![])])
            .export(&EventQuery {
                camera_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        let mut annotation_json = String::new();
        zip.by_name("dataset/annotations/instances_default.json")
            .unwrap()
            .read_to_string(&mut annotation_json)
            .unwrap();
        let document: AnnotationDocument = serde_json::from_str(&annotation_json).unwrap();

        // camera_id alone is a partial filter and must not scope the export
        assert_eq!(document.images.len(), 2);
    }

    #[tokio::test]
    async fn test_export_of_no_events_still_carries_categories() {
        let archive = exporter_with(vec![])
            .export(&EventQuery::default())
            .await
            .unwrap();

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        let mut annotation_json = String::new();
        zip.by_name("dataset/annotations/instances_default.json")
            .unwrap()
            .read_to_string(&mut annotation_json)
            .unwrap();
        let document: AnnotationDocument = serde_json::from_str(&annotation_json).unwrap();

        assert!(document.images.is_empty());
        assert!(document.annotations.is_empty());
        assert_eq!(document.categories.len(), 4);
    }

    #[tokio::test]
    async fn test_export_with_malformed_timestamp_fails_without_archive() {
        let err = exporter_with(vec![event(1, 0, vec![])])
            .export(&EventQuery {
                camera_id: Some(1),
                start: Some("not-iso".to_string()),
                end: Some("2026-08-31T00:00:00Z".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedTimestamp(_)));
    }
}
