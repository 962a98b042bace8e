//! Sitewatch - PPE Detection Monitoring Backend
//!
//! ## Components
//!
//! 1. CameraRegistry - camera records (create / list / delete)
//! 2. DetectionEventStore - detection events with nested person detections
//! 3. DatasetExporter - Datumaro/COCO dataset bundle export (zip)
//! 4. WebAPI - REST endpoints
//!
//! Storage sits behind repository traits (`CameraRepository`,
//! `DetectionEventRepository`) with MySQL implementations; services hold
//! them as trait objects so backends can be swapped or faked.

pub mod camera_registry;
pub mod dataset_export;
pub mod detection_event;
pub mod error;
pub mod models;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::{AppConfig, AppState};
