//! Camera domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub camera_id: u64,
    pub name: String,
    pub location: Option<String>,
    pub stream_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Camera creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCamera {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
}
