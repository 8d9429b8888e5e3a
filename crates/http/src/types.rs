//! Request and response payloads for the fleet API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Body of a token refresh or blacklist call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// New access token minted by the refresh endpoint; the refresh token
/// itself is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Account creation payload for the registration endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Password confirmation, validated server-side
    pub password2: String,
}

/// Equipment creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub model: String,
    pub initial_hour_machine: f64,
    /// Device id the equipment is paired with
    pub device: String,
}

impl NewEquipment {
    /// Apply the form defaults: missing model becomes "N/A", missing
    /// initial hour meter becomes 0.
    pub fn new(name: impl Into<String>, model: Option<String>, device: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.filter(|m| !m.is_empty()).unwrap_or_else(|| "N/A".into()),
            initial_hour_machine: 0.0,
            device: device.into(),
        }
    }

    pub fn with_initial_hours(mut self, hours: f64) -> Self {
        self.initial_hour_machine = hours;
        self
    }
}

/// Equipment update payload (full replace)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentUpdate {
    pub name: String,
    pub model: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_hour_machine: Option<f64>,
}

/// Employee create/update form, sent as multipart form data.
///
/// Empty fields are omitted from the form; the photo, when present, is
/// uploaded as a file part.
#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    /// Equipment id the employee operates
    pub equipment: Option<i64>,
    /// Local path of a photo to upload
    pub photo: Option<PathBuf>,
}

/// Counter-reset payload for a maintenance schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceReset {
    pub worked_hours: f64,
    pub alarm_hours: f64,
    pub remaining_hours: f64,
}

impl MaintenanceReset {
    /// Zero the worked hours and restore the full alarm window
    pub fn from_alarm_hours(alarm_hours: f64) -> Self {
        Self {
            worked_hours: 0.0,
            alarm_hours,
            remaining_hours: alarm_hours,
        }
    }
}
