use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Access/refresh token pair returned by the login endpoint.
///
/// The access token authorizes API requests; the refresh token is used
/// solely to mint new access tokens or to be blacklisted at logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Reference to an equipment embedded in other resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub equipment: Option<EquipmentRef>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Device reference embedded in an equipment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentDevice {
    pub device_id: String,
    #[serde(default)]
    pub in_maintenance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub device: Option<EquipmentDevice>,
    #[serde(default)]
    pub initial_hour_machine: Option<f64>,
    #[serde(default)]
    pub worked_hours: f64,
    #[serde(default)]
    pub work_hours: f64,
    #[serde(default)]
    pub min_remaining_hours: f64,
    #[serde(default)]
    pub devices_count: Option<u32>,
}

impl Equipment {
    /// Whether the attached device currently flags this equipment as
    /// under a maintenance schedule.
    pub fn in_maintenance(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.in_maintenance)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub model: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub in_maintenance: bool,
}

impl Device {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }

    /// Coordinates when the device has reported a position
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: i64,
    pub name: String,
    /// Work order reference; a maintenance without one is pending
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub worked_hours: f64,
    #[serde(default)]
    pub alarm_hours: f64,
    #[serde(default)]
    pub remaining_hours: f64,
    #[serde(default)]
    pub equipment: Option<EquipmentRef>,
}

impl Maintenance {
    pub fn is_pending(&self) -> bool {
        self.os.is_none()
    }
}
