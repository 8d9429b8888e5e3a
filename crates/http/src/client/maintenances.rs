//! Maintenance API client methods

use super::{paths, ApiClient, RequestSpec};
use crate::client::error::ClientError;
use crate::types::MaintenanceReset;
use muster_core::types::Maintenance;

impl ApiClient {
    pub async fn list_maintenances(&self) -> Result<Vec<Maintenance>, ClientError> {
        self.execute(RequestSpec::get(paths::MAINTENANCES)).await
    }

    /// Zero the worked-hours counter of a schedule, restoring the full
    /// alarm window
    pub async fn reset_maintenance(
        &self,
        id: i64,
        alarm_hours: f64,
    ) -> Result<Maintenance, ClientError> {
        let payload = MaintenanceReset::from_alarm_hours(alarm_hours);
        let spec = RequestSpec::patch(format!("{}{id}/", paths::MAINTENANCES)).json(&payload)?;
        self.execute(spec).await
    }

    pub async fn delete_maintenance(&self, id: i64) -> Result<(), ClientError> {
        self.execute_unit(RequestSpec::delete(format!("{}{id}/", paths::MAINTENANCES)))
            .await
    }
}
