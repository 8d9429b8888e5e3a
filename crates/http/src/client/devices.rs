//! Device API client methods

use super::{paths, ApiClient, RequestSpec};
use crate::client::error::ClientError;
use muster_core::types::Device;

impl ApiClient {
    pub async fn list_devices(&self) -> Result<Vec<Device>, ClientError> {
        self.execute(RequestSpec::get(paths::DEVICES)).await
    }

    /// Single device, used to read its last reported position
    pub async fn get_device(&self, id: &str) -> Result<Device, ClientError> {
        self.execute(RequestSpec::get(format!("{}{id}/", paths::DEVICES)))
            .await
    }

    /// Devices not yet paired with an equipment
    pub async fn list_available_devices(&self) -> Result<Vec<Device>, ClientError> {
        let spec = RequestSpec::get(paths::DEVICES).query("available", "true");
        self.execute(spec).await
    }
}
