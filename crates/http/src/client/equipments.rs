//! Equipment API client methods

use super::{paths, ApiClient, RequestSpec};
use crate::client::error::ClientError;
use crate::types::{EquipmentUpdate, NewEquipment};
use muster_core::types::Equipment;

impl ApiClient {
    pub async fn list_equipments(&self) -> Result<Vec<Equipment>, ClientError> {
        self.execute(RequestSpec::get(paths::EQUIPMENTS)).await
    }

    pub async fn get_equipment(&self, id: i64) -> Result<Equipment, ClientError> {
        self.execute(RequestSpec::get(format!("{}{id}/", paths::EQUIPMENTS)))
            .await
    }

    pub async fn create_equipment(&self, payload: &NewEquipment) -> Result<Equipment, ClientError> {
        let spec = RequestSpec::post(paths::EQUIPMENTS).json(payload)?;
        self.execute(spec).await
    }

    pub async fn update_equipment(
        &self,
        id: i64,
        payload: &EquipmentUpdate,
    ) -> Result<Equipment, ClientError> {
        let spec = RequestSpec::patch(format!("{}{id}/", paths::EQUIPMENTS)).json(payload)?;
        self.execute(spec).await
    }

    pub async fn delete_equipment(&self, id: i64) -> Result<(), ClientError> {
        self.execute_unit(RequestSpec::delete(format!("{}{id}/", paths::EQUIPMENTS)))
            .await
    }
}
