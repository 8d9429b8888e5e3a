//! Employee API client methods

use super::{paths, ApiClient, FormField, RequestSpec};
use crate::client::error::ClientError;
use crate::types::EmployeeForm;
use muster_core::types::Employee;

/// Flatten the form into multipart fields, skipping empty values the
/// way the dashboard form does.
fn form_fields(form: &EmployeeForm) -> Vec<FormField> {
    let mut fields = vec![
        FormField::Text {
            name: "first_name".into(),
            value: form.first_name.clone(),
        },
        FormField::Text {
            name: "last_name".into(),
            value: form.last_name.clone(),
        },
        FormField::Text {
            name: "email".into(),
            value: form.email.clone(),
        },
    ];

    let optional = [
        ("phone", form.phone.clone()),
        ("position", form.position.clone()),
        ("hire_date", form.hire_date.map(|d| d.to_string())),
        ("equipment", form.equipment.map(|id| id.to_string())),
    ];
    for (name, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.push(FormField::Text {
                name: name.into(),
                value,
            });
        }
    }

    if let Some(path) = &form.photo {
        fields.push(FormField::File {
            name: "photo".into(),
            path: path.clone(),
        });
    }

    fields
}

impl ApiClient {
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
        self.execute(RequestSpec::get(paths::EMPLOYEES)).await
    }

    pub async fn get_employee(&self, id: i64) -> Result<Employee, ClientError> {
        self.execute(RequestSpec::get(format!("{}{id}/", paths::EMPLOYEES)))
            .await
    }

    /// Create an employee from a multipart form, uploading the photo
    /// when one is attached
    pub async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee, ClientError> {
        let spec = RequestSpec::post(paths::EMPLOYEES).form(form_fields(form));
        self.execute(spec).await
    }

    /// Partial update; fields left empty in the form are not sent and
    /// stay unchanged on the server
    pub async fn update_employee(
        &self,
        id: i64,
        form: &EmployeeForm,
    ) -> Result<Employee, ClientError> {
        let spec =
            RequestSpec::patch(format!("{}{id}/", paths::EMPLOYEES)).form(form_fields(form));
        self.execute(spec).await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), ClientError> {
        self.execute_unit(RequestSpec::delete(format!("{}{id}/", paths::EMPLOYEES)))
            .await
    }
}
