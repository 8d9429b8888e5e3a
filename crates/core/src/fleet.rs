//! Fleet-wide dashboard arithmetic.
//!
//! Pure functions over the resource collections: headline counts and the
//! remaining-hours urgency classification used to highlight equipment
//! that is close to its next maintenance.

use crate::types::{Device, Employee, Equipment, Maintenance};
use serde::{Deserialize, Serialize};

/// How urgently an equipment needs maintenance, derived from the share
/// of work hours still remaining before the next scheduled service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceUrgency {
    Normal,
    Attention,
    Warning,
    Critical,
}

impl MaintenanceUrgency {
    /// Classify by remaining percentage: <=10% critical, <=30% warning,
    /// <=50% attention. Equipment not under a maintenance schedule is
    /// always normal.
    pub fn classify(in_maintenance: bool, remaining_hours: f64, work_hours: f64) -> Self {
        if !in_maintenance || work_hours <= 0.0 {
            return Self::Normal;
        }

        let remaining_percentage = (remaining_hours / work_hours) * 100.0;

        if remaining_percentage <= 10.0 {
            Self::Critical
        } else if remaining_percentage <= 30.0 {
            Self::Warning
        } else if remaining_percentage <= 50.0 {
            Self::Attention
        } else {
            Self::Normal
        }
    }

    pub fn for_equipment(equipment: &Equipment) -> Self {
        Self::classify(
            equipment.in_maintenance(),
            equipment.min_remaining_hours,
            equipment.work_hours,
        )
    }
}

impl std::fmt::Display for MaintenanceUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Attention => "attention",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Headline counts shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub device_total: usize,
    pub devices_active: usize,
    pub equipment_total: usize,
    pub maintenance_total: usize,
    pub maintenance_pending: usize,
    pub employee_total: usize,
}

impl FleetSummary {
    pub fn from_parts(
        devices: &[Device],
        equipments: &[Equipment],
        maintenances: &[Maintenance],
        employees: &[Employee],
    ) -> Self {
        Self {
            device_total: devices.len(),
            devices_active: devices.iter().filter(|d| d.is_active()).count(),
            equipment_total: equipments.len(),
            maintenance_total: maintenances.len(),
            maintenance_pending: maintenances.iter().filter(|m| m.is_pending()).count(),
            employee_total: employees.len(),
        }
    }
}

/// Per-equipment series for the worked-hours chart
pub fn worked_hours_series(equipments: &[Equipment]) -> Vec<(String, f64)> {
    equipments
        .iter()
        .map(|e| (e.name.clone(), e.worked_hours))
        .collect()
}

/// Per-equipment series for the devices-per-equipment chart
pub fn devices_count_series(equipments: &[Equipment]) -> Vec<(String, u32)> {
    equipments
        .iter()
        .map(|e| (e.name.clone(), e.devices_count.unwrap_or(0)))
        .collect()
}

/// Per-equipment series of open maintenance schedules (no work order yet)
pub fn pending_maintenances_series(
    equipments: &[Equipment],
    maintenances: &[Maintenance],
) -> Vec<(String, usize)> {
    equipments
        .iter()
        .map(|e| {
            let count = maintenances
                .iter()
                .filter(|m| m.is_pending() && m.equipment.as_ref().is_some_and(|r| r.id == e.id))
                .count();
            (e.name.clone(), count)
        })
        .collect()
}

/// Per-equipment series of assigned employees
pub fn employees_count_series(
    equipments: &[Equipment],
    employees: &[Employee],
) -> Vec<(String, usize)> {
    equipments
        .iter()
        .map(|e| {
            let count = employees
                .iter()
                .filter(|emp| emp.equipment.as_ref().is_some_and(|r| r.id == e.id))
                .count();
            (e.name.clone(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EquipmentDevice, EquipmentRef};

    fn equipment(id: i64, name: &str) -> Equipment {
        Equipment {
            id,
            name: name.into(),
            model: None,
            device: None,
            initial_hour_machine: None,
            worked_hours: 0.0,
            work_hours: 0.0,
            min_remaining_hours: 0.0,
            devices_count: None,
        }
    }

    fn employee(id: i64, equipment: Option<i64>) -> Employee {
        Employee {
            id,
            first_name: "Ana".into(),
            last_name: "Reis".into(),
            email: format!("ana{id}@smartlogger.io"),
            phone: None,
            position: None,
            hire_date: None,
            equipment: equipment.map(|id| EquipmentRef { id, name: None }),
            photo: None,
        }
    }

    fn device(status: Option<&str>) -> Device {
        Device {
            device_id: "dev-1".into(),
            model: "Tractor GPS".into(),
            status: status.map(Into::into),
            available: None,
            latitude: None,
            longitude: None,
            in_maintenance: false,
        }
    }

    fn maintenance(os: Option<&str>) -> Maintenance {
        Maintenance {
            id: 1,
            name: "Oil change".into(),
            os: os.map(Into::into),
            worked_hours: 10.0,
            alarm_hours: 100.0,
            remaining_hours: 90.0,
            equipment: None,
        }
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(
            MaintenanceUrgency::classify(true, 5.0, 100.0),
            MaintenanceUrgency::Critical
        );
        assert_eq!(
            MaintenanceUrgency::classify(true, 10.0, 100.0),
            MaintenanceUrgency::Critical
        );
        assert_eq!(
            MaintenanceUrgency::classify(true, 30.0, 100.0),
            MaintenanceUrgency::Warning
        );
        assert_eq!(
            MaintenanceUrgency::classify(true, 50.0, 100.0),
            MaintenanceUrgency::Attention
        );
        assert_eq!(
            MaintenanceUrgency::classify(true, 80.0, 100.0),
            MaintenanceUrgency::Normal
        );
    }

    #[test]
    fn urgency_ignores_equipment_not_in_maintenance() {
        assert_eq!(
            MaintenanceUrgency::classify(false, 1.0, 100.0),
            MaintenanceUrgency::Normal
        );
    }

    #[test]
    fn urgency_handles_zero_work_hours() {
        assert_eq!(
            MaintenanceUrgency::classify(true, 0.0, 0.0),
            MaintenanceUrgency::Normal
        );
    }

    #[test]
    fn urgency_from_equipment_uses_device_flag() {
        let equipment = Equipment {
            id: 1,
            name: "Forklift 3".into(),
            model: None,
            device: Some(EquipmentDevice {
                device_id: "dev-9".into(),
                in_maintenance: true,
            }),
            initial_hour_machine: None,
            worked_hours: 92.0,
            work_hours: 100.0,
            min_remaining_hours: 8.0,
            devices_count: None,
        };
        assert_eq!(
            MaintenanceUrgency::for_equipment(&equipment),
            MaintenanceUrgency::Critical
        );
    }

    #[test]
    fn summary_counts_active_devices_and_pending_maintenances() {
        let devices = vec![device(Some("active")), device(Some("idle")), device(None)];
        let maintenances = vec![maintenance(None), maintenance(Some("OS-42"))];

        let summary = FleetSummary::from_parts(&devices, &[], &maintenances, &[]);

        assert_eq!(summary.device_total, 3);
        assert_eq!(summary.devices_active, 1);
        assert_eq!(summary.maintenance_total, 2);
        assert_eq!(summary.maintenance_pending, 1);
    }

    #[test]
    fn pending_series_counts_open_schedules_per_equipment() {
        let equipments = vec![equipment(1, "Loader 1"), equipment(2, "Loader 2")];

        let mut open = maintenance(None);
        open.equipment = Some(EquipmentRef { id: 1, name: None });
        let mut closed = maintenance(Some("OS-7"));
        closed.equipment = Some(EquipmentRef { id: 1, name: None });
        let unassigned = maintenance(None);

        let series = pending_maintenances_series(&equipments, &[open, closed, unassigned]);
        assert_eq!(
            series,
            vec![("Loader 1".to_string(), 1), ("Loader 2".to_string(), 0)]
        );
    }

    #[test]
    fn employees_series_counts_assignments_per_equipment() {
        let equipments = vec![equipment(1, "Loader 1"), equipment(2, "Loader 2")];
        let employees = vec![employee(1, Some(1)), employee(2, Some(1)), employee(3, None)];

        let series = employees_count_series(&equipments, &employees);
        assert_eq!(
            series,
            vec![("Loader 1".to_string(), 2), ("Loader 2".to_string(), 0)]
        );
    }
}
