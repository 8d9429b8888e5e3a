//! Muster core types and utilities

pub mod error;
pub mod fleet;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use fleet::{FleetSummary, MaintenanceUrgency};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{Credentials, Device, Employee, Equipment, Maintenance, TokenPair};
