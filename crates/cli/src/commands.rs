//! CLI commands

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use muster_core::fleet::{
    devices_count_series, employees_count_series, pending_maintenances_series,
    worked_hours_series, FleetSummary, MaintenanceUrgency,
};
use muster_core::store::FileTokenStore;
use muster_core::types::Credentials;
use muster_http::types::{EmployeeForm, EquipmentUpdate, NewEquipment, RegisterRequest};
use muster_http::{ApiClient, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token pair
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account (does not sign in)
    Signup {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        confirm: String,
    },

    /// Blacklist the refresh token and clear the local session
    Logout,

    /// Show the current session state
    Session,

    /// Employee records
    Employees {
        #[command(subcommand)]
        command: EmployeeCommands,
    },

    /// Fleet equipment
    Equipments {
        #[command(subcommand)]
        command: EquipmentCommands,
    },

    /// IoT devices
    Devices {
        #[command(subcommand)]
        command: DeviceCommands,
    },

    /// Maintenance schedules
    Maintenances {
        #[command(subcommand)]
        command: MaintenanceCommands,
    },

    /// Fleet summary and per-equipment maintenance urgency
    Dashboard,

    /// Periodically re-fetch and print a resource list
    Watch {
        target: WatchTarget,

        /// Seconds between fetches
        #[arg(long, default_value = "30")]
        interval: u64,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    List,
    Get {
        id: i64,
    },
    Create {
        #[command(flatten)]
        form: EmployeeFormArgs,
    },
    Update {
        id: i64,
        #[command(flatten)]
        form: EmployeeFormArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(clap::Args)]
pub struct EmployeeFormArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    position: Option<String>,

    /// Hire date, YYYY-MM-DD
    #[arg(long)]
    hire_date: Option<NaiveDate>,

    /// Equipment id the employee operates
    #[arg(long)]
    equipment: Option<i64>,

    /// Photo file to upload
    #[arg(long)]
    photo: Option<PathBuf>,
}

impl From<EmployeeFormArgs> for EmployeeForm {
    fn from(args: EmployeeFormArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            position: args.position,
            hire_date: args.hire_date,
            equipment: args.equipment,
            photo: args.photo,
        }
    }
}

#[derive(Subcommand)]
pub enum EquipmentCommands {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        model: Option<String>,

        /// Device id to pair with
        #[arg(long)]
        device: String,

        /// Initial hour meter reading
        #[arg(long)]
        initial_hours: Option<f64>,
    },
    Update {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        device: String,

        #[arg(long)]
        initial_hours: Option<f64>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    List {
        /// Only devices not yet paired with an equipment
        #[arg(long)]
        available: bool,
    },
    Get {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MaintenanceCommands {
    List,
    /// Zero the worked-hours counter of a schedule
    Reset {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum WatchTarget {
    Equipments,
    Maintenances,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate the default configuration file
    Generate {
        /// Output file path (defaults to MUSTER_STATE_DIR/config.json)
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,
}

impl Commands {
    pub async fn execute(self, data_dir: Option<PathBuf>) -> Result<()> {
        // Determine data directory with default fallback
        let data_dir = data_dir.unwrap_or_else(|| {
            // Check environment variable first, then fall back to system data dir
            if let Ok(state_dir) = std::env::var("MUSTER_STATE_DIR") {
                PathBuf::from(state_dir)
            } else {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("muster")
            }
        });

        match self {
            Commands::Config { command } => command.execute(data_dir),
            Commands::Login { email, password } => login(data_dir, email, password).await,
            Commands::Signup {
                first_name,
                last_name,
                email,
                password,
                confirm,
            } => signup(data_dir, first_name, last_name, email, password, confirm).await,
            Commands::Logout => logout(data_dir).await,
            Commands::Session => show_session(data_dir).await,
            Commands::Employees { command } => command.execute(build_client(&data_dir)?).await,
            Commands::Equipments { command } => command.execute(build_client(&data_dir)?).await,
            Commands::Devices { command } => command.execute(build_client(&data_dir)?).await,
            Commands::Maintenances { command } => command.execute(build_client(&data_dir)?).await,
            Commands::Dashboard => dashboard(build_client(&data_dir)?).await,
            Commands::Watch { target, interval } => {
                watch(build_client(&data_dir)?, target, interval).await
            }
        }
    }
}

fn build_client(data_dir: &Path) -> Result<ApiClient> {
    let config = config::load_config(data_dir.join(config::CONFIG_FILE))?;
    let store = Arc::new(FileTokenStore::new(data_dir)?);

    let mut builder = ApiClient::builder().base_url(config.base_url).store(store);
    if let Some(user_agent) = config.user_agent {
        builder = builder.user_agent(user_agent);
    }
    Ok(builder.build()?)
}

async fn login(data_dir: PathBuf, email: String, password: String) -> Result<()> {
    let mut session = Session::resume(build_client(&data_dir)?).await?;
    session.login(&Credentials { email, password }).await?;
    println!("Signed in. Session state: {}", session.state());
    Ok(())
}

async fn signup(
    data_dir: PathBuf,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm: String,
) -> Result<()> {
    if password != confirm {
        bail!("passwords do not match");
    }

    let session = Session::resume(build_client(&data_dir)?).await?;
    session
        .signup(&RegisterRequest {
            first_name,
            last_name,
            email,
            password,
            password2: confirm,
        })
        .await?;
    println!("Account created. Sign in with `muster login`.");
    Ok(())
}

async fn logout(data_dir: PathBuf) -> Result<()> {
    let mut session = Session::resume(build_client(&data_dir)?).await?;
    session.logout().await?;
    println!("Signed out.");
    Ok(())
}

async fn show_session(data_dir: PathBuf) -> Result<()> {
    let session = Session::resume(build_client(&data_dir)?).await?;
    println!("Session state: {}", session.state());
    Ok(())
}

impl EmployeeCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            EmployeeCommands::List => {
                let employees = client.list_employees().await?;
                println!("{:<6} {:<30} {:<30} {:<15}", "ID", "NAME", "EMAIL", "PHONE");
                for employee in employees {
                    println!(
                        "{:<6} {:<30} {:<30} {:<15}",
                        employee.id,
                        employee.full_name(),
                        employee.email,
                        employee.phone.as_deref().unwrap_or("-"),
                    );
                }
                Ok(())
            }
            EmployeeCommands::Get { id } => {
                let employee = client.get_employee(id).await?;
                println!("{}", serde_json::to_string_pretty(&employee)?);
                Ok(())
            }
            EmployeeCommands::Create { form } => {
                let employee = client.create_employee(&form.into()).await?;
                println!("Created employee {} ({})", employee.id, employee.full_name());
                Ok(())
            }
            EmployeeCommands::Update { id, form } => {
                let employee = client.update_employee(id, &form.into()).await?;
                println!("Updated employee {} ({})", employee.id, employee.full_name());
                Ok(())
            }
            EmployeeCommands::Delete { id } => {
                client.delete_employee(id).await?;
                println!("Deleted employee {id}");
                Ok(())
            }
        }
    }
}

impl EquipmentCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            EquipmentCommands::List => {
                let equipments = client.list_equipments().await?;
                println!(
                    "{:<6} {:<25} {:<20} {:>12} {:>12} {:<10}",
                    "ID", "NAME", "MODEL", "WORKED(H)", "REMAINING(H)", "URGENCY"
                );
                for equipment in equipments {
                    let urgency = MaintenanceUrgency::for_equipment(&equipment);
                    println!(
                        "{:<6} {:<25} {:<20} {:>12.1} {:>12.1} {:<10}",
                        equipment.id,
                        equipment.name,
                        equipment.model.as_deref().unwrap_or("N/A"),
                        equipment.worked_hours,
                        equipment.min_remaining_hours,
                        urgency,
                    );
                }
                Ok(())
            }
            EquipmentCommands::Get { id } => {
                let equipment = client.get_equipment(id).await?;
                println!("{}", serde_json::to_string_pretty(&equipment)?);
                Ok(())
            }
            EquipmentCommands::Create {
                name,
                model,
                device,
                initial_hours,
            } => {
                let mut payload = NewEquipment::new(name, model, device);
                if let Some(hours) = initial_hours {
                    payload = payload.with_initial_hours(hours);
                }
                let equipment = client.create_equipment(&payload).await?;
                println!("Created equipment {} ({})", equipment.id, equipment.name);
                Ok(())
            }
            EquipmentCommands::Update {
                id,
                name,
                model,
                device,
                initial_hours,
            } => {
                let payload = EquipmentUpdate {
                    name,
                    model,
                    device,
                    initial_hour_machine: initial_hours,
                };
                let equipment = client.update_equipment(id, &payload).await?;
                println!("Updated equipment {} ({})", equipment.id, equipment.name);
                Ok(())
            }
            EquipmentCommands::Delete { id } => {
                client.delete_equipment(id).await?;
                println!("Deleted equipment {id}");
                Ok(())
            }
        }
    }
}

impl DeviceCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            DeviceCommands::List { available } => {
                let devices = if available {
                    client.list_available_devices().await?
                } else {
                    client.list_devices().await?
                };
                println!(
                    "{:<15} {:<25} {:<10} {:<22}",
                    "DEVICE", "MODEL", "STATUS", "POSITION"
                );
                for device in devices {
                    let position = device
                        .position()
                        .map(|(lat, lon)| format!("{lat:.5},{lon:.5}"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<15} {:<25} {:<10} {:<22}",
                        device.device_id,
                        device.model,
                        device.status.as_deref().unwrap_or("-"),
                        position,
                    );
                }
                Ok(())
            }
            DeviceCommands::Get { id } => {
                let device = client.get_device(&id).await?;
                println!("{}", serde_json::to_string_pretty(&device)?);
                if let Some((lat, lon)) = device.position() {
                    println!("Position: {lat:.5},{lon:.5}");
                }
                Ok(())
            }
        }
    }
}

impl MaintenanceCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            MaintenanceCommands::List => {
                let maintenances = client.list_maintenances().await?;
                println!(
                    "{:<6} {:<30} {:>10} {:>10} {:>12} {:<8}",
                    "ID", "NAME", "WORKED", "ALARM", "REMAINING", "PENDING"
                );
                for maintenance in maintenances {
                    println!(
                        "{:<6} {:<30} {:>10.1} {:>10.1} {:>12.1} {:<8}",
                        maintenance.id,
                        maintenance.name,
                        maintenance.worked_hours,
                        maintenance.alarm_hours,
                        maintenance.remaining_hours,
                        if maintenance.is_pending() { "yes" } else { "no" },
                    );
                }
                Ok(())
            }
            MaintenanceCommands::Reset { id } => {
                // The alarm window comes from the existing record
                let record = client
                    .list_maintenances()
                    .await?
                    .into_iter()
                    .find(|m| m.id == id)
                    .ok_or_else(|| anyhow!("maintenance {id} not found"))?;
                let maintenance = client.reset_maintenance(id, record.alarm_hours).await?;
                println!(
                    "Reset maintenance {}: {} hours until the next alarm",
                    maintenance.id, maintenance.remaining_hours
                );
                Ok(())
            }
            MaintenanceCommands::Delete { id } => {
                client.delete_maintenance(id).await?;
                println!("Deleted maintenance {id}");
                Ok(())
            }
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, data_dir: PathBuf) -> Result<()> {
        match self {
            ConfigCommands::Generate { output } => {
                let config_path = if let Some(path) = output {
                    path
                } else {
                    data_dir.join(config::CONFIG_FILE)
                };

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
            ConfigCommands::Show => {
                let loaded = config::load_config(data_dir.join(config::CONFIG_FILE))?;
                println!("{}", serde_json::to_string_pretty(&loaded)?);
                Ok(())
            }
        }
    }
}

async fn dashboard(client: ApiClient) -> Result<()> {
    let devices = client.list_devices().await?;
    let equipments = client.list_equipments().await?;
    let maintenances = client.list_maintenances().await?;
    let employees = client.list_employees().await?;

    let summary = FleetSummary::from_parts(&devices, &equipments, &maintenances, &employees);

    println!("Fleet summary");
    println!(
        "  Devices:      {} ({} active)",
        summary.device_total, summary.devices_active
    );
    println!("  Equipments:   {}", summary.equipment_total);
    println!(
        "  Maintenances: {} ({} pending)",
        summary.maintenance_total, summary.maintenance_pending
    );
    println!("  Employees:    {}", summary.employee_total);

    let mut flagged: Vec<_> = equipments
        .iter()
        .map(|e| (e, MaintenanceUrgency::for_equipment(e)))
        .filter(|(_, urgency)| *urgency != MaintenanceUrgency::Normal)
        .collect();
    flagged.sort_by_key(|(e, _)| e.id);

    if flagged.is_empty() {
        println!("\nNo equipment close to its maintenance window.");
    } else {
        println!("\nEquipment needing attention:");
        for (equipment, urgency) in flagged {
            println!(
                "  [{}] {} - {:.1}h of {:.1}h remaining",
                urgency, equipment.name, equipment.min_remaining_hours, equipment.work_hours
            );
        }
    }

    println!("\nWorked hours per equipment:");
    for (name, hours) in worked_hours_series(&equipments) {
        println!("  {name:<25} {hours:>8.1}h");
    }

    println!("\nDevices per equipment:");
    for (name, count) in devices_count_series(&equipments) {
        println!("  {name:<25} {count:>8}");
    }

    println!("\nPending maintenances per equipment:");
    for (name, count) in pending_maintenances_series(&equipments, &maintenances) {
        println!("  {name:<25} {count:>8}");
    }

    println!("\nEmployees per equipment:");
    for (name, count) in employees_count_series(&equipments, &employees) {
        println!("  {name:<25} {count:>8}");
    }

    Ok(())
}

/// Fixed-interval re-fetch of a resource list, the CLI rendition of the
/// dashboard's 30-second polling. No backoff, no in-flight dedup.
async fn watch(client: ApiClient, target: WatchTarget, interval: u64) -> Result<()> {
    let interval = Duration::from_secs(interval.max(1));
    info!(?target, interval_secs = interval.as_secs(), "watching");

    loop {
        let result = match target {
            WatchTarget::Equipments => EquipmentCommands::List.execute(client.clone()).await,
            WatchTarget::Maintenances => MaintenanceCommands::List.execute(client.clone()).await,
        };
        // A failed fetch does not stop the polling
        if let Err(err) = result {
            tracing::warn!(error = %err, "fetch failed");
        }
        println!();
        tokio::time::sleep(interval).await;
    }
}
