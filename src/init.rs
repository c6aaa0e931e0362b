use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use crate::config::Settings;
use crate::controllers::ControlPanel;
use crate::models::GripSizeCategory;
use crate::services::{AccountService, CommandDispatcher, DatabaseService, PasswordHasher, TcpTransport};
use crate::state_management::{PanelCommandProcessor, PanelHandle};
use crate::utils::logging;


pub struct AppContext {
    pub settings: Arc<Settings>,
    pub db_service: DatabaseService,
    pub panel: PanelHandle,
    pub processor: PanelCommandProcessor,
    /// Flushes the log file when dropped
    pub log_guard: Option<WorkerGuard>,
}

/// Loads settings, starts logging, opens the database, seeds accounts and wires the control panel
pub async fn initialize() -> Result<AppContext> {
    let settings = Arc::new(Settings::new()?);
    let log_guard = logging::init_logger(settings.logging.path.clone(), &settings.logging.level)?;
    build(settings, log_guard).await
}

/// Wires the application from already loaded settings
pub async fn build(settings: Arc<Settings>, log_guard: Option<WorkerGuard>) -> Result<AppContext> {
    let db_service = DatabaseService::new(&settings.database)
        .await
        .context("Failed to open the order database")?;

    let accounts = Arc::new(AccountService::new(
        db_service.client().clone(),
        PasswordHasher::from_settings(&settings.security),
    ));
    accounts.seed_accounts(&settings.seed_accounts)
        .await
        .context("Failed to seed accounts")?;

    let transport = Arc::new(TcpTransport::from_settings(&settings.robot));
    info!(
        "Robot controller at {} (control port {}, motion port {})",
        transport.host(), settings.robot.control_port, settings.robot.motion_port
    );
    let dispatcher = CommandDispatcher::new(transport);

    let default_size = GripSizeCategory::parse(&settings.panel.default_door_size);
    let panel = ControlPanel::new(
        dispatcher,
        accounts,
        Arc::new(db_service.clone()),
        default_size,
    );

    let (processor, panel) = PanelCommandProcessor::new(
        panel,
        Some(db_service.clone()),
        settings.panel.command_queue_depth,
    );

    Ok(AppContext {
        settings,
        db_service,
        panel,
        processor,
        log_guard,
    })
}
