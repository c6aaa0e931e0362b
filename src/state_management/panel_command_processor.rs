use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use crate::controllers::{stop_robot, ActionAvailability, ControlPanel, PanelSnapshot};
use crate::errors::{DoorPanelError, DoorPanelResult};
use crate::models::{GripSizeCategory, OrderLog, StatusMessage};
use crate::services::{CommandDispatcher, DatabaseService};

/// Represents the different commands that can be processed by the PanelCommandProcessor
#[derive(Debug)]
pub enum PanelCommand {
    Login(String, String, oneshot::Sender<StatusMessage>),
    Logout(oneshot::Sender<StatusMessage>),
    SelectSize(GripSizeCategory, oneshot::Sender<StatusMessage>),
    BrakeRelease(oneshot::Sender<StatusMessage>),
    MoveToWorkTable(oneshot::Sender<StatusMessage>),
    MoveToStorage(oneshot::Sender<StatusMessage>),
    FinishOrder(oneshot::Sender<StatusMessage>),
    AvailableActions(oneshot::Sender<ActionAvailability>),
    Snapshot(oneshot::Sender<PanelSnapshot>),
    RecentOrders(u32, oneshot::Sender<DoorPanelResult<Vec<OrderLog>>>),
}

impl PanelCommand {
    fn name(&self) -> &'static str {
        match self {
            PanelCommand::Login(..) => "Login",
            PanelCommand::Logout(_) => "Logout",
            PanelCommand::SelectSize(..) => "SelectSize",
            PanelCommand::BrakeRelease(_) => "BrakeRelease",
            PanelCommand::MoveToWorkTable(_) => "MoveToWorkTable",
            PanelCommand::MoveToStorage(_) => "MoveToStorage",
            PanelCommand::FinishOrder(_) => "FinishOrder",
            PanelCommand::AvailableActions(_) => "AvailableActions",
            PanelCommand::Snapshot(_) => "Snapshot",
            PanelCommand::RecentOrders(..) => "RecentOrders",
        }
    }
}

/// Processes panel commands one at a time, in arrival order
pub struct PanelCommandProcessor {
    command_receiver: mpsc::Receiver<PanelCommand>,
    panel: ControlPanel,
    database: Option<DatabaseService>,
    busy: Arc<AtomicBool>,
}

impl PanelCommandProcessor {
    /// Creates the processor and the handle used to talk to it
    ///
    /// # Arguments
    ///
    /// * `panel` - The control panel this processor owns exclusively
    /// * `database` - Source for order history queries, if any
    /// * `queue_depth` - Capacity of the command queue
    pub fn new(panel: ControlPanel, database: Option<DatabaseService>, queue_depth: usize) -> (Self, PanelHandle) {
        let (command_sender, command_receiver) = mpsc::channel(queue_depth.max(1));
        let busy = Arc::new(AtomicBool::new(false));
        let handle = PanelHandle {
            command_sender,
            busy: Arc::clone(&busy),
            pending: Arc::new(AtomicUsize::new(0)),
            dispatcher: panel.dispatcher().clone(),
        };
        let processor = Self {
            command_receiver,
            panel,
            database,
            busy,
        };
        (processor, handle)
    }

    /// Runs the command processing loop
    ///
    /// This method receives commands until every `PanelHandle` has been dropped
    pub async fn run(mut self) -> DoorPanelResult<()> {
        info!("Panel command processor started");
        while let Some(command) = self.command_receiver.recv().await {
            let name = command.name();
            self.busy.store(true, Ordering::SeqCst);
            let result = self.process_command(command).await;
            self.busy.store(false, Ordering::SeqCst);
            if let Err(e) = result {
                // The caller stopped waiting; the command itself has already run
                error!("Error answering {} command: {:?}", name, e);
            }
        }
        info!("Panel command processor stopped");
        Ok(())
    }

    async fn process_command(&mut self, command: PanelCommand) -> DoorPanelResult<()> {
        debug!("Processing {} command", command.name());
        match command {
            PanelCommand::Login(username, password, response_sender) => {
                let result = self.panel.login(&username, &password).await;
                Self::respond(response_sender, result, "Login")
            }
            PanelCommand::Logout(response_sender) => {
                let result = self.panel.logout();
                Self::respond(response_sender, result, "Logout")
            }
            PanelCommand::SelectSize(size, response_sender) => {
                let result = self.panel.select_size(size);
                Self::respond(response_sender, result, "SelectSize")
            }
            PanelCommand::BrakeRelease(response_sender) => {
                let result = self.panel.brake_release().await;
                Self::respond(response_sender, result, "BrakeRelease")
            }
            PanelCommand::MoveToWorkTable(response_sender) => {
                let result = self.panel.move_to_work_table().await;
                Self::respond(response_sender, result, "MoveToWorkTable")
            }
            PanelCommand::MoveToStorage(response_sender) => {
                let result = self.panel.move_to_storage().await;
                Self::respond(response_sender, result, "MoveToStorage")
            }
            PanelCommand::FinishOrder(response_sender) => {
                let result = self.panel.finish_order().await;
                Self::respond(response_sender, result, "FinishOrder")
            }
            PanelCommand::AvailableActions(response_sender) => {
                Self::respond(response_sender, self.panel.available_actions(), "AvailableActions")
            }
            PanelCommand::Snapshot(response_sender) => {
                Self::respond(response_sender, self.panel.snapshot(), "Snapshot")
            }
            PanelCommand::RecentOrders(limit, response_sender) => {
                let result = match &self.database {
                    Some(database) => database.recent_orders(limit).await,
                    None => Err(DoorPanelError::ConfigError("no order database configured".to_string())),
                };
                Self::respond(response_sender, result, "RecentOrders")
            }
        }
    }

    fn respond<T>(response_sender: oneshot::Sender<T>, value: T, name: &str) -> DoorPanelResult<()> {
        response_sender
            .send(value)
            .map_err(|_| DoorPanelError::ChannelSendError(format!("Failed to send {} response", name)))
    }
}

/// Cloneable front end of the panel command processor
///
/// Every request is counted as pending from the moment its method is called, before the returned future
/// is polled, until its reply arrives or the future is dropped.
#[derive(Clone)]
pub struct PanelHandle {
    command_sender: mpsc::Sender<PanelCommand>,
    busy: Arc<AtomicBool>,
    pending: Arc<AtomicUsize>,
    dispatcher: CommandDispatcher,
}

impl PanelHandle {
    /// Whether a command is queued or being processed. Action controls should be disabled while true.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) || self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn login(&self, username: &str, password: &str) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        let (username, password) = (username.to_string(), password.to_string());
        self.request(move |tx| PanelCommand::Login(username, password, tx))
    }

    pub fn logout(&self) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(PanelCommand::Logout)
    }

    pub fn select_size(&self, size: GripSizeCategory) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(move |tx| PanelCommand::SelectSize(size, tx))
    }

    pub fn brake_release(&self) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(PanelCommand::BrakeRelease)
    }

    pub fn move_to_work_table(&self) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(PanelCommand::MoveToWorkTable)
    }

    pub fn move_to_storage(&self) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(PanelCommand::MoveToStorage)
    }

    pub fn finish_order(&self) -> impl Future<Output = DoorPanelResult<StatusMessage>> + Send + 'static {
        self.request(PanelCommand::FinishOrder)
    }

    pub async fn available_actions(&self) -> DoorPanelResult<ActionAvailability> {
        self.request(PanelCommand::AvailableActions).await
    }

    pub async fn snapshot(&self) -> DoorPanelResult<PanelSnapshot> {
        self.request(PanelCommand::Snapshot).await
    }

    pub async fn recent_orders(&self, limit: u32) -> DoorPanelResult<Vec<OrderLog>> {
        self.request(move |tx| PanelCommand::RecentOrders(limit, tx)).await?
    }

    /// Sends `stop` straight to the control channel without queueing behind other commands
    pub async fn stop(&self) -> StatusMessage {
        stop_robot(&self.dispatcher).await
    }

    /// Marks the request pending right away, then enqueues it and waits for the reply when polled
    fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> PanelCommand) -> impl Future<Output = DoorPanelResult<T>> + Send + 'static
        where
            T: Send + 'static,
    {
        let pending = PendingRequest::new(&self.pending);
        let (response_sender, response_receiver) = oneshot::channel();
        let command = command(response_sender);
        let command_sender = self.command_sender.clone();
        async move {
            let _pending = pending;
            command_sender.send(command).await?;
            Ok::<T, DoorPanelError>(response_receiver.await?)
        }
    }
}

/// Counts one outstanding request for as long as it lives
struct PendingRequest(Arc<AtomicUsize>);

impl PendingRequest {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
