#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use door_panels::controllers::ControlPanel;
use door_panels::errors::{DoorPanelError, DoorPanelResult};
use door_panels::models::{Account, GripSizeCategory, RobotChannel};
use door_panels::services::{AccountDirectory, CommandDispatcher, OrderStore, Transport};

/// Records every payload instead of opening a socket
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(RobotChannel, String)>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(RobotChannel, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_on(&self, channel: RobotChannel) -> Vec<String> {
        self.sent().into_iter().filter(|(c, _)| *c == channel).map(|(_, p)| p).collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn transmit(&self, channel: RobotChannel, payload: &[u8]) -> DoorPanelResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DoorPanelError::dispatch(
                channel,
                io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }
        let text = String::from_utf8(payload.to_vec()).unwrap();
        self.sent.lock().unwrap().push((channel, text));
        Ok(())
    }

    fn port(&self, channel: RobotChannel) -> u16 {
        match channel {
            RobotChannel::Control => 29999,
            RobotChannel::Motion => 30002,
        }
    }
}

/// Plain-text accounts keyed by username
pub struct InMemoryAccounts {
    accounts: Mutex<HashMap<String, (String, bool)>>,
}

impl InMemoryAccounts {
    pub fn with(entries: &[(&str, &str, bool)]) -> Self {
        let accounts = entries
            .iter()
            .map(|(name, password, admin)| (name.to_string(), (password.to_string(), *admin)))
            .collect();
        Self { accounts: Mutex::new(accounts) }
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccounts {
    async fn username_exists(&self, username: &str) -> DoorPanelResult<bool> {
        Ok(self.accounts.lock().unwrap().contains_key(username))
    }

    async fn credentials_correct(&self, username: &str, password: &str) -> DoorPanelResult<bool> {
        Ok(self.accounts.lock().unwrap().get(username).is_some_and(|(p, _)| p == password))
    }

    async fn create_account(&self, username: &str, password: &str, is_admin: bool) -> DoorPanelResult<()> {
        self.accounts.lock().unwrap().insert(username.to_string(), (password.to_string(), is_admin));
        Ok(())
    }

    async fn get_account(&self, username: &str) -> DoorPanelResult<Account> {
        let accounts = self.accounts.lock().unwrap();
        let (_, is_admin) = accounts
            .get(username)
            .ok_or_else(|| DoorPanelError::AccountNotFound(username.to_string()))?;
        Ok(Account {
            username: username.to_string(),
            salt: Vec::new(),
            salted_password_hash: Vec::new(),
            is_admin: *is_admin,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    pub id: i64,
    pub operator: String,
    pub door_size: GripSizeCategory,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

#[derive(Default)]
pub struct InMemoryOrders {
    orders: Mutex<Vec<StoredOrder>>,
    failing: AtomicBool,
}

impl InMemoryOrders {
    pub fn orders(&self) -> Vec<StoredOrder> {
        self.orders.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> DoorPanelResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DoorPanelError::DatabaseError(sqlx_oldapi::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrders {
    async fn record_order_start(&self, operator: &str, door_size: GripSizeCategory, started_at: NaiveDateTime) -> DoorPanelResult<i64> {
        self.check()?;
        let mut orders = self.orders.lock().unwrap();
        let id = orders.len() as i64 + 1;
        orders.push(StoredOrder {
            id,
            operator: operator.to_string(),
            door_size,
            started_at,
            finished_at: None,
        });
        Ok(id)
    }

    async fn record_order_finish(&self, order_id: i64, finished_at: NaiveDateTime) -> DoorPanelResult<()> {
        self.check()?;
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(DoorPanelError::DatabaseError(sqlx_oldapi::Error::RowNotFound))?;
        order.finished_at = Some(finished_at);
        Ok(())
    }
}

pub struct Fixture {
    pub transport: Arc<RecordingTransport>,
    pub orders: Arc<InMemoryOrders>,
    pub panel: ControlPanel,
}

pub fn fixture() -> Fixture {
    let transport = Arc::new(RecordingTransport::default());
    let orders = Arc::new(InMemoryOrders::default());
    let accounts = Arc::new(InMemoryAccounts::with(&[
        ("admin", "admin", true),
        ("Ida", "Ida", false),
    ]));
    let panel = ControlPanel::new(
        CommandDispatcher::new(transport.clone()),
        accounts,
        orders.clone(),
        GripSizeCategory::Medium,
    );
    Fixture { transport, orders, panel }
}
