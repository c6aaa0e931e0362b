use std::io;
use std::time::Duration;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;
use crate::config::RobotSettings;
use crate::errors::{DoorPanelError, DoorPanelResult};
use crate::models::RobotChannel;

/// A connection-oriented byte sink towards the robot controller.
///
/// One call is one connection: open, write the whole payload, release. Nothing is read back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Writes `payload` to the given channel
    ///
    /// # Returns
    ///
    /// * `Ok(())` once every byte has been written and flushed
    /// * `Err(DoorPanelError::DispatchFailed)` on refusal, timeout or a mid-write failure
    async fn transmit(&self, channel: RobotChannel, payload: &[u8]) -> DoorPanelResult<()>;

    /// The port a channel is sent to, for audit logging
    fn port(&self, channel: RobotChannel) -> u16;
}

/// # TcpTransport
///
/// Plain TCP transport to the robot controller's dashboard and script servers.
///
/// Connect and write are each bounded by their own `tokio::time::timeout`. A timeout surfaces as
/// `io::ErrorKind::TimedOut` inside `DispatchFailed`.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    control_port: u16,
    motion_port: u16,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, control_port: u16, motion_port: u16, connect_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            control_port,
            motion_port,
            connect_timeout,
            write_timeout,
        }
    }

    pub fn from_settings(settings: &RobotSettings) -> Self {
        Self::new(
            settings.host.clone(),
            settings.control_port,
            settings.motion_port,
            settings.connect_timeout(),
            settings.write_timeout(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn connect(&self, channel: RobotChannel) -> io::Result<TcpStream> {
        let addr = (self.host.as_str(), self.port(channel));
        tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect to {}:{} timed out after {:?}", self.host, self.port(channel), self.connect_timeout),
            ))?
    }

    async fn write_all(&self, stream: &mut TcpStream, payload: &[u8]) -> io::Result<()> {
        let write = async {
            stream.write_all(payload).await?;
            stream.flush().await
        };
        tokio::time::timeout(self.write_timeout, write)
            .await
            .map_err(|_| io::Error::new(
                io::ErrorKind::TimedOut,
                format!("write of {} bytes timed out after {:?}", payload.len(), self.write_timeout),
            ))?
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn transmit(&self, channel: RobotChannel, payload: &[u8]) -> DoorPanelResult<()> {
        let mut stream = self.connect(channel)
            .await
            .map_err(|e| DoorPanelError::dispatch(channel, e))?;

        self.write_all(&mut stream, payload)
            .await
            .map_err(|e| DoorPanelError::dispatch(channel, e))?;

        // The payload is already flushed, a failed close does not undo delivery
        if let Err(e) = stream.shutdown().await {
            debug!("Closing {} connection to {} failed: {}", channel, self.host, e);
        }
        Ok(())
    }

    fn port(&self, channel: RobotChannel) -> u16 {
        match channel {
            RobotChannel::Control => self.control_port,
            RobotChannel::Motion => self.motion_port,
        }
    }
}
