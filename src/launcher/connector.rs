use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Why a room connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    ClientInitiated,
    ConnectionLost,
    ServerShutdown,
    RoomDeleted,
    Unknown,
}

/// Media options for a room connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub audio: bool,
    pub video: bool,
}

impl ConnectOptions {
    /// Interviews are voice only
    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// Control surface of a live room connection
#[async_trait]
pub trait RoomHandle: Send + Sync {
    /// Leave the room; the connection's disconnect signal fires afterwards
    async fn leave(&self) -> Result<()>;
}

/// An established room connection.
///
/// `disconnected` resolves once, when the platform reports the end of the
/// session. A dropped sender counts as a disconnect.
pub struct RoomConnection {
    pub handle: Box<dyn RoomHandle>,
    pub disconnected: oneshot::Receiver<DisconnectReason>,
}

/// Joins a real-time room with an issued credential
#[async_trait]
pub trait RoomConnector: Send + Sync {
    async fn connect(
        &self,
        server_url: &str,
        token: &str,
        options: ConnectOptions,
    ) -> Result<RoomConnection>;
}

/// Navigation side effect of the launcher
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Forwards navigation requests over a channel
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, destination: &str) {
        info!("Navigating to {}", destination);
        let _ = self.tx.send(destination.to_string());
    }
}
