use super::connector::{ConnectOptions, DisconnectReason, RoomConnection, RoomConnector, RoomHandle};
use anyhow::{Context, Result};
use async_trait::async_trait;
use livekit::prelude::{Room, RoomEvent, RoomOptions};
use livekit::proto;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};

type DisconnectSender = Arc<Mutex<Option<oneshot::Sender<DisconnectReason>>>>;

/// Joins rooms with the native LiveKit client.
///
/// Remote audio is subscribed to, but no local microphone track is
/// published: there is no audio capture in this crate, so a joined
/// session can listen to the agent but not speak to it.
#[derive(Debug, Default, Clone)]
pub struct LiveKitConnector;

struct LiveKitRoom {
    room: Arc<Room>,
    disconnect_tx: DisconnectSender,
}

#[async_trait]
impl RoomHandle for LiveKitRoom {
    async fn leave(&self) -> Result<()> {
        self.room.close().await.context("Failed to close LiveKit room")?;

        if let Some(tx) = self.disconnect_tx.lock().await.take() {
            let _ = tx.send(DisconnectReason::ClientInitiated);
        }
        Ok(())
    }
}

#[async_trait]
impl RoomConnector for LiveKitConnector {
    async fn connect(
        &self,
        server_url: &str,
        token: &str,
        options: ConnectOptions,
    ) -> Result<RoomConnection> {
        if options.video {
            warn!("Video was requested but interview rooms are audio only");
        }

        let room_options = RoomOptions {
            auto_subscribe: options.audio,
            ..Default::default()
        };

        let (room, mut events) = Room::connect(server_url, token, room_options)
            .await
            .context("Failed to connect to LiveKit")?;

        info!("Connected to LiveKit room {}", room.name());

        let (tx, rx) = oneshot::channel();
        let disconnect_tx: DisconnectSender = Arc::new(Mutex::new(Some(tx)));

        let event_tx = Arc::clone(&disconnect_tx);
        tokio::spawn(async move {
            let mut reason = DisconnectReason::ConnectionLost;
            while let Some(event) = events.recv().await {
                if let RoomEvent::Disconnected { reason: r } = event {
                    reason = map_reason(r);
                    break;
                }
            }

            if let Some(tx) = event_tx.lock().await.take() {
                let _ = tx.send(reason);
            }
        });

        Ok(RoomConnection {
            handle: Box::new(LiveKitRoom {
                room: Arc::new(room),
                disconnect_tx,
            }),
            disconnected: rx,
        })
    }
}

fn map_reason(reason: proto::DisconnectReason) -> DisconnectReason {
    match reason {
        proto::DisconnectReason::ClientInitiated => DisconnectReason::ClientInitiated,
        proto::DisconnectReason::ServerShutdown => DisconnectReason::ServerShutdown,
        proto::DisconnectReason::RoomDeleted => DisconnectReason::RoomDeleted,
        proto::DisconnectReason::UnknownReason => DisconnectReason::Unknown,
        _ => DisconnectReason::ConnectionLost,
    }
}
