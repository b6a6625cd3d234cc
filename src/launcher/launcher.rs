use super::client::TokenFetcher;
use super::connector::{ConnectOptions, DisconnectReason, Navigator, RoomConnector, RoomHandle};
use super::state::{LauncherState, LauncherView};
use crate::pages::LauncherProps;
use crate::token::CredentialRequest;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

pub const MISSING_SERVER_URL_MESSAGE: &str =
    "LiveKit server URL is not configured. Set NEXT_PUBLIC_LIVEKIT_WS_URL to start an interview.";
pub const START_FAILED_MESSAGE: &str = "Unable to start the interview session. Please try again.";
pub const CONNECT_FAILED_MESSAGE: &str = "Could not connect to the interview room. Please try again.";
pub const UNEXPECTED_DISCONNECT_MESSAGE: &str = "The interview session ended unexpectedly.";

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("LiveKit server URL is not configured")]
    MissingServerUrl,

    #[error("token request failed: {0}")]
    TokenRequest(String),

    #[error("failed to connect to room: {0}")]
    Connect(String),

    #[error("no active room connection")]
    NotConnected,

    #[error("failed to leave room: {0}")]
    Leave(String),
}

/// Result of a start action that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A token was fetched and the room joined
    Connected,
    /// A start is already in flight; no request was issued
    AlreadyStarting,
    AlreadyConnected,
}

/// One interview session on the client side.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionLauncher {
    inner: Arc<Inner>,
}

struct Inner {
    props: LauncherProps,
    server_url: Option<String>,
    home_path: String,
    fetcher: Arc<dyn TokenFetcher>,
    connector: Arc<dyn RoomConnector>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<LauncherState>,
    room: Mutex<Option<Box<dyn RoomHandle>>>,
}

impl SessionLauncher {
    pub fn new(
        props: LauncherProps,
        server_url: Option<String>,
        home_path: impl Into<String>,
        fetcher: Arc<dyn TokenFetcher>,
        connector: Arc<dyn RoomConnector>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(LauncherState::default());

        Self {
            inner: Arc::new(Inner {
                props,
                server_url: server_url.filter(|url| !url.trim().is_empty()),
                home_path: home_path.into(),
                fetcher,
                connector,
                navigator,
                state,
                room: Mutex::new(None),
            }),
        }
    }

    pub fn props(&self) -> &LauncherProps {
        &self.inner.props
    }

    pub fn state(&self) -> LauncherState {
        self.inner.state.borrow().clone()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<LauncherState> {
        self.inner.state.subscribe()
    }

    pub fn view(&self) -> LauncherView {
        let Some(server_url) = &self.inner.server_url else {
            return LauncherView::ConfigurationError {
                message: MISSING_SERVER_URL_MESSAGE.to_string(),
            };
        };

        match &*self.inner.state.borrow() {
            LauncherState::Idle { error } => LauncherView::Idle {
                error: error.clone(),
                can_start: true,
            },
            LauncherState::Connecting => LauncherView::Connecting { can_start: false },
            LauncherState::Connected { token } => {
                let options = ConnectOptions::audio_only();
                LauncherView::Connected {
                    server_url: server_url.clone(),
                    token: token.clone(),
                    audio: options.audio,
                    video: options.video,
                }
            }
        }
    }

    /// User start action: fetch a credential and join the room
    pub async fn start(&self) -> Result<StartOutcome, LauncherError> {
        let Some(server_url) = self.inner.server_url.clone() else {
            warn!("Refusing to start session without a LiveKit server URL");
            return Err(LauncherError::MissingServerUrl);
        };

        let claimed = self.inner.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = LauncherState::Connecting;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Ok(match *self.inner.state.borrow() {
                LauncherState::Connected { .. } => StartOutcome::AlreadyConnected,
                _ => StartOutcome::AlreadyStarting,
            });
        }

        let props = &self.inner.props;
        info!("Starting {} session in room {}", props.mode, props.room_name);

        let request = CredentialRequest {
            room_name: Some(props.room_name.clone()),
            user_id: Some(props.user_id.clone()),
            mode: Some(props.mode),
            interview_id: props.interview_id.clone(),
            user_name: Some(props.user_name.clone()),
        };

        let token = match self.inner.fetcher.fetch_token(&request).await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to obtain session token: {:#}", e);
                self.reset(Some(START_FAILED_MESSAGE));
                return Err(LauncherError::TokenRequest(format!("{:#}", e)));
            }
        };

        self.inner.state.send_replace(LauncherState::Connected {
            token: token.clone(),
        });

        let connection = match self
            .inner
            .connector
            .connect(&server_url, &token, ConnectOptions::audio_only())
            .await
        {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to join room {}: {:#}", props.room_name, e);
                self.reset(Some(CONNECT_FAILED_MESSAGE));
                return Err(LauncherError::Connect(format!("{:#}", e)));
            }
        };

        {
            let mut room = self.inner.room.lock().await;
            *room = Some(connection.handle);
        }

        let launcher = self.clone();
        let disconnected = connection.disconnected;
        tokio::spawn(async move {
            let reason = disconnected.await.unwrap_or(DisconnectReason::Unknown);
            launcher.handle_disconnect(reason).await;
        });

        info!("Joined room {}", props.room_name);
        Ok(StartOutcome::Connected)
    }

    /// User leave action; the disconnect notification completes the transition
    pub async fn leave(&self) -> Result<(), LauncherError> {
        let room = self.inner.room.lock().await;
        let handle = room.as_ref().ok_or(LauncherError::NotConnected)?;

        info!("Leaving room {}", self.inner.props.room_name);
        handle
            .leave()
            .await
            .map_err(|e| LauncherError::Leave(format!("{:#}", e)))
    }

    /// Room disconnect: back to idle and home, once per connection
    pub async fn handle_disconnect(&self, reason: DisconnectReason) {
        let error = match reason {
            DisconnectReason::ClientInitiated => None,
            _ => Some(UNEXPECTED_DISCONNECT_MESSAGE.to_string()),
        };

        {
            let mut room = self.inner.room.lock().await;
            room.take();
        }

        let was_connected = self.inner.state.send_if_modified(|state| {
            if state.is_connected() {
                *state = LauncherState::Idle { error };
                true
            } else {
                false
            }
        });

        if was_connected {
            info!(
                "Room {} disconnected ({:?})",
                self.inner.props.room_name, reason
            );
            self.inner.navigator.navigate(&self.inner.home_path);
        }
    }

    fn reset(&self, error: Option<&str>) {
        self.inner.state.send_replace(LauncherState::Idle {
            error: error.map(str::to_string),
        });
    }
}
