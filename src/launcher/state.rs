use serde::Serialize;

/// Launcher state; transitions are owned by `SessionLauncher`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherState {
    Idle {
        /// Message from the last failed attempt
        error: Option<String>,
    },
    Connecting,
    Connected {
        token: String,
    },
}

impl Default for LauncherState {
    fn default() -> Self {
        LauncherState::Idle { error: None }
    }
}

impl LauncherState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LauncherState::Idle { .. })
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, LauncherState::Connected { .. })
    }
}

/// What the launcher shows for its current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum LauncherView {
    /// No LiveKit server address configured; nothing else is shown
    ConfigurationError { message: String },
    Idle {
        error: Option<String>,
        can_start: bool,
    },
    Connecting {
        can_start: bool,
    },
    /// Audio-only room with a leave control
    Connected {
        server_url: String,
        token: String,
        audio: bool,
        video: bool,
    },
}
