//! Client-side session launcher
//!
//! Drives one interview session through idle → connecting → connected:
//! - `TokenFetcher` obtains a credential (`HttpTokenClient` over HTTP)
//! - `RoomConnector` joins the room with it (`LiveKitConnector` with the
//!   `livekit` feature)
//! - `Navigator` moves the user home once the room disconnects

mod client;
mod connector;
mod launcher;
#[cfg(feature = "livekit")]
mod livekit;
mod state;

pub use client::{HttpTokenClient, TokenFetcher, TokenResponse};
pub use connector::{
    ChannelNavigator, ConnectOptions, DisconnectReason, Navigator, RoomConnection, RoomConnector,
    RoomHandle,
};
pub use launcher::{LauncherError, SessionLauncher, StartOutcome};
#[cfg(feature = "livekit")]
pub use livekit::LiveKitConnector;
pub use state::{LauncherState, LauncherView};
