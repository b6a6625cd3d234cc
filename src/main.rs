use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prepwise_session::records::User;
use prepwise_session::{
    create_router, AppState, Config, CredentialRequest, MemoryStore, Mode, PagePaths, TokenIssuer,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "prepwise", version, about = "Prepwise interview session service")]
struct Cli {
    /// Config file (without extension)
    #[arg(long, global = true, default_value = "config/prepwise")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Issue a single session token and print it
    Token {
        #[arg(long)]
        room: String,
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "create")]
        mode: Mode,
        #[arg(long)]
        interview_id: Option<String>,
    },

    /// Join an interview room from the command line
    #[cfg(feature = "livekit")]
    Join {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        user_name: String,
        /// Conduct this interview instead of creating a new one
        #[arg(long)]
        interview_id: Option<String>,
    },

    /// Run the interview agent in one room
    #[cfg(feature = "livekit")]
    Agent {
        #[arg(long)]
        room: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Token {
            room,
            user,
            mode,
            interview_id,
        } => {
            let issuer = TokenIssuer::new(cfg.livekit.api_key, cfg.livekit.api_secret);
            let mut request = CredentialRequest::new(room, user).with_mode(mode);
            request.interview_id = interview_id;

            let issued = issuer.issue(&request)?;
            info!("Token expires at {}", issued.expires_at);
            println!("{}", issued.token);
            Ok(())
        }
        #[cfg(feature = "livekit")]
        Command::Join {
            user_id,
            user_name,
            interview_id,
        } => join(cfg, user_id, user_name, interview_id).await,
        #[cfg(feature = "livekit")]
        Command::Agent { room } => agent(cfg, room).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let store = MemoryStore::new();
    for seed in &cfg.auth.sessions {
        store
            .add_session(
                seed.token.clone(),
                User {
                    id: seed.user_id.clone(),
                    name: seed.user_name.clone(),
                },
            )
            .await;
    }
    info!("Seeded {} sign-in sessions", cfg.auth.sessions.len());

    let paths = PagePaths {
        home: cfg.app.home_path.clone(),
        sign_in: cfg.app.sign_in_path.clone(),
    };
    let issuer = TokenIssuer::new(cfg.livekit.api_key.clone(), cfg.livekit.api_secret.clone());
    if issuer.credentials().is_err() {
        warn!("LiveKit API key/secret missing; token requests will fail");
    }

    let app = create_router(AppState::in_memory(issuer, store, paths));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

#[cfg(feature = "livekit")]
async fn join(
    cfg: Config,
    user_id: String,
    user_name: String,
    interview_id: Option<String>,
) -> Result<()> {
    use prepwise_session::launcher::{ChannelNavigator, LiveKitConnector};
    use prepwise_session::{room_name, HttpTokenClient, LauncherProps, SessionLauncher};
    use std::sync::Arc;

    let (mode, entity) = match &interview_id {
        Some(id) => (Mode::Conduct, id.clone()),
        None => (Mode::Create, user_id.clone()),
    };

    let props = LauncherProps {
        user_name,
        room_name: room_name(mode, &entity),
        user_id,
        mode,
        interview_id,
    };

    let (navigator, mut navigations) = ChannelNavigator::new();
    let launcher = SessionLauncher::new(
        props,
        cfg.livekit_url(),
        cfg.app.home_path.clone(),
        Arc::new(HttpTokenClient::new(&cfg.app.base_url)?),
        Arc::new(LiveKitConnector),
        Arc::new(navigator),
    );

    launcher.start().await?;
    info!("Session running; press Ctrl-C to leave");

    tokio::select! {
        destination = navigations.recv() => {
            info!("Session ended, next stop {:?}", destination);
        }
        _ = tokio::signal::ctrl_c() => {
            launcher.leave().await?;
            navigations.recv().await;
        }
    }

    Ok(())
}

#[cfg(feature = "livekit")]
async fn agent(cfg: Config, room: String) -> Result<()> {
    use livekit::prelude::{Room, RoomEvent, RoomOptions};
    use prepwise_session::agent::HttpQuestionGenerator;
    use prepwise_session::{resolve_metadata, InterviewAgent};
    use std::sync::Arc;

    let server_url = cfg
        .livekit_url()
        .context("LiveKit server URL is not configured")?;

    let issuer = TokenIssuer::new(cfg.livekit.api_key.clone(), cfg.livekit.api_secret.clone());
    let identity = format!("agent-{}", uuid::Uuid::new_v4().simple());
    let request = CredentialRequest::new(room.clone(), identity).with_user_name(cfg.agent.name.clone());
    let issued = issuer.issue(&request)?;

    let (livekit_room, mut events) = Room::connect(&server_url, &issued.token, RoomOptions::default())
        .await
        .context("Failed to connect to LiveKit")?;
    info!("{} joined room {}", cfg.agent.name, room);

    // Room metadata first, then each participant; wait for the candidate if needed
    let mut sources = vec![livekit_room.metadata()];
    sources.extend(
        livekit_room
            .remote_participants()
            .values()
            .map(|p| p.metadata()),
    );
    while resolve_metadata(sources.iter().map(String::as_str)).user_id.is_none() {
        match events.recv().await {
            Some(RoomEvent::ParticipantConnected(participant)) => {
                sources.push(participant.metadata());
            }
            Some(RoomEvent::Disconnected { reason }) => {
                anyhow::bail!("Room {} closed before a candidate joined ({:?})", room, reason);
            }
            Some(_) => {}
            None => anyhow::bail!("Room {} event stream ended", room),
        }
    }

    let store = MemoryStore::new();
    let generator = HttpQuestionGenerator::new(&cfg.app.base_url)?;
    let agent = InterviewAgent::join(
        cfg.agent.name.clone(),
        Arc::new(store),
        Arc::new(generator),
        sources.iter().map(String::as_str),
    )?;
    info!("Agent session state: {:?}", agent.state());

    tokio::select! {
        _ = async {
            while let Some(event) = events.recv().await {
                if let RoomEvent::Disconnected { reason } = event {
                    info!("Room {} disconnected ({:?})", room, reason);
                    break;
                }
            }
        } => {}
        _ = tokio::signal::ctrl_c() => {
            livekit_room.close().await.context("Failed to close LiveKit room")?;
        }
    }

    Ok(())
}
