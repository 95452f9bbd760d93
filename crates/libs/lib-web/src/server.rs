//! # Server Setup
//!
//! Shared application state, logging initialisation and HTTP server startup.
//!
//! Startup order: tracing subscriber, configuration (loaded and validated once),
//! database pool, embedded migrations, token service, router, listener. Any
//! failure before the listener is bound aborts startup.

// region: --- Imports
use crate::routes;
use crate::services::WorkspaceService;
use axum::extract::FromRef;
use lib_auth::{TokenConfig, TokenService};
use lib_core::{create_pool, run_migrations, Config, DbPool};
use lib_utils::get_env_or;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub tokens: Arc<TokenService>,
    pub workspaces: WorkspaceService,
}

impl AppState {
    /// Build the state from a ready pool and a validated configuration.
    pub fn new(db: DbPool, config: Config) -> Self {
        let token_config = TokenConfig::with_hours(config.jwt_secret.clone(), config.jwt_expiration_hours);

        Self {
            tokens: Arc::new(TokenService::new(&token_config)),
            workspaces: WorkspaceService::new(db.clone()),
            db,
            config,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for WorkspaceService {
    fn from_ref(state: &AppState) -> Self {
        state.workspaces.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Listener and CORS settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// `BIND_ADDRESS` and `ALLOWED_ORIGINS` (comma separated) with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_address = get_env_or("BIND_ADDRESS", &defaults.bind_address);
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        Self {
            bind_address,
            allowed_origins,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global tracing subscriber. The level comes from `LOG_LEVEL`
/// (default `info`); a full `EnvFilter` directive such as
/// `lib_web=debug,sqlx=warn` is accepted too.
pub fn init_tracing() {
    let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();
    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .try_init();

    if installed.is_err() {
        warn!("[SERVER] Tracing subscriber already installed");
    }
}

/// Initialize and start the HTTP server.
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - The database directory cannot be created
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(server_config: ServerConfig) -> anyhow::Result<()> {
    init_tracing();

    info!("[SERVER] Huddle backend starting");

    let config = Config::from_env()?;
    config.validate()?;
    info!("[SERVER] Configuration loaded: {:?}", config);

    ensure_sqlite_dir(&config.database_url)?;

    info!("[SERVER] Connecting to database...");
    let pool = create_pool(&config.database_url).await?;

    info!("[SERVER] Running database migrations...");
    run_migrations(&pool).await?;
    info!("[SERVER] Migrations complete");

    let state = AppState::new(pool, config);
    let app = routes::app(state, &server_config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_address).await?;
    info!("[SERVER] Ready: http://{}", server_config.bind_address);
    log_server_info();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[SERVER] Shut down");
    Ok(())
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            info!("[SERVER] Created database directory: {:?}", parent);
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("[SERVER] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[SERVER] Shutdown signal received");
}

fn log_server_info() {
    info!(" AUTH:");
    info!("   • POST /api/v1/auth/register");
    info!("   • POST /api/v1/auth/login");
    info!("   • GET  /api/v1/auth/profile");
    info!(" WORKSPACES:");
    info!("   • POST /api/v1/workspaces");
    info!("   • GET  /api/v1/workspaces?page=&limit=");
    info!("   • GET  /api/v1/workspaces/{{id}}");
    info!("   • POST /api/v1/workspaces/join");
    info!("   • GET  /api/v1/workspaces/{{id}}/members");
    info!(" HEALTH:");
    info!("   • GET  /api/v1/ping");
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_sqlite_dir_ignores_memory_databases() {
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
        assert!(ensure_sqlite_dir("postgres://localhost/db").is_ok());
    }

    #[test]
    fn test_ensure_sqlite_dir_creates_parent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("nested").join("huddle.db");
        let url = format!("sqlite:{}?mode=rwc", db.display());

        ensure_sqlite_dir(&url).expect("create dir");

        assert!(dir.path().join("nested").is_dir());
    }
}
