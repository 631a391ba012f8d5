//! Union Registry - member registry and shared termination-history
//! search for a dealer association.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use union_registry::{
    api,
    config::{AppConfig, LogFormat},
    db, middleware,
    services::{AuthService, Mailer},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Union Registry {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;

    // The guard must be kept alive for the duration of the program so
    // file logs are flushed
    let _log_guard = init_logging(&config);

    info!("Union Registry starting up");

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let pool = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    // Seed the administrator account on first startup
    AuthService::new(pool.clone(), config.auth.clone())
        .seed_admin()
        .await
        .context("Failed to seed administrator account")?;

    let mailer = Arc::new(Mailer::new(config.smtp.clone()));
    if config.smtp.is_none() {
        info!("SMTP not configured; temporary credential mail will be logged only");
    }

    let state = AppState {
        config: config.clone(),
        db: pool,
        mailer,
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Public routes stay unauthenticated; the session middleware wraps
    // only the protected set, so login itself remains reachable.
    Router::new()
        .nest("/api/v1", api::public_routes())
        .nest(
            "/api/v1",
            api::protected_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth::auth_middleware,
            )),
        )
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .layer(cors)
}

/// Initialize logging based on configuration
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match &config.logging.file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "union-registry.log".to_string());
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let registry = tracing_subscriber::registry().with(env_filter);
            match config.logging.format {
                LogFormat::Json => registry
                    .with(fmt::layer().json().with_writer(writer))
                    .with(fmt::layer().json())
                    .init(),
                LogFormat::Text => registry
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .with(fmt::layer())
                    .init(),
            }
            Some(guard)
        }
        None => {
            let registry = tracing_subscriber::registry().with(env_filter);
            match config.logging.format {
                LogFormat::Json => registry.with(fmt::layer().json()).init(),
                LogFormat::Text => registry.with(fmt::layer()).init(),
            }
            None
        }
    }
}

/// Ensure the data directory for a file-backed database exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).context("Failed to create data directory")?;
                info!("Created data directory: {:?}", parent);
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"Union Registry {}

USAGE:
    union-registry [OPTIONS]

OPTIONS:
    -h, --help       Print this help message
    -V, --version    Print version information

ENVIRONMENT:
    UNION_REGISTRY_CONFIG          Path to configuration file (default: config.yaml)
    UNION_REGISTRY_HOST            Bind address override
    UNION_REGISTRY_PORT            Bind port override
    UNION_REGISTRY_ADMIN_PASSWORD  Initial administrator password
    DATABASE_URL                   Database URL override
    JWT_SECRET                     Session token signing secret
    RUST_LOG                       Log filter (e.g. info, union_registry=debug)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
