use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use atrium::{
    api::build_router,
    auth::{cleanup::spawn_session_cleanup, SessionResolver, SessionService},
    config::AppConfig,
    observability::init_tracing,
    services::UserService,
    storage::{
        create_pool, run_migrations,
        repositories::{SqlxSessionRepository, SqlxUserRepository},
    },
    validation::CreateUserRequest,
    APP_NAME, VERSION,
};
use atrium::domain::Role;

#[derive(Parser)]
#[command(name = "atrium", version, about = "Atrium workspace control plane")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server (default)
    Serve,
    /// Create an admin account and print a session token for it
    CreateAdmin {
        /// Email address for the new admin
        #[arg(long)]
        email: String,
        /// Display name for the new admin
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before any configuration is read from the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config.observability).context("initializing tracing")?;

    info!(app_name = APP_NAME, version = VERSION, "Starting Atrium control plane");

    let pool = create_pool(&config.database).await.context("creating database pool")?;
    run_migrations(&pool).await.context("running migrations")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::CreateAdmin { email, name } => create_admin(config, pool, email, name).await,
    }
}

async fn serve(config: AppConfig, pool: atrium::storage::DbPool) -> anyhow::Result<()> {
    let session_service = SessionService::new(
        Arc::new(SqlxSessionRepository::new(pool.clone())),
        &config.auth,
    );
    let _cleanup = spawn_session_cleanup(session_service);

    let router = build_router(pool);
    let router = if config.server.enable_cors {
        router.layer(tower_http::cors::CorsLayer::permissive())
    } else {
        router
    };

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!(%bind_address, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving API")?;

    info!("Shutting down");
    Ok(())
}

async fn create_admin(
    config: AppConfig,
    pool: atrium::storage::DbPool,
    email: String,
    name: String,
) -> anyhow::Result<()> {
    let users = UserService::new(Arc::new(SqlxUserRepository::new(pool.clone())));
    let sessions = SessionService::new(
        Arc::new(SqlxSessionRepository::new(pool.clone())),
        &config.auth,
    );

    let user = users
        .create_user(CreateUserRequest { email, name, role: Role::Admin })
        .await
        .context("creating admin user")?;
    let issued = sessions.issue(&user.id).await.context("issuing session")?;

    // Sanity-check the minted token resolves before handing it out.
    let resolver = Arc::new(SessionResolver::new(
        Arc::new(SqlxSessionRepository::new(pool.clone())),
        Arc::new(SqlxUserRepository::new(pool)),
    ));
    let bearer = format!("Bearer {}", issued.token);
    resolver.resolve(Some(bearer.as_str())).await.context("verifying issued session")?;

    println!("admin user:    {}", user.id);
    println!("session token: {}", issued.token);
    println!("expires at:    {}", issued.session.expires_at);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
