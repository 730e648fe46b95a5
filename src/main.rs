use mimalloc::MiMalloc;
use photobooth_server::gemini::GeminiClient;
use photobooth_server::http::{self, AppState};
use photobooth_server::storage::PhotoStorage;
use photobooth_server::tasks::start_periodic_tasks;
use photobooth_server::utils::env_reader::EnvVariables;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    let vars = EnvVariables::get_all();
    // Creates the necessary folders
    let storage = PhotoStorage::new(vars.storage_path, vars.public_base_url);

    // Logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
            |_| "info,sqlx=warn,tower_http=info".into(),
        )))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let connection_options = SqliteConnectOptions::from_str(&vars.database_url)
        .expect("Failed to parse Database URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("temp_store", "memory")
        .optimize_on_close(true, None);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(4)
        .connect_with(connection_options)
        .await
        .expect("Failed to create DB Pool");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let gemini = vars.gemini_api_key.map(GeminiClient::new);
    if gemini.is_none() {
        info!("GEMINI_API_KEY not set, the filter endpoint will report itself unconfigured");
    }

    let app_state = AppState::new(pool, storage, gemini);
    let app_state = Box::leak(Box::new(app_state));

    start_periodic_tasks(app_state);

    info!("Server listening on port {}", vars.server_port);

    let http_service = http::router(app_state).into_make_service_with_connect_info::<SocketAddr>();
    let addr = SocketAddr::from(([0, 0, 0, 0], vars.server_port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port");

    axum::serve(listener, http_service)
        .with_graceful_shutdown(http::shutdown_signal())
        .await
        .expect("Failed to start server")
}
