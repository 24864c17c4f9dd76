use std::{
    env,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The JSON API server for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,

    /// Send the auth cookie without the `Secure` attribute.
    ///
    /// Needed when clients reach the server over plain HTTP rather than
    /// through a TLS terminating proxy.
    #[arg(long)]
    insecure_cookies: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let connection = Connection::open(&args.db_path).unwrap_or_else(|error| {
        panic!(
            "Could not open database at {}: {error}",
            args.db_path.display()
        )
    });
    let mut state = AppState::new(connection, &secret, &args.timezone)
        .unwrap_or_else(|error| panic!("Could not create the app state: {error}"));
    state.secure_cookies = !args.insecure_cookies;
    if args.insecure_cookies {
        tracing::warn!("Auth cookies will be sent without the Secure attribute");
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    let addr = SocketAddr::new(args.address, args.port);
    tracing::info!("HTTP server listening on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging(log_path: &Path) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers.
        .on_failure(());

    router.layer(tracing_layer)
}
