mod availability;
mod config;
mod database;
mod error;
mod server;
mod timing;

use std::sync::Arc;

use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use r2d2_sqlite::SqliteConnectionManager;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use database::sqlite::SqliteDatabase;
use server::server::Server;
use timing::business_time::business_now;

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const TIME_FORMAT: &str = "%H:%M";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "availability_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("configuration error");

    let manager = SqliteConnectionManager::file(&config.database_path);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("could not open the schedule database");
    let pool = Arc::new(pool);

    let seeded_at = business_now(config.timezone).format(ISO_FORMAT).to_string();
    SqliteDatabase::setup(&pool, &seeded_at).expect("could not prepare the schedule store");

    let server = Server::setup(pool.clone(), config.timezone);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("could not bind the listen address");
    tracing::info!("listening on {} ({})", config.bind_address, config.timezone);

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!("accept failed: {}", err);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                tracing::warn!("connection error: {}", err);
            }
        });
    }
}
