use std::sync::Arc;

use anyhow::Context;
use poem::{Server, listener::TcpListener};
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inbox::{
    application::services::sender::SenderFactory,
    config::Config,
    domain::repositories::{ContactRepository, MessageRepository},
    infrastructure::{
        messaging::ProviderSenderFactory,
        repositories::{
            InMemoryContactRepository, InMemoryMessageRepository, PostgresContactRepository,
            PostgresMessageRepository,
        },
        ticker::SweepTicker,
    },
    presentation::http::{
        endpoints::{health::HealthEndpoints, root::ApiState},
        routes,
    },
};

#[main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::try_parse()?;

    let (storage, contacts, messages): (
        &'static str,
        Arc<dyn ContactRepository>,
        Arc<dyn MessageRepository>,
    ) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("failed to connect to database")?;
            sqlx::migrate!()
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            (
                "postgres",
                PostgresContactRepository::new(pool.clone()) as Arc<dyn ContactRepository>,
                PostgresMessageRepository::new(pool) as Arc<dyn MessageRepository>,
            )
        }
        None => {
            warn!("DATABASE_URL is not set, contacts and messages are kept in memory");
            (
                "memory",
                Arc::new(InMemoryContactRepository::new()) as Arc<dyn ContactRepository>,
                Arc::new(InMemoryMessageRepository::new()) as Arc<dyn MessageRepository>,
            )
        }
    };

    let senders: Arc<dyn SenderFactory> = Arc::new(
        ProviderSenderFactory::new(
            config.twilio.clone(),
            config.email.clone(),
            config.provider_timeout,
        )
        .context("failed to build provider http client")?,
    );

    let state = Arc::new(ApiState::new(contacts, messages, senders));

    if let Some(period) = config.sweep_interval {
        SweepTicker::new(state.run_sweep_usecase.clone(), period).spawn();
    }

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    info!("Starting server at {}", server_url);

    let app = routes(
        state,
        HealthEndpoints::new(storage, config.sweep_interval.map(|p| p.as_secs())),
        &server_url,
    );

    Server::new(TcpListener::bind(format!("{}:{}", config.bind_host, config.port)))
        .run(app)
        .await?;
    Ok(())
}
