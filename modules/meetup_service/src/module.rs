//! Module composition root and lifecycle

use crate::api::rest::auth::{OidcTokenValidator, TokenValidator};
use crate::config::{Config, PublisherKind};
use crate::domain::{
    ChangePublisher, EventService, LogChangePublisher, MeetupServices, NoOpChangePublisher,
    SpeakerService, SponsorService,
};
use crate::infra::storage::{
    seed, SeaOrmEventRepository, SeaOrmSpeakerRepository, SeaOrmSponsorRepository,
};
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Meetup service module
pub struct MeetupModule {
    services: MeetupServices,
    validator: Arc<dyn TokenValidator>,
}

impl MeetupModule {
    /// Connect to the configured database, migrate, seed and wire everything up
    pub async fn init(config: Config) -> Result<Self> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .connect_timeout(config.database.connect_timeout)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        tracing::info!("Database connection established");

        let validator: Arc<dyn TokenValidator> = Arc::new(OidcTokenValidator::new(&config.auth)?);
        Ok(Self::from_connection(config, db, validator).await)
    }

    /// Wire the module onto an existing connection and token validator
    ///
    /// A migration or seed failure that survives all retries is logged and startup continues.
    pub async fn from_connection(
        config: Config,
        db: DatabaseConnection,
        validator: Arc<dyn TokenValidator>,
    ) -> Self {
        if let Err(e) = seed::migrate_and_seed(&db, &config.seed).await {
            tracing::error!(error = ?e, "Database migration failed, continuing startup");
        } else {
            tracing::info!("Meetup service migrations completed");
        }

        let publisher = build_publisher(config.publisher);
        let services = build_services(Arc::new(db), publisher);

        tracing::info!(publisher = ?config.publisher, "Meetup service initialized");
        Self {
            services,
            validator,
        }
    }

    /// Router with all REST routes registered
    pub fn router(&self) -> axum::Router {
        tracing::info!("Registering meetup service REST routes");
        crate::api::rest::routes::register_routes(
            axum::Router::new(),
            self.services.clone(),
            self.validator.clone(),
        )
    }

    /// Serve until `cancel` fires, then drain in-flight requests
    pub async fn serve(self: Arc<Self>, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "Meetup API listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await?;

        tracing::info!("Meetup API stopped");
        Ok(())
    }
}

fn build_publisher(kind: PublisherKind) -> Arc<dyn ChangePublisher> {
    match kind {
        PublisherKind::None => Arc::new(NoOpChangePublisher),
        PublisherKind::Log => Arc::new(LogChangePublisher),
    }
}

/// Build repositories and services on top of one connection
pub fn build_services(
    db: Arc<DatabaseConnection>,
    publisher: Arc<dyn ChangePublisher>,
) -> MeetupServices {
    let events = Arc::new(SeaOrmEventRepository::new(db.clone()));
    let speakers = Arc::new(SeaOrmSpeakerRepository::new(db.clone()));
    let sponsors = Arc::new(SeaOrmSponsorRepository::new(db));

    MeetupServices {
        events: Arc::new(EventService::new(
            events,
            sponsors.clone(),
            speakers.clone(),
            publisher.clone(),
        )),
        speakers: Arc::new(SpeakerService::new(speakers, publisher.clone())),
        sponsors: Arc::new(SponsorService::new(sponsors, publisher)),
    }
}
