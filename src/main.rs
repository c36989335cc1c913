use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlor::event::{EventBus, LoggingOutcomeReporter};
use parlor::room::{start_cleanup_task, CleanupConfig, RoomRegistry};
use parlor::shared::AppState;
use parlor::user::InMemoryIdentityProvider;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting parlor game server");

    // Shared application state with dependency injection; deployments swap
    // in their own identity provider and outcome reporter here.
    let registry = Arc::new(RoomRegistry::new());
    let identity = Arc::new(InMemoryIdentityProvider::new());
    let reporter = Arc::new(LoggingOutcomeReporter);
    let event_bus = EventBus::new();

    let app_state = AppState::new(registry, identity, reporter, event_bus);

    tokio::spawn(start_cleanup_task(
        Arc::clone(&app_state.room_service),
        CleanupConfig::default(),
    ));

    let app = parlor::routes(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("failed to bind port 3000");
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.expect("server error");
}
