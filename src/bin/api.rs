use anyhow::Result;
use califica::{
    app_state::AppState, config::Config, middleware::RateLimit, moderation::Moderator, routes,
};
use std::net::SocketAddr;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(config.database_url())?;

    let moderator = Moderator::from_config(config.moderation().clone())?;
    info!(checks = ?moderator.active_checks(), "moderation pipeline ready");

    let state = AppState::new(pool, moderator);
    let rate_limit = RateLimit::new(
        config.submission_rate_limit(),
        config.rate_limit_window_secs(),
    );
    rate_limit.spawn_sweeper();

    let app = routes::router(state, rate_limit)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("listening on {}", config.bind_addr());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
