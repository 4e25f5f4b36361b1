use compliance_skill::{
    api::{build_router, AppState},
    compliance::build_http_client,
    EnvSource, ServerConfig, Skill,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load("config/skill")?;
    init_tracing(config.log_json);

    let http = build_http_client(&config)?;
    let skill = Skill::new(http, config.application_id.clone(), EnvSource::Process);
    let state = AppState {
        skill: Arc::new(skill),
    };

    let app = build_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Compliance skill listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
