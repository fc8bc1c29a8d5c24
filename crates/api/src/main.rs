use std::sync::Arc;

use anyhow::Context;

use tokenguard_api::config::{self, SecurityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tokenguard_observability::init();

    let security = SecurityConfig::from_env().context("loading security configuration")?;
    let users = config::users_from_env().context("loading TOKENGUARD_USERS")?;
    if users.is_empty() {
        tracing::warn!("TOKENGUARD_USERS not set; every token will be rejected");
    }

    let app = tokenguard_api::app::build_app(&security, Arc::new(users))
        .context("building firewalls")?;

    let addr = config::bind_addr_from_env();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
