use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer};
use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;

use hrm_approvals::auth::password::hash_password;
use hrm_approvals::auth::session::SessionStore;
use hrm_approvals::config::{Cli, Config};
use hrm_approvals::db::{Stores, init_db};
use hrm_approvals::routes::{self, AppState};
use hrm_approvals::views::Views;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    if let Some(password) = &cli.hash_password {
        let hash = hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
        println!("{hash}");
        return Ok(());
    }

    let mut config = Config::from_env()?;
    config.apply_cli(&cli);

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    info!(
        variant = %config.variant,
        environment = %config.environment,
        "Server starting..."
    );

    let pool = init_db(&config).await?;
    let views = Views::load(&config.template_dir)
        .with_context(|| format!("Failed to load templates from {}", config.template_dir))?;

    let state = AppState {
        sessions: SessionStore::new(config.session_ttl),
        stores: Stores::mysql(pool),
        views: Arc::new(views),
        config: config.clone(),
    };

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .configure(move |cfg| routes::configure(cfg, &state))
    })
    .bind(config.server_addr())
    .with_context(|| format!("Failed to bind {}", config.server_addr()))?
    .run()
    .await?;

    Ok(())
}
