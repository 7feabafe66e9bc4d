use actix_web::{App, HttpServer, middleware, web};
use anyhow::{Context, Result};
use battlestation_server::{ServerConfig, build_state, configure};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "battlestation.log";

/// Logs to stderr, and also to `LOG_FILE` under `log_dir` when one is set.
fn setup_logging(config: &ServerConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let _guard = setup_logging(&config)?;

    let state = web::Data::new(build_state(&config).context("failed to build cannon client")?);

    tracing::info!(
        bind_addr = %config.bind_addr,
        cannons = config.cannons.len(),
        request_timeout_ms = config.request_timeout.as_millis() as u64,
        "starting battle station"
    );
    for endpoint in &config.cannons {
        tracing::info!(
            generation = %endpoint.generation,
            url = %endpoint.url,
            "ion cannon configured"
        );
    }

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?
    .run()
    .await
    .context("server error")
}
