use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};
use anyhow::{Context, Result, anyhow};
use battlestation_runtime::Generation;
use clap::Parser;
use mock_ion_cannon::{MockCannon, configure};
use tracing_subscriber::EnvFilter;

/// Fallback fire time for generations the battle station does not know.
const DEFAULT_FIRE_TIME: Duration = Duration::from_millis(3500);

/// Mock ion cannon endpoint
#[derive(Parser, Debug)]
#[command(name = "mock-ion-cannon")]
#[command(about = "Serves a simulated ion cannon over HTTP", long_about = None)]
#[command(version)]
struct Cli {
    /// HTTP server port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Generation reported by this cannon
    #[arg(long, env = "GENERATION", default_value_t = 1)]
    generation: u32,

    /// Seconds between shots (default: the generation's cooldown)
    #[arg(long, env = "FIRE_TIME")]
    fire_time: Option<f64>,
}

impl Cli {
    fn fire_time(&self) -> Result<Duration> {
        match self.fire_time {
            Some(seconds) => Duration::try_from_secs_f64(seconds)
                .map_err(|err| anyhow!("invalid fire time {seconds}: {err}")),
            None => Ok(Generation::try_from(self.generation)
                .map(Generation::cooldown)
                .unwrap_or(DEFAULT_FIRE_TIME)),
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cannon = web::Data::new(MockCannon::new(cli.generation, cli.fire_time()?));

    tracing::info!(
        generation = cannon.generation(),
        fire_time_ms = cannon.fire_time().as_millis() as u64,
        port = cli.port,
        "ion cannon listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(cannon.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", cli.port))
    .with_context(|| format!("failed to bind port {}", cli.port))?
    .run()
    .await
    .context("server error")
}
