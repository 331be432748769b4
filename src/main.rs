//! payroll-server: HTTP front end for the payroll engine.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kenya_payroll_engine::api::{create_router, AppState};
use kenya_payroll_engine::config::ConfigLoader;
use kenya_payroll_engine::repository::{MemoryStore, SeedData};

#[derive(Debug, Parser)]
#[command(name = "payroll-server", version, about = "Kenyan payroll deductions and leave API")]
struct Args {
    /// Directory holding schedule.yaml, deduction_types.yaml, leave_policy.yaml and rates/.
    #[arg(long, env = "PAYROLL_CONFIG", default_value = "./config/kenya")]
    config: PathBuf,

    /// YAML file of employees and leave balances to preload.
    #[arg(long, env = "PAYROLL_SEED")]
    seed: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "PAYROLL_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = ConfigLoader::load(&args.config)?;
    info!(
        schedule = %config.schedule().name,
        version = %config.schedule().version,
        rate_sets = config.config().rates().len(),
        "Configuration loaded"
    );

    let store = match &args.seed {
        Some(path) => {
            let store = SeedData::load(path)?.into_store(config.leave_policy())?;
            info!(seed = %path.display(), "Seed data loaded");
            store
        }
        None => MemoryStore::default(),
    };

    let router = create_router(AppState::new(config, store));
    let listener = TcpListener::bind(args.bind).await?;
    info!(address = %args.bind, "payroll-server listening");

    axum::serve(listener, router).await?;
    Ok(())
}
