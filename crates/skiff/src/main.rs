use clap::{Parser, Subcommand};
use skiff_core::{FrameworkInfo, MasterEndpoint, Resource, TerminalState};
use skiff_driver::{AckPolicy, DriverConfig, MasterHandle, MockDriver};
use skiff_scheduler::{DefaultScheduler, Lifecycle};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "skiff", about = "Skiff framework scheduler shim")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a framework scheduler against a master
    Run {
        /// Framework name to register as
        #[arg(long, required_unless_present = "config")]
        name: Option<String>,
        /// Principal the framework runs as; empty means the current user
        #[arg(long, default_value = "")]
        user: String,
        /// Master address or quorum locator
        #[arg(long, default_value = "zk://localhost:2181/skiff")]
        master: String,
        /// Load the framework identity from a YAML file instead of flags
        #[arg(long, conflicts_with_all = ["name", "user", "role", "failover_timeout"])]
        config: Option<PathBuf>,
        /// Allocation role
        #[arg(long)]
        role: Option<String>,
        /// Failover timeout in seconds
        #[arg(long)]
        failover_timeout: Option<f64>,
        /// Require explicit status-update acknowledgements
        #[arg(long)]
        explicit_acks: bool,
        /// Seconds between offers from the simulated master
        #[arg(long, default_value_t = 5)]
        offer_interval: u64,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            name,
            user,
            master,
            config,
            role,
            failover_timeout,
            explicit_acks,
            offer_interval,
        } => {
            let framework = build_framework(name, user, role, failover_timeout, config)?;
            run_scheduler(framework, &master, explicit_acks, offer_interval).await
        }
    }
}

/// Build the framework identity from a config file or from flags
fn build_framework(
    name: Option<String>,
    user: String,
    role: Option<String>,
    failover_timeout: Option<f64>,
    config: Option<PathBuf>,
) -> miette::Result<FrameworkInfo> {
    if let Some(path) = config {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| miette::miette!("Failed to read config '{}': {}", path.display(), e))?;
        let framework: FrameworkInfo = serde_yaml::from_str(&text)
            .map_err(|e| miette::miette!("Invalid framework config '{}': {}", path.display(), e))?;
        return Ok(framework);
    }

    let name =
        name.ok_or_else(|| miette::miette!("--name is required when no config file is given"))?;
    let mut framework = FrameworkInfo::new(name).with_user(user);
    framework.role = role;
    framework.failover_timeout = failover_timeout;
    Ok(framework)
}

/// Run the lifecycle against the in-process mock driver
async fn run_scheduler(
    framework: FrameworkInfo,
    master: &str,
    explicit_acks: bool,
    offer_interval: u64,
) -> miette::Result<()> {
    let master = MasterEndpoint::parse(master)?;

    let ack_policy = if explicit_acks {
        AckPolicy::Explicit
    } else {
        AckPolicy::Implicit
    };
    let config = DriverConfig {
        ack_policy,
        ..DriverConfig::default()
    };

    // No cluster transport is linked in: drive the scheduler against the
    // in-process mock master, the way a development deployment would.
    let (driver, handle) = MockDriver::new(config);
    info!("using in-process mock driver (master simulation for development)");

    let token = CancellationToken::new();

    // Shut down on ctrl-c
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                token.cancel();
            }
        });
    }

    let feed = spawn_simulated_master(
        handle,
        Duration::from_secs(offer_interval.max(1)),
        token.clone(),
    );

    let lifecycle = Lifecycle::new(framework, master);
    let terminal = lifecycle
        .run(&driver, Box::new(DefaultScheduler), token.clone())
        .await?;

    token.cancel();
    let _ = feed.await;

    match terminal {
        TerminalState::Stopped => Ok(()),
        TerminalState::Aborted => Err(miette::miette!("scheduler driver aborted")),
    }
}

/// Drive the mock master: register the framework, then grant an offer
/// every interval until shutdown
fn spawn_simulated_master(
    handle: MasterHandle,
    interval: Duration,
    token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        handle.register();

        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        let mut round = 0u64;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    round += 1;
                    let agent = format!("agent-{}", round % 3 + 1);
                    let offer = handle.make_offer(
                        &agent,
                        vec![
                            Resource::scalar("cpus", 4.0),
                            Resource::scalar("mem", 4096.0),
                            Resource::ranges("ports", [(31000, 32000)]),
                        ],
                    );
                    handle.send_offers(vec![offer]);
                }
            }
        }
    })
}
