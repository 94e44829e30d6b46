use clap::{Parser, ValueEnum};
use hoopoe_domain::config::LogFormat;
use hoopoe_domain::CliOverrides;
use std::net::SocketAddr;
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "hoopoe")]
#[command(version)]
#[command(about = "Hoopoe - policy-enforcing DNS proxy with region-aware forwarding")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP listen address (ip:port)
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Validate configuration, rules and client map, then exit
    #[arg(long)]
    check: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        address: cli.address.clone(),
        log_level: cli.log_level.clone(),
        log_format: cli.log_format.map(LogFormat::from),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting Hoopoe v{}", env!("CARGO_PKG_VERSION"));

    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let policy = di::Policy::build(&config)?;

    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    let services = di::DnsServices::new(&config, policy).await?;

    if config.telemetry.enabled {
        let telemetry_addr: SocketAddr = config.telemetry.address.parse()?;
        let metrics = services.metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = server::start_telemetry_server(telemetry_addr, metrics).await {
                error!(error = %e, "Telemetry server error");
            }
        });
    }

    tokio::select! {
        result = server::start_dns_server(&config.server.address, services.handler) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
