mod session_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use playground_config::PlaygroundConfig;
use playground_gateway::{start_server, GatewayState};
use playground_logging::{init_console_logger, init_logger};
use playground_routing::PathRewriter;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Playground edge server and session tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP edge that rewrites API paths to the backends
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show how a request path would be routed
    Rewrite {
        /// Request path, e.g. /api/agents/start
        path: String,
    },
    /// Load the graph list and installed addons from the dev server
    Graphs {
        /// Also fetch the details of this graph
        #[arg(long)]
        details: Option<String>,
    },
    /// Start a session and print the resulting state
    Session {
        /// Seconds to wait for the selected graph's details
        #[arg(long, default_value_t = 10)]
        wait: u64,
    },
    /// Apply a partial update to a graph and print the refreshed graph
    UpdateGraph {
        graph_id: String,
        /// JSON file holding the partial graph (`nodes` and/or `connections`)
        #[arg(long)]
        patch: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = PlaygroundConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = PlaygroundConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            init_logger(config.state_dir.join("logs"), &config.log_level);
            run_server(config).await?;
        }
        Commands::Rewrite { path } => {
            init_console_logger(&config.log_level);
            let rewriter = PathRewriter::new(config.backends);
            let decision = rewriter.rewrite(&path);
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Graphs { details } => {
            init_console_logger(&config.log_level);
            session_cmd::run_graphs(&config, details.as_deref()).await?;
        }
        Commands::Session { wait } => {
            init_console_logger(&config.log_level);
            session_cmd::run_session(&config, wait).await?;
        }
        Commands::UpdateGraph { graph_id, patch } => {
            init_console_logger(&config.log_level);
            session_cmd::run_update_graph(&config, &graph_id, &patch).await?;
        }
    }

    Ok(())
}

async fn run_server(config: PlaygroundConfig) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        agent_server = %config.backends.agent_server,
        dev_server = %config.backends.dev_server,
        "Starting playground edge"
    );

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;
    let state = GatewayState::new(config.backends, config.http_timeout)?;

    start_server(addr, state).await
}
