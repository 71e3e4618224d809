//! Swift Dev Tools MCP Server
//!
//! Entry point for the `swift-devtools-mcp` binary. With no subcommand it
//! serves MCP on stdin/stdout until the client closes the stream.

use clap::{Parser, Subcommand};
use devtools_protocol::ops::ListToolsResult;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use swift_devtools_mcp::{EffectiveConfig, McpServer, ServerConfig, SystemRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swift-devtools-mcp")]
#[command(about = "MCP server exposing Swift and Xcode developer tool status", version)]
struct Cli {
    /// Path to config file (default: ~/.config/swift-devtools-mcp/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve,

    /// List the available tools
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run one tool and print its report
    Call {
        /// Tool name, as shown by `list`
        tool: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = cli
        .log_filter
        .as_ref()
        .map(|filter| serde_json::json!({ "log": { "filter": filter } }));
    let effective = match EffectiveConfig::build(cli.config.as_deref(), overrides) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&effective.config);
    for source in &effective.sources {
        info!(
            origin = ?source.origin,
            path = source.path.as_deref().unwrap_or("-"),
            digest = source.digest.as_deref().unwrap_or("-"),
            "config layer"
        );
    }

    let server = McpServer::from_config(&effective.config, Arc::new(SystemRunner));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_serve(&server),
        Commands::List { json } => run_list(&server, json),
        Commands::Call { tool } => run_call(&server, &tool),
    }
}

/// Logs go to stderr; stdout belongs to the protocol.
fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

fn run_serve(server: &McpServer) -> ExitCode {
    info!(tools = server.dispatcher().registry().len(), "serving MCP on stdio");
    match server.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_list(server: &McpServer, json: bool) -> ExitCode {
    let tools = server.dispatcher().list_tools();

    if json {
        match serde_json::to_string_pretty(&ListToolsResult { tools }) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: failed to serialize tools: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for tool in &tools {
            println!("{:<width$}  {}", tool.name, tool.description, width = width);
        }
    }

    ExitCode::SUCCESS
}

fn run_call(server: &McpServer, tool: &str) -> ExitCode {
    match server.dispatcher().call(tool) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}
