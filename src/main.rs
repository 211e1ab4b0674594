// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `nrtsearch-mcp` - MCP stdio server for nrtsearch.
//!
//! stdout carries the protocol; all logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nrtsearch_mcp::{McpServer, NrtsearchClient, NrtsearchConfig, NrtsearchService};

#[derive(Parser, Debug)]
#[command(name = "nrtsearch-mcp", version, about = "MCP tools for an nrtsearch server")]
struct Cli {
    /// JSON config file; flags and environment override its values
    #[arg(long, env = "NRTSEARCH_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// nrtsearch gateway host
    #[arg(long, env = "NRTSEARCH_HOST")]
    host: Option<String>,

    /// HTTP/JSON gateway port (not the gRPC port)
    #[arg(long, env = "NRTSEARCH_PORT")]
    port: Option<u16>,

    /// Connect over https
    #[arg(long, env = "NRTSEARCH_USE_TLS")]
    use_tls: bool,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "NRTSEARCH_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Hit count used when a search omits `size`
    #[arg(long)]
    default_top_hits: Option<i32>,
}

impl Cli {
    fn into_config(self) -> Result<NrtsearchConfig, nrtsearch_mcp::ConfigError> {
        let mut config = match &self.config {
            Some(path) => NrtsearchConfig::from_file(path)?,
            None => NrtsearchConfig::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.use_tls {
            config.use_tls = true;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout_ms = Some(timeout_ms);
        }
        if let Some(top_hits) = self.default_top_hits {
            config.default_top_hits = top_hits;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match NrtsearchClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build nrtsearch client");
            return ExitCode::FAILURE;
        }
    };
    info!(endpoint = %client.base_url(), "Using nrtsearch gateway");

    let service =
        NrtsearchService::new(Arc::new(client)).with_default_top_hits(config.default_top_hits);
    let server = McpServer::new(service);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    match server.run(stdin, tokio::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "MCP server failed");
            ExitCode::FAILURE
        }
    }
}
