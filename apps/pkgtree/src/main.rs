//! pkgtree - dependency tree resolution for package manifests
//!
//! Resolves a manifest's dependency graph against a registry into a
//! deduplicated tree, either once from the command line or as an HTTP
//! service.

mod cli;
mod display;
mod server;

use crate::cli::{Cli, Commands, Format};
use clap::Parser;
use pkgtree_config::Config;
use pkgtree_errors::Error;
use pkgtree_registry::{MetaCache, RegistryClient, RegistryConfig};
use pkgtree_resolver::resolve_manifest;
use pkgtree_types::Manifest;
use std::path::Path;
use std::process;
use tokio::io::AsyncReadExt;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "pkgtree=debug" } else { "pkgtree=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env();
    if let Some(url) = cli.global.registry {
        config.registry.url = url;
    }

    let client = RegistryClient::new(&RegistryConfig {
        base_url: config.registry.url.clone(),
        ..RegistryConfig::default()
    })?;
    let cache = MetaCache::new(client);

    match cli.command {
        Commands::Resolve { manifest, format } => {
            let manifest = read_manifest(manifest.as_deref()).await?;
            let tree = resolve_manifest(&cache, &manifest).await?;

            match format {
                Format::Tree => print!("{}", display::render_tree(&tree)),
                Format::Json => {
                    let json = serde_json::to_string_pretty(&tree.to_doc())
                        .map_err(|e| Error::internal(e.to_string()))?;
                    println!("{json}");
                }
                Format::Ndjson => {
                    let body = display::render_ndjson(&tree)
                        .map_err(|e| Error::internal(e.to_string()))?;
                    print!("{body}");
                }
            }
            Ok(())
        }
        Commands::Serve { listen } => {
            let listen = listen.unwrap_or(config.server.listen);
            server::serve(&listen, cache).await
        }
    }
}

async fn read_manifest(path: Option<&Path>) -> Result<Manifest, Error> {
    let body = match path {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::internal(format!("failed to read {}: {e}", path.display())))?,
        _ => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .map_err(|e| Error::internal(format!("failed to read stdin: {e}")))?;
            body
        }
    };

    serde_json::from_str(&body).map_err(|e| Error::internal(format!("invalid manifest: {e}")))
}
