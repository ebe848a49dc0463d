//! courier — fetch a file from a segmented-UDP file server.
//!
//! Usage: courier [server] <identifier>
//! The server argument falls back to the configured host when omitted.

use anyhow::{Context, Result};

use courier::console;
use courier::net::ServerLink;
use courier::transfer::{self, Outcome};
use courier_core::config::CourierConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = CourierConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = CourierConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        CourierConfig::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (host, mut identifier) = match args.as_slice() {
        [identifier] => (config.server.host.clone(), identifier.clone()),
        [host, identifier] => (host.clone(), identifier.clone()),
        _ => {
            eprintln!("usage: courier [server] <identifier>");
            eprintln!("    server     = server hostname or ip address");
            eprintln!("    identifier = identifier string sent to the server");
            std::process::exit(1);
        }
    };

    let link = ServerLink::connect(&host, config.server.port, &config.transport)
        .await
        .with_context(|| format!("failed to reach {host}:{}", config.server.port))?;

    // Full-exchange retry loop. Each pass is a complete protocol run,
    // starting from the identifier send; only the identifier carries over.
    loop {
        link.send_identifier(&identifier)
            .await
            .context("failed to send identifier")?;

        match transfer::run_attempt(&link, &config.storage.dir).await? {
            Outcome::Delivered { path, bytes } => {
                println!("success");
                println!("wrote {bytes} bytes to {}", path.display());
                break;
            }
            Outcome::ChecksumMismatch { expected, computed } => {
                println!("failure");
                println!("checksum mismatch: expected {expected:#06x}, computed {computed:#06x}");
                match console::prompt_retry().context("failed to read retry input")? {
                    Some(next) => identifier = next,
                    None => {
                        tracing::info!("operator declined retry");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
