//! Media Vault - CLI
//!
//! Command-line interface for vault operations. The key store behind the
//! CLI is a JSON file next to the vault; deployments embedding the
//! library should inject the platform credential store instead.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};

use media_vault::{FileKeyStore, MediaVault};

#[derive(Parser)]
#[command(name = "media-vault")]
#[command(version = media_vault::VERSION)]
#[command(about = "Local encrypted media vault")]
struct Cli {
    /// Vault root directory
    #[arg(short, long, default_value = "./vault")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the master key
    Init,

    /// Encrypt a file into the vault, printing its id
    Store {
        /// File to encrypt
        path: PathBuf,

        /// Optional thumbnail file to encrypt alongside
        #[arg(short, long)]
        thumbnail: Option<PathBuf>,
    },

    /// Decrypt an artifact to a file
    Fetch {
        /// Artifact id
        id: String,

        /// Output path
        output: PathBuf,

        /// Fetch the thumbnail instead of the media payload
        #[arg(short, long)]
        thumbnail: bool,
    },

    /// Delete an artifact and its thumbnail
    Delete {
        /// Artifact id
        id: String,
    },

    /// List stored artifact ids
    List,

    /// Remove temp files orphaned by a crash
    Sweep,

    /// Store a PIN verifier hash
    SetPin {
        /// PIN code
        pin: String,
    },

    /// Check a PIN against the stored verifier hash
    VerifyPin {
        /// PIN code
        pin: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let keystore = Arc::new(FileKeyStore::new(cli.vault.join("keystore.json")));
    let vault = MediaVault::new(&cli.vault, keystore);

    match cli.command {
        Commands::Init => {
            let key = vault.init_master_key().context("initializing master key")?;
            let fingerprint = Sha256::digest(key.expose());
            println!("Master key initialized");
            println!("Fingerprint: {}", hex::encode(&fingerprint[..8]));
        }

        Commands::Store { path, thumbnail } => {
            let plaintext = std::fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let id = vault.store_media(&plaintext).context("storing media")?;

            if let Some(thumb_path) = thumbnail {
                let thumb = std::fs::read(&thumb_path)
                    .with_context(|| format!("reading {}", thumb_path.display()))?;
                vault
                    .store_thumbnail(&id, &thumb)
                    .context("storing thumbnail")?;
            }

            println!("{}", id);
        }

        Commands::Fetch {
            id,
            output,
            thumbnail,
        } => {
            let plaintext = if thumbnail {
                vault.load_thumbnail(&id).context("loading thumbnail")?
            } else {
                vault.load_media(&id).context("loading media")?
            };
            std::fs::write(&output, &plaintext)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {} bytes to {}", plaintext.len(), output.display());
        }

        Commands::Delete { id } => {
            vault.delete(&id).context("deleting artifact")?;
            println!("Deleted {}", id);
        }

        Commands::List => {
            let ids = vault.list_media().context("listing artifacts")?;
            if ids.is_empty() {
                println!("Vault is empty");
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }

        Commands::Sweep => {
            let removed = vault.sweep_temp_files().context("sweeping temp files")?;
            println!("Removed {} stale temp file(s)", removed);
        }

        Commands::SetPin { pin } => {
            vault.set_pin(&pin).context("storing PIN hash")?;
            println!("PIN verifier stored");
        }

        Commands::VerifyPin { pin } => {
            if vault.verify_pin(&pin) {
                println!("PIN OK");
            } else {
                anyhow::bail!("PIN verification failed");
            }
        }
    }

    Ok(())
}
