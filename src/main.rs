//! Command-line entry point.
//!
//! Wires the three actors together and owns the process lifecycle:
//!
//! 1. **Startup**: parse arguments, load config, init tracing
//! 2. **Open**: open the media database and list the card root (fatal on error)
//! 3. **Spawn**: start the render actor and, if the touch device opens, the
//!    input actor
//! 4. **Run**: drive the coordinator on the main thread until exit
//! 5. **Shutdown**: raise the exit flag, join both actors, drop the store
//!
//! A touch device that cannot be opened is logged and treated like a device
//! that went away: the coordinator sees a closed mailbox and shuts down.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tagsync::app::{Coordinator, SharedState};
use tagsync::catalog::DirectoryCatalog;
use tagsync::indexer::{LibraryIndexer, LoftyTagReader};
use tagsync::input::{mailbox, spawn_capture, EvdevTouchSource};
use tagsync::storage::SqliteStore;
use tagsync::ui::{spawn_renderer, LogSurface, Renderer};
use tagsync::{Config, Result};

/// Re-index a folder of the SD card into the player's media database.
#[derive(Debug, Parser)]
#[command(name = "tagsync", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Card mount point (overrides `library_root`).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Media database (overrides `database`).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Touch event device (overrides `touch_device`).
    #[arg(long)]
    touch_device: Option<PathBuf>,

    /// Tracing filter (overrides `log_level`).
    #[arg(long)]
    log_level: Option<String>,

    /// Create the database and its tables if they do not exist.
    #[arg(long)]
    provision: bool,
}

impl Args {
    fn into_config(self) -> Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(root) = self.root {
            config.library_root = root;
        }
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(device) = self.touch_device {
            config.touch_device = device;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok((config, self.provision))
    }
}

fn main() -> ExitCode {
    let (config, provision) = match Args::parse().into_config() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("tagsync: {e}");
            return ExitCode::FAILURE;
        }
    };
    tagsync::observability::init_tracing(&config);

    match run(&config, provision) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, provision: bool) -> Result<()> {
    let span = tracing::info_span!("tagsync", root = ?config.library_root);
    let _guard = span.entered();

    let store = if provision {
        SqliteStore::create(&config.database)?
    } else {
        SqliteStore::open(&config.database)?
    };
    for divergence in store.verify_mirrors()? {
        tracing::warn!(
            primary = divergence.primary,
            secondary = divergence.secondary,
            missing_in_secondary = divergence.missing_in_secondary,
            missing_in_primary = divergence.missing_in_primary,
            "mirrored tables differ"
        );
    }

    let catalog = Arc::new(DirectoryCatalog::build(&config.library_root)?);
    tracing::info!(directories = catalog.len(), pages = catalog.page_count(), "card root listed");

    let shared = Arc::new(SharedState::new());
    let (sender, receiver) = mailbox();

    let renderer = Renderer::new(
        LogSurface::new(),
        Arc::clone(&shared),
        Arc::clone(&catalog),
        config.theme(),
        config.render_settings(),
    );
    let render_handle = spawn_renderer(renderer)?;

    let input_handle = match EvdevTouchSource::open(&config.touch_device) {
        Ok(source) => match spawn_capture(source, Arc::clone(&shared), sender, config.input_poll()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "cannot start input thread");
                None
            }
        },
        Err(e) => {
            tracing::error!(device = ?config.touch_device, error = %e, "touch device unavailable");
            drop(sender);
            None
        }
    };

    let indexer = LibraryIndexer::new(
        Box::new(store),
        Box::new(LoftyTagReader),
        Arc::clone(&shared),
        config.indexer_options(),
    );
    let mut coordinator = Coordinator::new(
        catalog,
        Arc::clone(&shared),
        receiver,
        indexer,
        config.coordinator_settings(),
    );
    coordinator.run();

    shared.request_exit();
    if let Some(handle) = input_handle {
        if handle.join().is_err() {
            tracing::error!("input thread panicked");
        }
    }
    match render_handle.join() {
        Ok(surface) => tracing::debug!(frames = surface.frames(), "renderer stopped"),
        Err(_) => tracing::error!("render thread panicked"),
    }

    tracing::info!("shutdown complete");
    Ok(())
}
