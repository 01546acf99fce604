//! Process wiring: settings, logging, the audio engine, the catalog and the
//! command loop.

use std::sync::mpsc;

use anyhow::Context;
use log::info;

use crate::audio::RodioEngine;

pub mod commands;
mod event_loop;
mod logging;
mod settings;
mod startup;

pub use commands::{CommandError, ControlCmd, parse};
pub use event_loop::{CatalogRefresh, EventLoopState, announce_changes, handle_command, status_line};

pub fn run() -> anyhow::Result<()> {
    let (settings, problem) = settings::load_settings();
    logging::init(&settings.logging);
    settings::report(problem);

    let (status_tx, status_rx) = mpsc::channel();
    let engine = RodioEngine::new(status_tx, settings.request_timeout())
        .context("failed to open audio output")?;
    let mut controller = startup::build_controller(&settings, Box::new(engine));

    let source = startup::open_catalog(&settings).context("failed to set up catalog client")?;
    if let Some(catalog) = startup::load_catalog(&source, &settings.catalog.audio_extension) {
        controller.replace_catalog(catalog);
    }
    startup::apply_playback_defaults(&mut controller, &settings);

    let (control_tx, control_rx) = mpsc::channel();
    commands::spawn_stdin_reader(control_tx);

    info!("catalog at {}", settings.catalog.base_url);
    println!(
        "cantor: {} tracks. Type `help` for commands.",
        controller.catalog().len()
    );

    let refresh = event_loop::CatalogRefresh {
        source: &source,
        extension: &settings.catalog.audio_extension,
    };
    event_loop::run(
        &mut controller,
        &refresh,
        settings.poll_interval(),
        &control_rx,
        &status_rx,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests;
