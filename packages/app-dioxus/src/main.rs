//! BloodLink - Dioxus Desktop Application
//!
//! Desktop client for the BloodLink blood-donation coordination platform.
//! All session, realtime and API logic lives in the `client` SDK; this
//! crate is the view layer.

#![allow(non_snake_case)]

mod app;
mod auth;
mod components;
mod pages;
mod routes;

use std::sync::OnceLock;

use anyhow::{Context, Result};
use client_core::{Config, Services};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static SERVICES: OnceLock<Services> = OnceLock::new();

/// The wired service graph, initialized in `main` before launch.
pub(crate) fn services() -> &'static Services {
    SERVICES.get().expect("services are initialized before launch")
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,client_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BloodLink client");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(api_url = %config.api_url, "Configuration loaded");

    // Build the service graph; background tasks start inside the app where
    // the runtime is available.
    let services = Services::init(&config).context("Failed to build service graph")?;
    SERVICES.set(services).ok();

    // Launch the Dioxus app
    dioxus::launch(app::App);

    Ok(())
}
