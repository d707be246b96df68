//! Entry point for the **wf-inactive-alpha** daemon.
//!
//! Connects to `$WAYFIRE_SOCKET`, subscribes to events and runs the
//! [`FocusDimmer`](wf_inactive_alpha::dimmer::FocusDimmer) on the main
//! thread until the compositor closes the connection.  Any error is fatal.

use log::{error, info, warn};
use std::path::PathBuf;
use wf_inactive_alpha::config::Config;
use wf_inactive_alpha::dimmer::FocusDimmer;
use wf_inactive_alpha::wayfire::socket::WayfireSocket;

/// Resolve the config directory (`$XDG_CONFIG_HOME/wf-inactive-alpha`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("wf-inactive-alpha")
}

/// Try to load the config from `$XDG_CONFIG_HOME/wf-inactive-alpha/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Config::default();
    }
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();

    let mut socket = match WayfireSocket::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("failed to connect to wayfire: {}", e);
            std::process::exit(1);
        }
    };

    let mut dimmer = FocusDimmer::new(config.alpha);
    match dimmer.run(&mut socket) {
        Ok(()) => info!("compositor closed the connection, exiting"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
