//! Init config command handler

use crate::config::{Config, TOKEN_SECRET_ENV};

pub fn cmd_init_config() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
        println!();
        println!("Set {TOKEN_SECRET_ENV} (or security.token_secret) before starting the server.");
    } else {
        println!("config.toml already exists; leaving it untouched.");
    }
    Ok(())
}
