//! Config command handler.
//!
//! Displays the effective projectflow configuration.

use crate::config::{config_path, Config};
use crate::error::Result;
use crate::output::{BOLD, CYAN, GRAY, RESET, YELLOW};

/// Display the effective configuration as TOML.
pub fn config_command(config: &Config) -> Result<()> {
    let path = config_path()?;
    println!("{BOLD}# projectflow config{RESET}");
    println!("{GRAY}# {}{RESET}", path.display());
    if !path.exists() {
        println!("{YELLOW}# (file does not exist, using defaults){RESET}");
    }
    println!();
    for line in config_to_toml_string(config).lines() {
        if let Some((key, value)) = line.split_once(" = ") {
            println!("{CYAN}{}{RESET} = {}", key, value);
        }
    }
    Ok(())
}

/// Convert a Config to a TOML string.
pub fn config_to_toml_string(config: &Config) -> String {
    format!(
        "api_url = \"{}\"\n\
         request_timeout_secs = {}\n\
         demo = {}",
        config.api_url, config.request_timeout_secs, config.demo
    )
}
