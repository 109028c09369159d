//! Configuration management for mimir
//!
//! This crate provides functionality for managing the mimir configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
use clap::Parser;
use mimir_common::utils::io::file::{delete_path, read_file, write_file};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use tracing::{debug, error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "mimir config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the toolkit.
/// The metadata and signature providers read from this configuration when
/// possible.
#[derive(Deserialize, Serialize, Debug)]
pub struct Configuration {
    /// The API key for Etherscan services
    pub etherscan_api_key: String,

    /// The base URL for the Etherscan API
    pub etherscan_base_url: String,

    /// The chain id used for Sourcify lookups
    pub sourcify_chain_id: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            etherscan_api_key: "".to_string(),
            etherscan_base_url: mimir_common::constants::DEFAULT_ETHERSCAN_BASE_URL.to_string(),
            sourcify_chain_id: 1,
        }
    }
}

#[allow(deprecated)]
impl Configuration {
    /// Returns the current configuration, with environment overrides
    /// (`ETHERSCAN_API_KEY`, `ETHERSCAN_BASE_URL`, `SOURCIFY_CHAIN_ID`)
    /// applied on top of the persisted file.
    pub fn load() -> Result<Self, Error> {
        let mut home = home_dir().ok_or_else(|| {
            Error::Generic(
                "failed to get home directory. does your os support `std::env::home_dir()`?"
                    .to_string(),
            )
        })?;
        home.push(".mimir");
        home.push("config.toml");

        // if the config file doesn't exist, create it
        if !home.exists() {
            let config = Configuration::default();
            config.save()?;
        }

        // read the config file
        let contents = read_file(
            home.to_str()
                .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))?,
        )
        .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        // parse the config file
        let mut config: Configuration = toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))?;

        // apply environment overrides
        if let Some(key) = env_override("ETHERSCAN_API_KEY") {
            debug!("overriding etherscan_api_key from the environment");
            config.etherscan_api_key = key;
        }
        if let Some(url) = env_override("ETHERSCAN_BASE_URL") {
            debug!("overriding etherscan_base_url from the environment");
            config.etherscan_base_url = url;
        }
        if let Some(chain_id) = env_override("SOURCIFY_CHAIN_ID") {
            debug!("overriding sourcify_chain_id from the environment");
            config.sourcify_chain_id = chain_id
                .parse()
                .map_err(|_| Error::ParseError("SOURCIFY_CHAIN_ID must be a number".to_string()))?;
        }

        Ok(config)
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        let mut home = home_dir().ok_or_else(|| {
            Error::Generic(
                "failed to get home directory. does your os support `std::env::home_dir()`?"
                    .to_string(),
            )
        })?;
        home.push(".mimir");
        home.push("config.toml");

        write_file(
            home.to_str()
                .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.mimir/config.toml`.
    pub fn delete() -> Result<(), Error> {
        let mut home = home_dir().ok_or_else(|| {
            Error::Generic(
                "failed to get home directory. does your os support `std::env::home_dir()`?"
                    .to_string(),
            )
        })?;
        home.push(".mimir");
        home.push("config.toml");

        delete_path(
            home.to_str()
                .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))?,
        );

        Ok(())
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "etherscan_api_key" => {
                self.etherscan_api_key = value.to_string();
            }
            "etherscan_base_url" => {
                self.etherscan_base_url = value.to_string();
            }
            "sourcify_chain_id" => {
                self.sourcify_chain_id = value.parse().map_err(|_| {
                    Error::ParseError("sourcify_chain_id must be a number".to_string())
                })?;
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

/// Reads a configuration override from the environment. An exported but
/// empty variable counts as unset, so `ETHERSCAN_API_KEY= mimir …` does not
/// clobber a persisted key.
fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// The `config` command is used to display and edit the current
/// configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `mimir config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `mimir config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}
