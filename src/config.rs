use anyhow::{Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE: &str = "bookmarks.db";

#[derive(Parser, Debug)]
#[command(name = "bookmarks")]
#[command(about = "Runs the bookmarks API service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Overrides the port from the config file or environment.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmarks")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    #[serde(default = "default_port")]
    port: u16,
    api_token: String,
    #[serde(default)]
    pub database_auth_token: Option<String>,
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_api_token(&self) -> &str {
        &self.api_token
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds a config from `DATABASE_URL`, `DATABASE_AUTH_TOKEN`,
    /// `API_TOKEN` and `PORT` when no config file is present.
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(p) => p.parse()?,
            Err(_) => DEFAULT_PORT,
        };
        let cfg = Config {
            app: App {
                database: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
                port,
                api_token: env::var("API_TOKEN").unwrap_or_default(),
                database_auth_token: env::var("DATABASE_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let mut config: Config = serde_yaml::from_str(&yaml_with_env)?;
        if config.app.database_auth_token.as_deref() == Some("") {
            config.app.database_auth_token = None;
        }
        Ok(config)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    fn validate(&self) -> Result<()> {
        if self.app.api_token.trim().is_empty() {
            bail!("api_token must be set; refusing to serve without authentication");
        }
        if self.app.database.trim().is_empty() {
            bail!("database must be set");
        }
        Ok(())
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
