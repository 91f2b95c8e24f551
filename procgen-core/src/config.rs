use std::{env, path::PathBuf};

use dotenvy::dotenv;

use crate::error::ConfigError;

const DB_HOST: &str = "DB_HOST";
const DB_USER: &str = "DB_USER";
const DB_PASSWORD: &str = "DB_PASSWORD";
const DB_NAME: &str = "DB_NAME";
const DB_PORT: &str = "DB_PORT";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const OPENAI_MODEL: &str = "OPENAI_MODEL";
const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
const PROCGEN_CONTRACT: &str = "PROCGEN_CONTRACT";
const PROCGEN_OUTPUT_DIR: &str = "PROCGEN_OUTPUT_DIR";

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CONTRACT: &str = "agent.md";
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbInfo {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Checked by the generation client, not here, so a missing key surfaces
    /// as a generation failure after the schema has been read.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: DbInfo,
    pub model: ModelInfo,
    pub contract: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Default)]
struct Vars {
    db_host: Option<String>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
    db_port: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    contract: Option<String>,
    output_dir: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine, the variables may come from the shell.
        let _ = dotenv();
        Self::from_vars(env::vars())
    }

    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut found = Vars::default();
        for (key, value) in vars {
            let slot = match key.as_str() {
                DB_HOST => &mut found.db_host,
                DB_USER => &mut found.db_user,
                DB_PASSWORD => &mut found.db_password,
                DB_NAME => &mut found.db_name,
                DB_PORT => &mut found.db_port,
                OPENAI_API_KEY => &mut found.api_key,
                OPENAI_MODEL => &mut found.model,
                OPENAI_BASE_URL => &mut found.base_url,
                PROCGEN_CONTRACT => &mut found.contract,
                PROCGEN_OUTPUT_DIR => &mut found.output_dir,
                _ => continue,
            };
            if !value.is_empty() {
                *slot = Some(value);
            }
        }

        let port = match found.db_port {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                var: DB_PORT,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database: DbInfo {
                host: found.db_host.ok_or(ConfigError::MissingVar(DB_HOST))?,
                port,
                user: found.db_user.ok_or(ConfigError::MissingVar(DB_USER))?,
                password: found.db_password.unwrap_or_default(),
                name: found.db_name.ok_or(ConfigError::MissingVar(DB_NAME))?,
            },
            model: ModelInfo {
                api_key: found.api_key,
                model: found.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: found
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            contract: PathBuf::from(found.contract.as_deref().unwrap_or(DEFAULT_CONTRACT)),
            output_dir: PathBuf::from(found.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)),
        })
    }
}
