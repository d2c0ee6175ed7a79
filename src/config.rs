use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_MEETING_BASE_URL: &str = "https://meet.jit.si";
pub const DEFAULT_AUTH_RPS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Base URL of the hosted identity provider.
    pub backend_url: String,
    pub backend_anon_key: String,
    pub database_url: String,
    /// Shared secret the identity provider signs access tokens with.
    pub jwt_secret: String,
    pub meeting_base_url: String,
    pub auth_rps: u32,
    /// Rate-limit by the first `x-forwarded-for` hop instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    pub trust_proxy: bool,
    pub allowed_origin: Option<String>,
    pub json_logs: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup. Fails on the first missing
    /// required key, before anything talks to the network.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_address: get_or(&lookup, "SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            backend_url: get_env(&lookup, "BACKEND_URL")?,
            backend_anon_key: get_env(&lookup, "BACKEND_ANON_KEY")?,
            database_url: get_env(&lookup, "DATABASE_URL")?,
            jwt_secret: get_env(&lookup, "JWT_SECRET")?,
            meeting_base_url: get_or(&lookup, "MEETING_BASE_URL", DEFAULT_MEETING_BASE_URL),
            auth_rps: get_env_parse(&lookup, "AUTH_RPS")?.unwrap_or(DEFAULT_AUTH_RPS),
            trust_proxy: get_env_parse(&lookup, "TRUST_PROXY")?.unwrap_or(false),
            allowed_origin: optional(&lookup, "ALLOWED_ORIGIN"),
            json_logs: optional(&lookup, "LOG_FORMAT")
                .is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name)
        .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_or<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional(lookup, name)
        .map(|raw| {
            raw.parse()
                .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
        })
        .transpose()
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    get_config()
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
