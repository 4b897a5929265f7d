use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_HEAT_URL: &str = "http://localhost:3001/heat";
pub const DEFAULT_REFRESH_MS: u64 = 60_000;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub heat_url: String,
    pub refresh: Duration,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heat_url: DEFAULT_HEAT_URL.to_string(),
            refresh: Duration::from_millis(DEFAULT_REFRESH_MS),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let heat_url = lookup("HEAT_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.heat_url);
        let refresh_ms = parse_or(&lookup, "HEAT_REFRESH_MS", DEFAULT_REFRESH_MS).max(1);
        let port = parse_or(&lookup, "PORT", defaults.port);

        Self {
            heat_url,
            refresh: Duration::from_millis(refresh_ms),
            port,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}");
                default
            }
        },
        None => default,
    }
}
