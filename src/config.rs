use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "MATCHDAY_DB_PATH";
pub const BIND_VAR: &str = "MATCHDAY_BIND";
pub const LOG_JSON_VAR: &str = "MATCHDAY_LOG_JSON";
pub const PAYMENT_URL_VAR: &str = "MATCHDAY_PAYMENT_URL";
pub const CORS_ORIGIN_VAR: &str = "MATCHDAY_CORS_ORIGIN";

#[derive(Debug, Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    pub log_json: bool,
    pub payment_url: Option<String>,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_raw = non_empty(BIND_VAR).unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError {
            name: BIND_VAR,
            value: bind_raw.clone(),
        })?;

        let log_json = match non_empty(LOG_JSON_VAR) {
            Some(value) => parse_bool(&value).ok_or(ConfigError {
                name: LOG_JSON_VAR,
                value,
            })?,
            None => false,
        };

        Ok(Config {
            db_path: PathBuf::from(
                non_empty(DB_PATH_VAR).unwrap_or_else(|| "data/db.json".to_string()),
            ),
            bind,
            log_json,
            payment_url: non_empty(PAYMENT_URL_VAR),
            cors_origin: non_empty(CORS_ORIGIN_VAR),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.db_path, PathBuf::from("data/db.json"));
        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert!(!config.log_json);
        assert_eq!(config.payment_url, None);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            (DB_PATH_VAR, "/var/lib/matchday/db.json"),
            (BIND_VAR, "127.0.0.1:3000"),
            (LOG_JSON_VAR, "yes"),
            (PAYMENT_URL_VAR, "https://pay.example/team"),
            (CORS_ORIGIN_VAR, "https://team.example"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/matchday/db.json"));
        assert_eq!(config.bind.port(), 3000);
        assert!(config.log_json);
        assert_eq!(config.payment_url.as_deref(), Some("https://pay.example/team"));
        assert_eq!(config.cors_origin.as_deref(), Some("https://team.example"));
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let err = Config::from_lookup(lookup(&[(BIND_VAR, "not-an-address")])).unwrap_err();

        assert_eq!(err.name, BIND_VAR);
    }

    #[test]
    fn unrecognized_bool_is_an_error() {
        let err = Config::from_lookup(lookup(&[(LOG_JSON_VAR, "maybe")])).unwrap_err();

        assert_eq!(err.name, LOG_JSON_VAR);
        assert_eq!(err.value, "maybe");
    }
}
