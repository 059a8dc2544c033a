//! Runtime settings from environment variables (a `.env` file is honored by the binary).

use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/person_api";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// Schema holding the persons and addresses tables. Plain identifier only.
    pub schema: String,
    pub bind: SocketAddr,
    pub max_connections: u32,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let schema = lookup("PERSON_API_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_plain_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "PERSON_API_SCHEMA",
                reason: format!("'{}' is not a plain identifier", schema),
            });
        }
        let bind: SocketAddr = match lookup("PERSON_API_BIND") {
            Some(s) => s.parse().map_err(|e| ConfigError::Invalid {
                key: "PERSON_API_BIND",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_BIND.parse().map_err(|e| ConfigError::Invalid {
                key: "PERSON_API_BIND",
                reason: format!("{}", e),
            })?,
        };
        let max_connections = parse_or("PERSON_API_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "PERSON_API_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        let body_limit = parse_or("PERSON_API_BODY_LIMIT", &lookup, DEFAULT_BODY_LIMIT)?;
        Ok(Settings {
            database_url,
            schema,
            bind,
            max_connections,
            body_limit,
        })
    }
}

fn parse_or<F, T>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(s) => s.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn is_plain_identifier(s: &str) -> bool {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.schema, "public");
        assert_eq!(s.bind.port(), 3000);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.body_limit, 64 * 1024);
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://db/people"),
            ("PERSON_API_SCHEMA", "crm"),
            ("PERSON_API_BIND", "127.0.0.1:8080"),
            ("PERSON_API_MAX_CONNECTIONS", "12"),
            ("PERSON_API_BODY_LIMIT", "1024"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://db/people");
        assert_eq!(s.schema, "crm");
        assert_eq!(s.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.body_limit, 1024);
    }

    #[test]
    fn schema_must_be_a_plain_identifier() {
        let err = settings(&[("PERSON_API_SCHEMA", "public; drop table x")]).unwrap_err();
        assert!(err.to_string().contains("PERSON_API_SCHEMA"));
    }

    #[test]
    fn bad_numbers_and_zero_pool_are_rejected() {
        assert!(settings(&[("PERSON_API_MAX_CONNECTIONS", "many")]).is_err());
        assert!(settings(&[("PERSON_API_MAX_CONNECTIONS", "0")]).is_err());
        assert!(settings(&[("PERSON_API_BIND", "not-an-addr")]).is_err());
    }
}
