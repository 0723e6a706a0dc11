//! Process configuration, read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `JWT_SECRET` | insecure dev value | HS256 shared secret |
//! | `DATABASE_URL` | unset | Postgres URL; unset selects the in-memory store |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | Pool size |

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let database = match get("DATABASE_URL") {
            Some(url) => {
                let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                    Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                        ConfigError::Invalid {
                            var: "DATABASE_MAX_CONNECTIONS",
                            reason: format!("expected a positive integer, got `{raw}`"),
                        }
                    })?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                Some(DatabaseConfig {
                    url,
                    max_connections,
                })
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_select_in_memory_store() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert!(cfg.database.is_none());
    }

    #[test]
    fn database_url_enables_postgres() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://localhost/escola"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("JWT_SECRET", "shh"),
        ])
        .unwrap();
        assert_eq!(
            cfg.database,
            Some(DatabaseConfig {
                url: "postgres://localhost/escola".to_string(),
                max_connections: 12,
            })
        );
        assert_eq!(cfg.jwt_secret, "shh");
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let err = config(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));
    }

    #[test]
    fn rejects_zero_pool_size() {
        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/escola"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                ..
            }
        ));
    }
}
