// ⚙️ Configuration - environment variables with logged defaults

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::{env, fmt::Display, str::FromStr};
use tracing::info;

use crate::leaderboard::{DEFAULT_LIMIT, MAX_LIMIT};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub public_dir: PathBuf,
    pub leaderboard_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let leaderboard_limit: usize =
            try_load(&lookup, "LEADERBOARD_LIMIT", &DEFAULT_LIMIT.to_string())?;
        if leaderboard_limit == 0 || leaderboard_limit > MAX_LIMIT {
            anyhow::bail!("LEADERBOARD_LIMIT must be between 1 and {MAX_LIMIT}");
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            database_path: try_load(&lookup, "DATABASE_PATH", "characters.db")?,
            public_dir: try_load(&lookup, "PUBLIC_DIR", "public")?,
            leaderboard_limit,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_path, PathBuf::from("characters.db"));
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.leaderboard_limit, 100);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/faces.db"),
            ("LEADERBOARD_LIMIT", "25"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/faces.db"));
        assert_eq!(config.leaderboard_limit, 25);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));

        assert!(Config::from_lookup(lookup_from(&[("LEADERBOARD_LIMIT", "0")])).is_err());
    }
}
