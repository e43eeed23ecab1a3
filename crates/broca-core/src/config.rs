//! Carga de configuración desde variables de entorno (y `.env` si existe).
//!
//! Variables reconocidas:
//! - `BROCA_CACHE_DIR`: raíz de la cache en disco (default `/tmp/cryo`).
//! - `BROCA_FREEZE`: habilita la cache en los pipelines (default `true`).
//! - `BROCA_REFRESH`: fuerza recomputación y sobrescritura (default `false`).
//! - `BROCA_PARALLEL`: ejecuta ramas y variantes en paralelo (default `true`).

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::constants::DEFAULT_CACHE_DIR;
use crate::errors::ConfigError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrocaConfig {
    pub cache_dir: PathBuf,
    pub freeze: bool,
    pub refresh: bool,
    pub parallel: bool,
}

impl Default for BrocaConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            freeze: true,
            refresh: false,
            parallel: true,
        }
    }
}

impl BrocaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cache_dir = lookup("BROCA_CACHE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);
        Ok(Self {
            cache_dir,
            freeze: flag(&lookup, "BROCA_FREEZE", defaults.freeze)?,
            refresh: flag(&lookup, "BROCA_REFRESH", defaults.refresh)?,
            parallel: flag(&lookup, "BROCA_PARALLEL", defaults.parallel)?,
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
