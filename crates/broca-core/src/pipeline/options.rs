use std::path::PathBuf;
use std::sync::Arc;

use super::chain::Routing;
use crate::cache::{CachePolicy, Cryo};
use crate::config::BrocaConfig;
use crate::constants::DEFAULT_CACHE_DIR;
use crate::errors::ConfigError;

/// Opciones de construcción de un pipeline.
///
/// - `freeze`: pasar cada invocación por la cache.
/// - `refresh`: recalcular y sobrescribir aunque exista la entrada.
/// - `parallel`: ejecutar ramas/variantes con rayon (el orden del resultado
///   es siempre posicional).
/// - `cache`: cache compartida; si falta y `freeze` está activo se crea una en
///   disco bajo `cache_dir`.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub freeze: bool,
    pub refresh: bool,
    pub parallel: bool,
    pub cache_dir: PathBuf,
    pub cache: Option<Arc<Cryo>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            freeze: true,
            refresh: false,
            parallel: true,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache: None,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &BrocaConfig) -> Self {
        Self {
            freeze: config.freeze,
            refresh: config.refresh,
            parallel: config.parallel,
            cache_dir: config.cache_dir.clone(),
            cache: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_config(&BrocaConfig::from_env()?))
    }

    /// Sin cache: cada stage se invoca directamente.
    pub fn uncached() -> Self {
        Self {
            freeze: false,
            ..Self::default()
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cryo>) -> Self {
        self.freeze = true;
        self.cache = Some(cache);
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn policy(&self) -> CachePolicy {
        if self.refresh {
            CachePolicy::Refresh
        } else {
            CachePolicy::Reuse
        }
    }

    /// Cache efectiva; se resuelve una vez por construcción para que todas las
    /// variantes de un multi-pipeline compartan la misma instancia.
    fn resolve_cache(&self) -> Option<Arc<Cryo>> {
        if !self.freeze {
            return None;
        }
        Some(
            self.cache
                .clone()
                .unwrap_or_else(|| Arc::new(Cryo::on_disk(&self.cache_dir))),
        )
    }

    pub(crate) fn routing(&self) -> Routing {
        Routing {
            cache: self.resolve_cache(),
            policy: self.policy(),
            parallel: self.parallel,
        }
    }
}
