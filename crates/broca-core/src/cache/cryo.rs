//! `Cryo`: memoización content-addressed de invocaciones de stages.
//!
//! La clave es el hash de `(ENGINE_VERSION, módulo, nombre, firma, huella de
//! código, argumentos)`. Un hit devuelve el resultado persistido sin invocar
//! el cuerpo del stage; un miss lo invoca y persiste el resultado.
//!
//! La cache es consultiva: entradas corruptas cuentan como miss y un fallo al
//! escribir se registra sin descartar el resultado ya calculado. Stages no
//! deterministas (azar sin semilla, reloj, red) rompen la equivalencia
//! hit == recomputación; es una limitación conocida.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::stats::{CacheStats, StatCounters};
use super::store::{CacheStore, DiskStore, EntryKey, MemoryStore};
use crate::constants::ENGINE_VERSION;
use crate::errors::{CacheError, StageError};
use crate::hashing::hash_value;
use crate::model::{FingerprintInput, Flow};
use crate::stage::Stage;

/// Qué hacer con una entrada existente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Reutilizar la entrada si existe.
    #[default]
    Reuse,
    /// Recalcular siempre y sobrescribir.
    Refresh,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    signature: &'a str,
    created_at: DateTime<Utc>,
    result: &'a Flow,
}

#[derive(Deserialize)]
struct Envelope {
    #[allow(dead_code)]
    signature: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    result: Flow,
}

pub struct Cryo {
    store: Arc<dyn CacheStore>,
    counters: StatCounters,
}

impl Cryo {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            counters: StatCounters::default(),
        }
    }

    pub fn on_disk(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DiskStore::new(root)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Clave de cache para invocar `stage` con `args`.
    pub fn fingerprint(&self, stage: &dyn Stage, args: &[Flow]) -> Result<EntryKey, CacheError> {
        let sig = stage.signature();
        let input = FingerprintInput {
            engine_version: ENGINE_VERSION,
            module: sig.module(),
            name: sig.name(),
            signature: sig.as_str(),
            source: stage.source_fingerprint(),
            args,
        };
        let value = serde_json::to_value(&input)?;
        Ok(EntryKey::new(sig.module(), sig.name(), hash_value(&value)))
    }

    /// Devuelve el resultado cacheado o invoca el stage y lo persiste.
    ///
    /// Los errores del stage se propagan sin envolver.
    pub fn memoize(
        &self,
        stage: &dyn Stage,
        args: Vec<Flow>,
        policy: CachePolicy,
    ) -> Result<Flow, StageError> {
        let key = match self.fingerprint(stage, &args) {
            Ok(key) => key,
            Err(e) => {
                warn!(
                    "cryo: cannot fingerprint {}: {e}; running uncached",
                    stage.signature()
                );
                return stage.call(args);
            }
        };

        if policy == CachePolicy::Reuse {
            if let Some(result) = self.thaw(&key) {
                StatCounters::bump(&self.counters.hits);
                debug!("cryo hit {} [{}]", stage.signature(), key.digest);
                return Ok(result);
            }
        }

        StatCounters::bump(&self.counters.misses);
        debug!(
            "cryo miss {} [{}] policy={policy:?}",
            stage.signature(),
            key.digest
        );
        let result = stage.call(args)?;
        self.freeze(&key, stage.signature().as_str(), &result);
        Ok(result)
    }

    fn thaw(&self, key: &EntryKey) -> Option<Flow> {
        let bytes = match self.store.load(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                StatCounters::bump(&self.counters.corrupt);
                warn!(
                    "cryo: unreadable entry {}/{} ({e}); recomputing",
                    key.name, key.digest
                );
                return None;
            }
        };
        match serde_json::from_slice::<Envelope>(&bytes) {
            Ok(envelope) => Some(envelope.result),
            Err(e) => {
                StatCounters::bump(&self.counters.corrupt);
                warn!(
                    "cryo: corrupt entry {}/{} ({e}); recomputing",
                    key.name, key.digest
                );
                None
            }
        }
    }

    fn freeze(&self, key: &EntryKey, signature: &str, result: &Flow) {
        let envelope = EnvelopeRef {
            signature,
            created_at: Utc::now(),
            result,
        };
        let written = serde_json::to_vec(&envelope)
            .map_err(CacheError::from)
            .and_then(|bytes| self.store.save(key, &bytes));
        match written {
            Ok(()) => StatCounters::bump(&self.counters.writes),
            Err(e) => {
                StatCounters::bump(&self.counters.write_failures);
                warn!("cryo: could not persist {signature} [{}]: {e}", key.digest);
            }
        }
    }
}

impl std::fmt::Debug for Cryo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cryo").field("stats", &self.stats()).finish()
    }
}
