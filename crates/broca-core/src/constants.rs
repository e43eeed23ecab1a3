//! Constantes del núcleo.
//!
//! Agrupa valores estáticos que participan en el cálculo de fingerprints de la
//! cache y en los valores por defecto de configuración. `ENGINE_VERSION` forma
//! parte del input del hashing: cambiarlo invalida todas las entradas
//! persistidas aunque stages y datos no cambien.

/// Versión lógica del formato de fingerprint/cache. Mantener estable mientras
/// no haya cambios incompatibles en `FingerprintInput` o en el envelope.
pub const ENGINE_VERSION: &str = "C1.0";

/// Directorio raíz por defecto de la cache (`BROCA_CACHE_DIR`).
pub const DEFAULT_CACHE_DIR: &str = "/tmp/cryo";

/// Extensión de cada entrada persistida.
pub const ENTRY_EXTENSION: &str = "json";
