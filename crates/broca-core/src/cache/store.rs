//! Backends de almacenamiento para la cache de fingerprints.
//!
//! Layout en disco: `<root>/<módulo con :: como />/<nombre del stage>/<digest>.json`.
//! El espacio de nombres módulo+stage evita colisiones de rutas entre stages
//! distintos; el digest distingue configuración, código y argumentos.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use uuid::Uuid;

use crate::constants::ENTRY_EXTENSION;
use crate::errors::CacheError;

/// Clave completa de una entrada: espacio de nombres + digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub module: String,
    pub name: String,
    pub digest: String,
}

impl EntryKey {
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            digest: digest.into(),
        }
    }

    /// Ruta relativa a la raíz de la cache.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.module.split("::").filter(|s| !s.is_empty()) {
            path.push(sanitize(segment));
        }
        path.push(sanitize(&self.name));
        path.push(format!("{}.{}", self.digest, ENTRY_EXTENSION));
        path
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Trait para backends de cache intercambiables.
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` si la entrada no existe.
    fn load(&self, key: &EntryKey) -> Result<Option<Vec<u8>>, CacheError>;

    /// Publica la entrada. Escritores concurrentes de la misma clave escriben
    /// contenido equivalente, así que gana el último.
    fn save(&self, key: &EntryKey, bytes: &[u8]) -> Result<(), CacheError>;

    fn contains(&self, key: &EntryKey) -> Result<bool, CacheError> {
        Ok(self.load(key)?.is_some())
    }
}

/// Cache persistente en disco.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, key: &EntryKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

impl CacheStore for DiskStore {
    fn load(&self, key: &EntryKey) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &EntryKey, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;
        // Escritura a ruta temporal única + rename atómico: nunca se publica
        // una entrada a medio escribir.
        let tmp = dir.join(format!(".{}.{}.tmp", key.digest, Uuid::new_v4().simple()));
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn contains(&self, key: &EntryKey) -> Result<bool, CacheError> {
        Ok(self.entry_path(key).is_file())
    }
}

/// Cache en memoria (tests, ejecuciones descartables).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<EntryKey, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &EntryKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    fn save(&self, key: &EntryKey, bytes: &[u8]) -> Result<(), CacheError> {
        self.entries.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn contains(&self, key: &EntryKey) -> Result<bool, CacheError> {
        Ok(self.entries.contains_key(key))
    }
}
