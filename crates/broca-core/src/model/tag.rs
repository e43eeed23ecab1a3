//! Registro de `TypeTag`: etiquetas simbólicas internadas.
//!
//! La primera llamada a `tag_for(name)` asigna la siguiente identidad
//! secuencial; las siguientes devuelven la misma etiqueta. El registro es
//! global al proceso y sólo crece (el número de nombres distintos está
//! acotado por los stages escritos, no por los datos).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

static REGISTRY: Lazy<DashMap<Arc<str>, TypeTag>> = Lazy::new(DashMap::new);
static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// Etiqueta de tipo opaca. Dos etiquetas son iguales sii provienen del mismo
/// nombre; se comparan sólo por identidad, nunca por estructura ni orden.
#[derive(Clone)]
pub struct TypeTag {
    id: u32,
    name: Arc<str>,
}

impl TypeTag {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({}#{})", self.name, self.id)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Devuelve la etiqueta asociada a `name`, creándola en el primer uso.
pub fn tag_for(name: &str) -> TypeTag {
    if let Some(existing) = REGISTRY.get(name) {
        return existing.value().clone();
    }
    // `entry` bloquea el shard: dos hilos que internan el mismo nombre a la vez
    // obtienen la misma identidad.
    REGISTRY
        .entry(Arc::from(name))
        .or_insert_with(|| TypeTag {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        })
        .value()
        .clone()
}

/// Alias de `tag_for`.
pub fn intern(name: &str) -> TypeTag {
    tag_for(name)
}

/// Número de etiquetas internadas hasta ahora.
pub fn registered_count() -> usize {
    REGISTRY.len()
}
