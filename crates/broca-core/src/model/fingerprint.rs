use serde::Serialize;

use super::Flow;

/// Insumos del fingerprint de una invocación cacheada.
/// NO es el fingerprint final (hash) sino el modelo previo a canonicalizar.
#[derive(Serialize)]
pub struct FingerprintInput<'a> {
    pub engine_version: &'a str,
    pub module: &'a str,
    pub name: &'a str,
    pub signature: &'a str, // incluye args de construcción
    pub source: &'a str,    // huella del código del stage
    pub args: &'a [Flow],
}
