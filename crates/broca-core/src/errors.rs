//! Errores del núcleo: construcción de pipelines, ejecución de stages, cache
//! y configuración.

use thiserror::Error;

use crate::model::Shape;

/// Error propio de un Stage (configuración inválida o fallo en su cuerpo).
///
/// El núcleo no lo captura ni lo reintenta: se propaga tal cual hasta quien
/// invocó el pipeline.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("{0}")]
    Runtime(String),
    #[error("cannot decode stage input: {0}")]
    Decode(String),
    #[error("cannot encode stage output: {0}")]
    Encode(String),
}

/// Errores al construir o ejecutar un pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "incompatible: stage <{upstream}> outputs <{produces}>, stage <{downstream}> requires input of <{requires}>"
    )]
    Incompatible {
        upstream: String,
        produces: Shape,
        downstream: String,
        requires: Shape,
    },
    #[error("pipeline needs at least one element")]
    EmptyPipeline,
    #[error("branch group at position {0} has no stages")]
    EmptyBranch(usize),
    #[error("alternatives at position {0} are empty")]
    EmptyAlternatives(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Fallos de la cache. Nunca abortan un pipeline: se registran y la
/// invocación sigue como si fuera un miss (lectura) o sin persistir (escritura).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
