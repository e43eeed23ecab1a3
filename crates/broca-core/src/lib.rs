//! broca-core: composición de stages tipados con cache de fingerprints.
//!
//! - `model`: etiquetas de tipo, formas y el valor `Flow` que circula.
//! - `stage`: contrato `Stage` y adaptador `TypedStage`.
//! - `cache`: `Cryo`, memoización content-addressed en disco o memoria.
//! - `pipeline`: validación en construcción, ramas y expansión a variantes.
pub mod cache;
pub mod config;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod pipeline;
pub mod stage;

pub use cache::{CachePolicy, CacheStats, CacheStore, Cryo, DiskStore, EntryKey, MemoryStore};
pub use config::BrocaConfig;
pub use errors::{CacheError, ConfigError, PipelineError, StageError};
pub use model::{intern, tag_for, Flow, Shape, TypeTag};
pub use pipeline::{
    alternatives, branch, nested, stage, Chain, Element, MultiPipeline, Pipeline, PipelineOptions,
};
pub use stage::{FnStage, Identity, Signature, Stage, TypedStage};
