//! Broca
//!
//! Pipelines de procesamiento componibles con validación de tipos al
//! construir y cache transparente de resultados:
//! - `broca_core`: contrato de stages, pipelines, multi-pipelines y la cache `Cryo`.
//! - `broca_stages`: stages colaboradores (numéricos y de texto).
//!
//! ```ignore
//! use broca::prelude::*;
//!
//! let p = Pipeline::new(vec![
//!     stage(HtmlCleaner::default()),
//!     stage(Cleaner::default()),
//!     alternatives([stage(Tokenizer::new(1)), stage(Tokenizer::new(4))]),
//! ])?;
//! let variants = p.run(serde_json::json!(["<p>Vast Empty</p>"]))?;
//! ```

pub use broca_core;
pub use broca_stages;

pub mod prelude {
    pub use broca_core::{
        alternatives, branch, nested, stage, BrocaConfig, Cryo, Element, Flow, FnStage, Identity,
        Pipeline, PipelineError, PipelineOptions, Shape, Signature, Stage, StageError, TypedStage,
    };
    pub use broca_stages::{
        AddConst, Cleaner, HashingVectorizer, HtmlCleaner, Scale, SumElementwise, Tokenizer,
    };
}
