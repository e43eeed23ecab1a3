//! broca-stages: stages colaboradores sobre el núcleo.
//!
//! El núcleo no conoce su semántica: sólo sus formas declaradas, su firma y
//! su huella de código. Sirven para ejercitar y demostrar pipelines:
//! - `numeric`: transformaciones sobre listas de enteros (`vals`).
//! - `text`: limpieza, tokenización y vectorización de documentos.

pub mod numeric;
pub mod tags;
pub mod text;

pub use numeric::{AddConst, Scale, SumElementwise};
pub use text::{Cleaner, HashingVectorizer, HtmlCleaner, Tokenizer};
