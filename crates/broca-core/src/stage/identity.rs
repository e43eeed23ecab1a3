use super::{Signature, Stage};
use crate::errors::StageError;
use crate::model::{Flow, Shape, TypeTag};

/// Stage identidad: deja pasar el valor sin modificarlo.
///
/// Útil en ramas, cuando un valor debe llegar intacto a un stage posterior que
/// recombina, p. ej. `(Identity::new(docs), Tokenizer)`.
#[derive(Debug, Clone)]
pub struct Identity {
    tag: TypeTag,
    signature: Signature,
}

impl Identity {
    pub fn new(tag: TypeTag) -> Self {
        let signature = Signature::new(module_path!(), "Identity").arg(tag.name());
        Self { tag, signature }
    }
}

impl Stage for Identity {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        Shape::Tag(self.tag.clone())
    }

    fn output(&self) -> Shape {
        Shape::Tag(self.tag.clone())
    }

    fn source_fingerprint(&self) -> &str {
        "identity/v1"
    }

    fn call(&self, mut args: Vec<Flow>) -> Result<Flow, StageError> {
        match args.len() {
            1 => Ok(args.remove(0)),
            _ => Ok(Flow::Tuple(args)),
        }
    }

    fn memoizable(&self) -> bool {
        false
    }
}
