use std::fmt;

use super::{Signature, Stage};
use crate::errors::StageError;
use crate::model::{Flow, Shape};

type StageFn = dyn Fn(Vec<Flow>) -> Result<Flow, StageError> + Send + Sync;

/// Stage respaldado por una closure, para colaboradores con forma de función.
pub struct FnStage {
    signature: Signature,
    input: Shape,
    output: Shape,
    source: String,
    body: Box<StageFn>,
}

impl FnStage {
    pub fn new<F>(
        signature: Signature,
        input: Shape,
        output: Shape,
        source: impl Into<String>,
        body: F,
    ) -> Self
    where
        F: Fn(Vec<Flow>) -> Result<Flow, StageError> + Send + Sync + 'static,
    {
        Self {
            signature,
            input,
            output,
            source: source.into(),
            body: Box::new(body),
        }
    }
}

impl Stage for FnStage {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        self.input.clone()
    }

    fn output(&self) -> Shape {
        self.output.clone()
    }

    fn source_fingerprint(&self) -> &str {
        &self.source
    }

    fn call(&self, args: Vec<Flow>) -> Result<Flow, StageError> {
        (self.body)(args)
    }
}

impl fmt::Debug for FnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage")
            .field("signature", &self.signature.as_str())
            .field("input", &self.input)
            .field("output", &self.output)
            .field("source", &self.source)
            .finish()
    }
}
