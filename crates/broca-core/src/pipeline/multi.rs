use std::fmt;

use rayon::prelude::*;

use super::Chain;
use crate::errors::PipelineError;
use crate::model::Flow;

/// Conjunto de pipelines lineales resultante de expandir alternativas.
///
/// No tiene forma de entrada/salida propia; ejecutarlo aplica cada variante a
/// la misma entrada y devuelve la tupla de resultados en orden de producto.
#[derive(Clone)]
pub struct MultiPipeline {
    variants: Vec<Chain>,
    parallel: bool,
}

impl MultiPipeline {
    pub(crate) fn new(variants: Vec<Chain>, parallel: bool) -> Self {
        Self { variants, parallel }
    }

    pub fn variants(&self) -> &[Chain] {
        &self.variants
    }

    pub(crate) fn into_variants(self) -> Vec<Chain> {
        self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn run(&self, input: Flow) -> Result<Flow, PipelineError> {
        let results: Vec<Flow> = if self.parallel {
            self.variants
                .par_iter()
                .map(|chain| chain.run(input.clone()))
                .collect::<Result<_, _>>()?
        } else {
            self.variants
                .iter()
                .map(|chain| chain.run(input.clone()))
                .collect::<Result<_, _>>()?
        };
        Ok(Flow::Tuple(results))
    }
}

impl fmt::Display for MultiPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.variants.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl fmt::Debug for MultiPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiPipeline")
            .field("variants", &self.variants)
            .field("parallel", &self.parallel)
            .finish()
    }
}
