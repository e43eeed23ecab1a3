//! Pipeline: composición, validación y ejecución.
//!
//! `Pipeline::with_options(elements, options)` valida cada par de elementos
//! adyacentes al construir. Si algún elemento es una lista de alternativas
//! (o un multi-pipeline anidado), se toma el producto cartesiano de todas las
//! posiciones y cada combinación se valida y ejecuta de forma independiente.
//!
//! ```ignore
//! let p = Pipeline::new(vec![
//!     stage(Cleaner::default()),
//!     alternatives([stage(Tokenizer::new(2)), stage(Tokenizer::new(4))]),
//! ])?;
//! let out = p.run(docs)?; // Flow::Tuple con un resultado por variante
//! ```

mod chain;
mod element;
mod multi;
mod node;
mod options;

pub use chain::Chain;
pub use element::{alternatives, branch, nested, stage, Element};
pub use multi::MultiPipeline;
pub use options::PipelineOptions;

use std::fmt;

use log::info;

use crate::errors::PipelineError;
use crate::model::Flow;
use node::Node;

/// Resultado de construir un pipeline: lineal o expandido en variantes.
#[derive(Clone)]
pub enum Pipeline {
    Chain(Chain),
    Multi(MultiPipeline),
}

impl Pipeline {
    /// Construye con opciones tomadas del entorno (`BrocaConfig::from_env`).
    pub fn new(elements: Vec<Element>) -> Result<Self, PipelineError> {
        Self::with_options(elements, PipelineOptions::from_env()?)
    }

    /// Los pipelines anidados pasan a usar la cache, la política y el
    /// paralelismo de `options`.
    pub fn with_options(
        elements: Vec<Element>,
        options: PipelineOptions,
    ) -> Result<Self, PipelineError> {
        if elements.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }
        let routing = options.routing();
        let multi = elements.iter().any(Element::is_multi);

        let positions: Vec<Vec<Node>> = elements
            .into_iter()
            .enumerate()
            .map(|(i, e)| expand(e, i))
            .collect::<Result<_, _>>()?;

        if !multi {
            let nodes = positions.into_iter().flatten().collect();
            let chain = Chain::assemble(nodes, routing)?;
            info!("pipeline built: {chain}");
            return Ok(Pipeline::Chain(chain));
        }

        let variants: Vec<Chain> = cartesian(&positions)
            .into_iter()
            .map(|nodes| Chain::assemble(nodes, routing.clone()))
            .collect::<Result<_, _>>()?;
        info!("multi-pipeline expanded into {} variants", variants.len());
        Ok(Pipeline::Multi(MultiPipeline::new(variants, options.parallel)))
    }

    pub fn run(&self, input: impl Into<Flow>) -> Result<Flow, PipelineError> {
        let input = input.into();
        match self {
            Pipeline::Chain(chain) => chain.run(input),
            Pipeline::Multi(multi) => multi.run(input),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Pipeline::Multi(_))
    }

    pub fn as_chain(&self) -> Option<&Chain> {
        match self {
            Pipeline::Chain(chain) => Some(chain),
            Pipeline::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiPipeline> {
        match self {
            Pipeline::Multi(multi) => Some(multi),
            Pipeline::Chain(_) => None,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Chain(chain) => write!(f, "{chain}"),
            Pipeline::Multi(multi) => write!(f, "{multi}"),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Chain(chain) => fmt::Debug::fmt(chain, f),
            Pipeline::Multi(multi) => fmt::Debug::fmt(multi, f),
        }
    }
}

/// Opciones concretas de una posición. Para elementos no alternativos hay
/// exactamente una.
fn expand(element: Element, position: usize) -> Result<Vec<Node>, PipelineError> {
    match element {
        Element::Single(stage) => Ok(vec![Node::Single(stage)]),
        Element::Branch(members) if members.is_empty() => {
            Err(PipelineError::EmptyBranch(position))
        }
        Element::Branch(members) => Ok(vec![Node::Branch(members)]),
        Element::Alternatives(options) if options.is_empty() => {
            Err(PipelineError::EmptyAlternatives(position))
        }
        Element::Alternatives(options) => {
            let mut out = Vec::with_capacity(options.len());
            for option in options {
                out.extend(expand(option, position)?);
            }
            Ok(out)
        }
        Element::Nested(Pipeline::Chain(chain)) => Ok(vec![Node::Nested(chain)]),
        Element::Nested(Pipeline::Multi(multi)) => {
            Ok(multi.into_variants().into_iter().map(Node::Nested).collect())
        }
    }
}

/// Producto cartesiano; la posición más a la izquierda varía más lento.
fn cartesian(positions: &[Vec<Node>]) -> Vec<Vec<Node>> {
    positions.iter().fold(vec![Vec::new()], |acc, options| {
        acc.iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut combo = prefix.clone();
                    combo.push(option.clone());
                    combo
                })
            })
            .collect()
    })
}
