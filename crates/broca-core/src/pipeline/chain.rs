use std::fmt;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use super::node::{validate, Node};
use crate::cache::{CachePolicy, Cryo};
use crate::constants::ENGINE_VERSION;
use crate::errors::{PipelineError, StageError};
use crate::model::{Flow, Shape};
use crate::stage::{Signature, Stage};

/// Cómo invoca un pipeline a sus stages: cache, política y paralelismo.
///
/// Los pipelines anidados adoptan la del pipeline que los contiene.
#[derive(Debug, Clone)]
pub(crate) struct Routing {
    pub cache: Option<Arc<Cryo>>,
    pub policy: CachePolicy,
    pub parallel: bool,
}

/// Pipeline lineal validado.
///
/// La compatibilidad entre elementos adyacentes se comprueba una sola vez al
/// construir; en ejecución sólo pueden fallar los propios stages. Un `Chain`
/// es a su vez un `Stage`, por lo que puede anidarse.
#[derive(Clone)]
pub struct Chain {
    nodes: Vec<Node>,
    routing: Routing,
    signature: Signature,
}

impl Chain {
    pub(crate) fn assemble(nodes: Vec<Node>, routing: Routing) -> Result<Self, PipelineError> {
        validate(&nodes)?;
        let signature = nodes
            .iter()
            .fold(Signature::new(module_path!(), "Pipeline"), |sig, n| {
                sig.arg(n.describe())
            });
        let nodes = nodes.into_iter().map(|n| n.rebind(&routing)).collect();
        Ok(Self {
            nodes,
            routing,
            signature,
        })
    }

    /// Copia que invoca sus stages (y los de sus anidados) con `routing`.
    pub(crate) fn rebind(&self, routing: &Routing) -> Self {
        Self {
            nodes: self.nodes.iter().cloned().map(|n| n.rebind(routing)).collect(),
            routing: routing.clone(),
            signature: self.signature.clone(),
        }
    }

    pub fn cache(&self) -> Option<&Arc<Cryo>> {
        self.routing.cache.as_ref()
    }

    pub fn policy(&self) -> CachePolicy {
        self.routing.policy
    }

    /// Hace fluir `input` por todos los elementos en orden.
    pub fn run(&self, input: Flow) -> Result<Flow, PipelineError> {
        let mut flow = input;
        for node in &self.nodes {
            flow = match node {
                Node::Single(stage) => {
                    let args = spread(flow, &stage.input());
                    self.invoke(stage, args)?
                }
                Node::Branch(members) => self.run_branch(members, flow)?,
                Node::Nested(chain) => chain.run(flow)?,
            };
        }
        Ok(flow)
    }

    fn invoke(&self, stage: &Arc<dyn Stage>, args: Vec<Flow>) -> Result<Flow, StageError> {
        match &self.routing.cache {
            Some(cryo) if stage.memoizable() => {
                cryo.memoize(stage.as_ref(), args, self.routing.policy)
            }
            _ => {
                debug!("invoking {} uncached", stage.signature());
                stage.call(args)
            }
        }
    }

    /// Entrada tupla de la misma aridad: zip (la rama i consume el slot i).
    /// En otro caso: broadcast del mismo valor a todas las ramas.
    fn run_branch(&self, members: &[Arc<dyn Stage>], flow: Flow) -> Result<Flow, StageError> {
        let inputs: Vec<Flow> = match flow {
            Flow::Tuple(items) if items.len() == members.len() => items,
            other => vec![other; members.len()],
        };
        let run = |(member, input): (&Arc<dyn Stage>, Flow)| {
            let args = spread(input, &member.input());
            self.invoke(member, args)
        };
        let outputs: Vec<Flow> = if self.routing.parallel {
            members
                .par_iter()
                .zip(inputs.into_par_iter())
                .map(run)
                .collect::<Result<_, _>>()?
        } else {
            members
                .iter()
                .zip(inputs)
                .map(run)
                .collect::<Result<_, _>>()?
        };
        Ok(Flow::Tuple(outputs))
    }
}

/// Argumentos para un stage: una tupla se reparte entre los componentes de
/// una entrada tupla de igual aridad; cualquier otro valor va como único
/// argumento.
fn spread(flow: Flow, requires: &Shape) -> Vec<Flow> {
    match (flow, requires) {
        (Flow::Tuple(items), Shape::Tuple(parts)) if items.len() == parts.len() => items,
        (flow, _) => vec![flow],
    }
}

impl Stage for Chain {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        self.nodes.first().map(Node::input).unwrap_or(Shape::Absent)
    }

    fn output(&self) -> Shape {
        self.nodes.last().map(Node::output).unwrap_or(Shape::Absent)
    }

    fn source_fingerprint(&self) -> &str {
        ENGINE_VERSION
    }

    fn call(&self, mut args: Vec<Flow>) -> Result<Flow, StageError> {
        // Con entrada tupla los argumentos son sus componentes, uno por slot.
        let input = match (args.len(), Stage::input(self)) {
            (1, shape) if !shape.is_tuple() => args.remove(0),
            _ => Flow::Tuple(args),
        };
        self.run(input).map_err(|e| match e {
            PipelineError::Stage(inner) => inner,
            other => StageError::Runtime(other.to_string()),
        })
    }

    // Los stages internos ya pasan por la cache.
    fn memoizable(&self) -> bool {
        false
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("signature", &self.signature.as_str())
            .field("cached", &self.routing.cache.is_some())
            .field("policy", &self.routing.policy)
            .field("parallel", &self.routing.parallel)
            .finish()
    }
}
