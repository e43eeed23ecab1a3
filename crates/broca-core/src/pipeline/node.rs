//! Elementos ya expandidos y validación de adyacencia.

use std::sync::Arc;

use super::chain::{Chain, Routing};
use crate::errors::PipelineError;
use crate::model::Shape;
use crate::stage::Stage;

/// Elemento de un pipeline lineal: stage único, grupo de ramas o pipeline
/// anidado.
#[derive(Clone)]
pub(crate) enum Node {
    Single(Arc<dyn Stage>),
    Branch(Vec<Arc<dyn Stage>>),
    Nested(Chain),
}

impl Node {
    pub fn input(&self) -> Shape {
        match self {
            Node::Single(stage) => stage.input(),
            Node::Branch(members) => Shape::Tuple(members.iter().map(|m| m.input()).collect()),
            Node::Nested(chain) => Stage::input(chain),
        }
    }

    pub fn output(&self) -> Shape {
        match self {
            Node::Single(stage) => stage.output(),
            Node::Branch(members) => Shape::Tuple(members.iter().map(|m| m.output()).collect()),
            Node::Nested(chain) => Stage::output(chain),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Node::Single(stage) => stage.signature().to_string(),
            Node::Branch(members) => {
                let names: Vec<&str> = members.iter().map(|m| m.signature().as_str()).collect();
                format!("({})", names.join(", "))
            }
            Node::Nested(chain) => chain.to_string(),
        }
    }

    pub fn rebind(self, routing: &Routing) -> Self {
        match self {
            Node::Nested(chain) => Node::Nested(chain.rebind(routing)),
            other => other,
        }
    }
}

/// Comprueba que `next` acepta lo que produce `prev`.
///
/// Reglas en orden, gana la primera que aplica:
/// 1. tupla -> tupla de igual aridad: igualdad componente a componente.
/// 2. escalar -> grupo de ramas: cada rama debe requerir exactamente la salida.
/// 3. resto (aridad distinta, tupla -> escalar, escalar -> escalar):
///    igualdad directa. Un stage reductor debe declarar entrada tupla.
pub(crate) fn check_adjacent(prev: &Node, next: &Node) -> Result<(), PipelineError> {
    let produces = prev.output();
    let requires = next.input();
    let compatible = match (&produces, &requires, next) {
        (Shape::Tuple(out), Shape::Tuple(inp), _) if out.len() == inp.len() => {
            out.iter().zip(inp).all(|(o, i)| o == i)
        }
        (out, Shape::Tuple(_), Node::Branch(members)) if !out.is_tuple() => {
            members.iter().all(|m| &m.input() == out)
        }
        (out, inp, _) => out == inp,
    };
    if compatible {
        Ok(())
    } else {
        Err(PipelineError::Incompatible {
            upstream: prev.describe(),
            produces,
            downstream: next.describe(),
            requires,
        })
    }
}

pub(crate) fn validate(nodes: &[Node]) -> Result<(), PipelineError> {
    if nodes.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }
    for pair in nodes.windows(2) {
        check_adjacent(&pair[0], &pair[1])?;
    }
    Ok(())
}
