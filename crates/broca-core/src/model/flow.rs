use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Valor que circula entre stages.
///
/// `Scalar` lleva un payload JSON neutro (escalar, secuencia, matriz o mapa);
/// `Tuple` resulta de un grupo de ramas o de un stage con salida múltiple. El
/// pipeline decide broadcast vs. zip mirando este discriminante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flow {
    Scalar(Value),
    Tuple(Vec<Flow>),
}

impl Flow {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Flow::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Flow::Scalar(v) => Some(v),
            Flow::Tuple(_) => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Flow]> {
        match self {
            Flow::Tuple(items) => Some(items),
            Flow::Scalar(_) => None,
        }
    }

    /// Colapsa tuplas a arrays JSON (recursivo).
    pub fn to_value(&self) -> Value {
        match self {
            Flow::Scalar(v) => v.clone(),
            Flow::Tuple(items) => Value::Array(items.iter().map(Flow::to_value).collect()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Flow::Scalar(v) => v,
            Flow::Tuple(items) => Value::Array(items.into_iter().map(Flow::into_value).collect()),
        }
    }
}

impl From<Value> for Flow {
    fn from(value: Value) -> Self {
        Flow::Scalar(value)
    }
}
