use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Signature, Stage};
use crate::errors::StageError;
use crate::model::{Flow, Shape};

/// Interfaz de alto nivel para definir stages con tipos fuertes.
///
/// Implementadores escriben `run_typed` con tipos concretos; el adaptador de
/// abajo convierte esa ejecución a la interfaz neutra `Stage`. Una entrada
/// tupla se decodifica desde el array de argumentos, así que `Input` puede ser
/// una tupla de Rust o un `Vec` homogéneo.
pub trait TypedStage: Send + Sync {
    type Input: DeserializeOwned;
    type Output: Serialize;

    /// Versión del código del stage; incrementar al cambiar el cuerpo.
    const SOURCE: &'static str;

    fn signature(&self) -> &Signature;

    fn input(&self) -> Shape;

    fn output(&self) -> Shape;

    fn run_typed(&self, input: Self::Input) -> Result<Self::Output, StageError>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStage` implementa `Stage` neutro.
// -------------------------------------------------------------
impl<T> Stage for T
where
    T: TypedStage + 'static,
{
    fn signature(&self) -> &Signature {
        <Self as TypedStage>::signature(self)
    }

    fn input(&self) -> Shape {
        <Self as TypedStage>::input(self)
    }

    fn output(&self) -> Shape {
        <Self as TypedStage>::output(self)
    }

    fn source_fingerprint(&self) -> &str {
        T::SOURCE
    }

    fn call(&self, args: Vec<Flow>) -> Result<Flow, StageError> {
        let raw = collapse_args(args, &<Self as TypedStage>::input(self));
        let input: T::Input = serde_json::from_value(raw).map_err(|e| {
            StageError::Decode(format!("{}: {e}", <Self as TypedStage>::signature(self)))
        })?;
        let output = self.run_typed(input)?;
        let value = serde_json::to_value(output).map_err(|e| StageError::Encode(e.to_string()))?;
        Ok(split_output(value, &<Self as TypedStage>::output(self)))
    }
}

/// Valor JSON que recibe `run_typed`. Con entrada tupla siempre es un array
/// (también con aridad 1); en otro caso el único argumento tal cual.
fn collapse_args(mut args: Vec<Flow>, shape: &Shape) -> Value {
    if let Shape::Tuple(parts) = shape {
        let already_packed =
            matches!(args.as_slice(), [Flow::Tuple(items)] if items.len() == parts.len());
        if already_packed {
            return args.remove(0).into_value();
        }
        return Value::Array(args.into_iter().map(Flow::into_value).collect());
    }
    match args.len() {
        0 => Value::Null,
        1 => args.remove(0).into_value(),
        _ => Value::Array(args.into_iter().map(Flow::into_value).collect()),
    }
}

/// Re-expande a `Flow::Tuple` cuando la salida declarada es una tupla con la
/// misma aridad que el array producido.
fn split_output(value: Value, shape: &Shape) -> Flow {
    match (value, shape) {
        (Value::Array(items), Shape::Tuple(parts)) if items.len() == parts.len() => {
            Flow::Tuple(items.into_iter().zip(parts).map(|(v, p)| split_output(v, p)).collect())
        }
        (value, _) => Flow::Scalar(value),
    }
}
