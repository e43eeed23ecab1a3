//! Stages numéricos sobre `vals` (listas de enteros).

use broca_core::{Shape, Signature, StageError, TypedStage};

use crate::tags::{vals, VALS};

/// Suma una constante a cada elemento.
#[derive(Debug, Clone)]
pub struct AddConst {
    n: i64,
    signature: Signature,
}

impl AddConst {
    pub fn new(n: i64) -> Self {
        Self {
            n,
            signature: Signature::new(module_path!(), "AddConst").arg(n),
        }
    }
}

impl TypedStage for AddConst {
    type Input = Vec<i64>;
    type Output = Vec<i64>;
    const SOURCE: &'static str = "add_const/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        vals()
    }

    fn output(&self) -> Shape {
        vals()
    }

    fn run_typed(&self, input: Vec<i64>) -> Result<Vec<i64>, StageError> {
        input
            .into_iter()
            .map(|v| {
                v.checked_add(self.n).ok_or_else(|| {
                    StageError::Runtime(format!("overflow adding {} to {v}", self.n))
                })
            })
            .collect()
    }
}

/// Multiplica cada elemento por un factor.
#[derive(Debug, Clone)]
pub struct Scale {
    factor: i64,
    signature: Signature,
}

impl Scale {
    pub fn new(factor: i64) -> Self {
        Self {
            factor,
            signature: Signature::new(module_path!(), "Scale").kwarg("factor", factor),
        }
    }
}

impl TypedStage for Scale {
    type Input = Vec<i64>;
    type Output = Vec<i64>;
    const SOURCE: &'static str = "scale/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        vals()
    }

    fn output(&self) -> Shape {
        vals()
    }

    fn run_typed(&self, input: Vec<i64>) -> Result<Vec<i64>, StageError> {
        input
            .into_iter()
            .map(|v| {
                v.checked_mul(self.factor).ok_or_else(|| {
                    StageError::Runtime(format!("overflow scaling {v} by {}", self.factor))
                })
            })
            .collect()
    }
}

/// Reduce `arity` listas a una sumando posición a posición.
///
/// Declara entrada tupla `(vals, ..., vals)`, así que sólo puede ir detrás de
/// un grupo de ramas (o de un stage con salida tupla) de la misma aridad.
#[derive(Debug, Clone)]
pub struct SumElementwise {
    arity: usize,
    signature: Signature,
}

impl SumElementwise {
    pub fn new(arity: usize) -> Result<Self, StageError> {
        if arity < 2 {
            return Err(StageError::Configuration(format!(
                "SumElementwise needs at least 2 inputs, got {arity}"
            )));
        }
        Ok(Self {
            arity,
            signature: Signature::new(module_path!(), "SumElementwise").arg(arity),
        })
    }
}

impl TypedStage for SumElementwise {
    type Input = Vec<Vec<i64>>;
    type Output = Vec<i64>;
    const SOURCE: &'static str = "sum_elementwise/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        Shape::tuple(std::iter::repeat(VALS).take(self.arity))
    }

    fn output(&self) -> Shape {
        vals()
    }

    fn run_typed(&self, input: Vec<Vec<i64>>) -> Result<Vec<i64>, StageError> {
        if input.len() != self.arity {
            return Err(StageError::Runtime(format!(
                "expected {} inputs, got {}",
                self.arity,
                input.len()
            )));
        }
        let len = input.iter().map(Vec::len).min().unwrap_or(0);
        (0..len)
            .map(|i| {
                input.iter().try_fold(0i64, |acc, v| {
                    acc.checked_add(v[i]).ok_or_else(|| {
                        StageError::Runtime(format!("overflow summing position {i}"))
                    })
                })
            })
            .collect()
    }
}
