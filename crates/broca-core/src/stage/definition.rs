use crate::errors::StageError;
use crate::model::{Flow, Shape};

use super::Signature;

/// Contrato neutro que el núcleo usa para invocar cualquier stage.
///
/// Un stage es inmutable una vez construido. El núcleo nunca inspecciona su
/// cuerpo: sólo compara formas declaradas, lo invoca y usa firma + huella de
/// código como parte de la clave de cache.
pub trait Stage: Send + Sync {
    /// Firma estable (nombre + argumentos de construcción).
    fn signature(&self) -> &Signature;

    /// Forma de entrada requerida; `Shape::Absent` para fuentes.
    fn input(&self) -> Shape;

    /// Forma de salida producida.
    fn output(&self) -> Shape;

    /// Huella del código del stage (constante de versión o hash del artefacto
    /// compilado). Cambiarla invalida las entradas de cache previas.
    fn source_fingerprint(&self) -> &str;

    /// Ejecuta el cuerpo. Con entrada tupla recibe un argumento por
    /// componente; en otro caso exactamente uno.
    fn call(&self, args: Vec<Flow>) -> Result<Flow, StageError>;

    /// `false` para stages cuyo resultado no vale la pena persistir
    /// (identidad, pipelines anidados que ya cachean sus stages internos).
    fn memoizable(&self) -> bool {
        true
    }
}
