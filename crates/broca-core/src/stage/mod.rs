//! Definiciones relacionadas a Stages.
//!
//! Un Stage es una unidad opaca que transforma una entrada tipada (por
//! etiqueta) en una salida tipada. Este módulo define:
//! - `Stage`: interfaz neutra usada por pipeline y cache.
//! - `TypedStage`: interfaz de alto nivel (opcional) con tipos fuertes.
//! - `Signature`: identidad estable para mostrar y para la clave de cache.
//! - `FnStage` e `Identity`: stages utilitarios.

pub mod definition;
pub mod func;
pub mod identity;
pub mod signature;
pub mod typed;

pub use definition::Stage;
pub use func::FnStage;
pub use identity::Identity;
pub use signature::Signature;
pub use typed::TypedStage;
