//! Modelos neutrales (TypeTag, Shape, Flow, FingerprintInput).

pub mod fingerprint;
pub mod flow;
pub mod shape;
pub mod tag;

pub use fingerprint::FingerprintInput;
pub use flow::Flow;
pub use shape::Shape;
pub use tag::{intern, registered_count, tag_for, TypeTag};
