//! Etiquetas usadas por los stages de este crate.

use broca_core::Shape;

pub const VALS: &str = "vals";
pub const HTML: &str = "html";
pub const DOCS: &str = "docs";
pub const TOKENS: &str = "tokens";
pub const VECS: &str = "vecs";

pub fn vals() -> Shape {
    Shape::of(VALS)
}

pub fn html() -> Shape {
    Shape::of(HTML)
}

pub fn docs() -> Shape {
    Shape::of(DOCS)
}

pub fn tokens() -> Shape {
    Shape::of(TOKENS)
}

pub fn vecs() -> Shape {
    Shape::of(VECS)
}
