use std::fmt;

use super::{tag_for, TypeTag};

/// Forma declarada de la entrada o salida de un stage.
///
/// `Absent` marca un stage fuente (sin entrada). `Tuple` aparece en puntos de
/// ramificación: salidas múltiples o entradas que recombinan ramas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Absent,
    Tag(TypeTag),
    Tuple(Vec<Shape>),
}

impl Shape {
    pub fn of(name: &str) -> Self {
        Shape::Tag(tag_for(name))
    }

    /// Tupla de etiquetas simples, en orden.
    pub fn tuple<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Shape::Tuple(names.into_iter().map(Shape::of).collect())
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Shape::Tuple(_))
    }
}

impl From<TypeTag> for Shape {
    fn from(tag: TypeTag) -> Self {
        Shape::Tag(tag)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Absent => f.write_str("none"),
            Shape::Tag(tag) => write!(f, "{tag}"),
            Shape::Tuple(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", rendered.join(", "))
            }
        }
    }
}
