use std::fmt;
use std::sync::Arc;

use super::Pipeline;
use crate::stage::Stage;

/// Elemento de construcción de un pipeline.
///
/// - `Single`: un stage.
/// - `Branch`: grupo de ramas evaluadas sobre una entrada con la misma forma
///   (zip) o sobre una entrada escalar (broadcast).
/// - `Alternatives`: variantes para comparar; dispara la expansión a
///   `MultiPipeline` (producto cartesiano).
/// - `Nested`: un pipeline ya construido. Uno lineal se comporta como un
///   stage; un multi-pipeline aporta sus variantes como alternativas.
#[derive(Clone)]
pub enum Element {
    Single(Arc<dyn Stage>),
    Branch(Vec<Arc<dyn Stage>>),
    Alternatives(Vec<Element>),
    Nested(Pipeline),
}

impl Element {
    pub(crate) fn is_multi(&self) -> bool {
        matches!(self, Element::Alternatives(_) | Element::Nested(Pipeline::Multi(_)))
    }
}

impl From<Pipeline> for Element {
    fn from(pipeline: Pipeline) -> Self {
        Element::Nested(pipeline)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Single(s) => write!(f, "Single({})", s.signature()),
            Element::Branch(members) => {
                let names: Vec<&str> = members.iter().map(|m| m.signature().as_str()).collect();
                write!(f, "Branch({})", names.join(", "))
            }
            Element::Alternatives(alts) => f.debug_tuple("Alternatives").field(alts).finish(),
            Element::Nested(p) => write!(f, "Nested({p})"),
        }
    }
}

/// `Element::Single` a partir de un stage concreto.
pub fn stage<S: Stage + 'static>(stage: S) -> Element {
    Element::Single(Arc::new(stage))
}

/// `Element::Branch` a partir de stages ya compartidos.
pub fn branch<I>(members: I) -> Element
where
    I: IntoIterator<Item = Arc<dyn Stage>>,
{
    Element::Branch(members.into_iter().collect())
}

/// `Element::Alternatives`.
pub fn alternatives<I>(options: I) -> Element
where
    I: IntoIterator<Item = Element>,
{
    Element::Alternatives(options.into_iter().collect())
}

pub fn nested(pipeline: Pipeline) -> Element {
    Element::Nested(pipeline)
}

/// Grupo de ramas a partir de stages concretos heterogéneos:
///
/// ```ignore
/// let e = branch![AddConst::new(2), AddConst::new(3), AddConst::new(4)];
/// ```
#[macro_export]
macro_rules! branch {
    ($($member:expr),+ $(,)?) => {
        $crate::pipeline::Element::Branch(vec![
            $(::std::sync::Arc::new($member) as ::std::sync::Arc<dyn $crate::stage::Stage>),+
        ])
    };
}
