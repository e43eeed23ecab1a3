use std::sync::Arc;

use broca_core::{
    branch, stage, Element, FnStage, Pipeline, PipelineError, PipelineOptions, Shape, Signature,
    Stage, StageError, TypedStage,
};
use serde_json::json;

// Stage sin cuerpo útil: sólo importan las formas declaradas.
fn pipe(name: &str, input: Shape, output: Shape) -> Arc<dyn Stage> {
    Arc::new(FnStage::new(
        Signature::new("branching_tests", name),
        input,
        output,
        "shape-only",
        |_| Err(StageError::Runtime("not runnable".into())),
    ))
}

fn tag(name: &str) -> Shape {
    Shape::of(name)
}

fn build(elements: Vec<Element>) -> Result<Pipeline, PipelineError> {
    Pipeline::with_options(elements, PipelineOptions::uncached().parallel(false))
}

fn single(stage: &Arc<dyn Stage>) -> Element {
    Element::Single(stage.clone())
}

fn group(members: &[&Arc<dyn Stage>]) -> Element {
    Element::Branch(members.iter().map(|m| Arc::clone(m)).collect())
}

#[test]
fn multi_output_into_matching_branches_then_reduce() {
    let a = pipe("A", tag("a"), Shape::tuple(["b", "c", "d"]));
    let b = pipe("B", tag("b"), tag("b_out"));
    let c = pipe("C", tag("c"), tag("c_out"));
    let d = pipe("D", tag("d"), tag("d_out"));
    let e = pipe("E", Shape::tuple(["b_out", "c_out", "d_out"]), tag("e"));
    let p = build(vec![single(&a), group(&[&b, &c, &d]), single(&e)]).expect("valid pipeline");
    assert_eq!(p.to_string(), "Pipeline(A(), (B(), C(), D()), E())");
}

#[test]
fn multi_output_into_wrong_branches_is_rejected() {
    let a = pipe("A", tag("a"), Shape::tuple(["b", "c", "d"]));
    let b = pipe("B", tag("b"), tag("b_out"));
    let c = pipe("C", tag("c"), tag("c_out"));
    let d = pipe("D", tag("d"), tag("d_out"));
    let e = pipe("E", Shape::tuple(["b_out", "c_out", "d_out"]), tag("e"));

    // tamaño de grupo distinto
    assert!(build(vec![single(&a), group(&[&b, &c]), single(&e)]).is_err());
    // orden de ramas distinto
    assert!(build(vec![single(&a), group(&[&c, &b, &d]), single(&e)]).is_err());
    // tipo de entrada distinto
    let d_x = pipe("D_", tag("x"), tag("d_out"));
    assert!(build(vec![single(&a), group(&[&b, &c, &d_x]), single(&e)]).is_err());
    // aridad de salida distinta
    let a_short = pipe("A_", tag("a"), Shape::tuple(["b", "c"]));
    assert!(build(vec![single(&a_short), group(&[&b, &c, &d]), single(&e)]).is_err());
    // tipos de salida distintos
    let a_y = pipe("A_", tag("a"), Shape::tuple(["b", "c", "y"]));
    assert!(build(vec![single(&a_y), group(&[&b, &c, &d]), single(&e)]).is_err());
}

#[test]
fn branches_into_branches() {
    let a = pipe("A", tag("a"), Shape::tuple(["b", "c", "d"]));
    let b = pipe("B", tag("b"), tag("b"));
    let c = pipe("C", tag("c"), tag("c"));
    let d = pipe("D", tag("d"), tag("d"));
    let e = pipe("E", Shape::tuple(["b", "c", "d"]), tag("e"));
    assert!(build(vec![
        single(&a),
        group(&[&b, &c, &d]),
        group(&[&b, &c, &d]),
        single(&e),
    ])
    .is_ok());

    let bx = pipe("B", tag("b"), tag("x"));
    let cx = pipe("C", tag("c"), tag("x"));
    let dx = pipe("D", tag("d"), tag("x"));
    let err = build(vec![
        single(&a),
        group(&[&bx, &cx, &dx]),
        group(&[&bx, &cx, &dx]),
        single(&e),
    ])
    .unwrap_err();
    assert!(matches!(err, PipelineError::Incompatible { .. }));
}

#[test]
fn single_output_broadcasts_to_branches() {
    let a = pipe("A", tag("a"), tag("x"));
    let b = pipe("B", tag("x"), tag("b_out"));
    let c = pipe("C", tag("x"), tag("c_out"));
    let d = pipe("D", tag("x"), tag("d_out"));
    let e = pipe("E", Shape::tuple(["b_out", "c_out", "d_out"]), tag("e"));
    assert!(build(vec![single(&a), group(&[&b, &c, &d]), single(&e)]).is_ok());

    let d_y = pipe("D", tag("y"), tag("d_out"));
    assert!(build(vec![single(&a), group(&[&b, &c, &d_y]), single(&e)]).is_err());

    let e_y = pipe("E", Shape::tuple(["b_out", "c_out", "y"]), tag("e"));
    assert!(build(vec![single(&a), group(&[&b, &c, &d]), single(&e_y)]).is_err());
}

#[test]
fn pipelines_may_start_or_end_with_branches() {
    let a = pipe("A", tag("a"), tag("x"));
    let b = pipe("B", tag("x"), tag("b_out"));
    let c = pipe("C", tag("x"), tag("c_out"));
    let d = pipe("D", tag("x"), tag("d_out"));
    let e = pipe("E", Shape::tuple(["b_out", "c_out", "d_out"]), tag("e"));

    let starts = build(vec![group(&[&b, &c, &d]), single(&e)]).unwrap();
    let chain = starts.as_chain().unwrap();
    assert_eq!(Stage::input(chain), Shape::tuple(["x", "x", "x"]));

    let ends = build(vec![single(&a), group(&[&b, &c, &d])]).unwrap();
    assert_eq!(
        Stage::output(ends.as_chain().unwrap()),
        Shape::tuple(["b_out", "c_out", "d_out"])
    );
}

struct AddN {
    n: i64,
    signature: Signature,
}

impl AddN {
    fn new(n: i64) -> Self {
        Self {
            n,
            signature: Signature::new("branching_tests", "AddN").arg(n),
        }
    }
}

impl TypedStage for AddN {
    type Input = Vec<i64>;
    type Output = Vec<i64>;
    const SOURCE: &'static str = "add_n/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        tag("vals")
    }

    fn output(&self) -> Shape {
        tag("vals")
    }

    fn run_typed(&self, input: Vec<i64>) -> Result<Vec<i64>, StageError> {
        Ok(input.into_iter().map(|v| v + self.n).collect())
    }
}

struct SumThree {
    signature: Signature,
}

impl SumThree {
    fn new() -> Self {
        Self {
            signature: Signature::new("branching_tests", "SumThree"),
        }
    }
}

impl TypedStage for SumThree {
    type Input = (Vec<i64>, Vec<i64>, Vec<i64>);
    type Output = Vec<i64>;
    const SOURCE: &'static str = "sum_three/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        Shape::tuple(["vals", "vals", "vals"])
    }

    fn output(&self) -> Shape {
        tag("vals")
    }

    fn run_typed(&self, (a, b, c): Self::Input) -> Result<Vec<i64>, StageError> {
        Ok(a.iter().zip(&b).zip(&c).map(|((x, y), z)| x + y + z).collect())
    }
}

/// Reduce de una sola rama: entrada tupla de aridad 1.
struct First {
    signature: Signature,
}

impl First {
    fn new() -> Self {
        Self {
            signature: Signature::new("branching_tests", "First"),
        }
    }
}

impl TypedStage for First {
    type Input = (Vec<i64>,);
    type Output = Vec<i64>;
    const SOURCE: &'static str = "first/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        Shape::tuple(["vals"])
    }

    fn output(&self) -> Shape {
        tag("vals")
    }

    fn run_typed(&self, (vals,): Self::Input) -> Result<Vec<i64>, StageError> {
        Ok(vals)
    }
}

#[test]
fn branching_pipeline_computes_broadcast_then_zip() {
    let p = build(vec![
        stage(AddN::new(1)),
        branch![AddN::new(2), AddN::new(3), AddN::new(4)],
        branch![AddN::new(2), AddN::new(3), AddN::new(4)],
        stage(SumThree::new()),
    ])
    .unwrap();
    let out = p.run(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(out.to_value(), json!([24, 27, 30, 33]));
}

#[test]
fn identical_branches_then_reduce() {
    let p = build(vec![
        stage(AddN::new(1)),
        branch![AddN::new(2), AddN::new(2), AddN::new(2)],
        stage(SumThree::new()),
    ])
    .unwrap();
    let out = p.run(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(out.to_value(), json!([12, 15, 18, 21]));
}

#[test]
fn decode_failure_surfaces_as_stage_error() {
    let p = build(vec![stage(AddN::new(1))]).unwrap();
    let err = p.run(json!(["not", "numbers"])).unwrap_err();
    assert!(matches!(err, PipelineError::Stage(StageError::Decode(_))));
}

#[test]
fn single_member_branch_feeds_single_slot_reduce() {
    let p = build(vec![
        stage(AddN::new(1)),
        branch![AddN::new(1)],
        stage(First::new()),
    ])
    .unwrap();
    let out = p.run(json!([1, 2])).unwrap();
    assert_eq!(out.to_value(), json!([3, 4]));
}
