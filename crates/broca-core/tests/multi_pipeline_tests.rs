use broca_core::{
    alternatives, nested, stage, Element, Flow, FnStage, Pipeline, PipelineOptions, Shape,
    Signature, StageError,
};
use serde_json::{json, Value};

fn text_stage(name: &'static str, input: &str, output: &str, f: fn(&str) -> String) -> FnStage {
    FnStage::new(
        Signature::new("multi_pipeline_tests", name),
        Shape::of(input),
        Shape::of(output),
        "text/v1",
        move |args| {
            let docs: Vec<String> = serde_json::from_value(args[0].to_value())
                .map_err(|e| StageError::Decode(e.to_string()))?;
            Ok(Flow::scalar(json!(docs.iter().map(|d| f(d)).collect::<Vec<_>>())))
        },
    )
}

fn strip_tags() -> FnStage {
    text_stage("StripTags", "html", "docs", |d| {
        d.replace("<div>", "").replace("</div>", "")
    })
}

fn lower() -> FnStage {
    text_stage("Lower", "docs", "docs", |d| d.to_lowercase())
}

fn first_word() -> FnStage {
    text_stage("FirstWord", "docs", "keywords", |d| {
        d.split_whitespace().next().unwrap_or_default().to_string()
    })
}

fn last_word() -> FnStage {
    text_stage("LastWord", "docs", "keywords", |d| {
        d.split_whitespace().last().unwrap_or_default().to_string()
    })
}

fn build(elements: Vec<Element>) -> Pipeline {
    Pipeline::with_options(elements, PipelineOptions::uncached()).unwrap()
}

fn outputs(flow: Flow) -> Vec<Value> {
    flow.as_tuple()
        .expect("multi output")
        .iter()
        .map(Flow::to_value)
        .collect()
}

#[test]
fn alternatives_run_every_variant_on_the_same_input() {
    let p = build(vec![
        stage(lower()),
        alternatives([stage(first_word()), stage(last_word())]),
    ]);
    assert!(p.is_multi());
    let out = p.run(json!(["Great Nicolas Cage", "Galactic Ocean"])).unwrap();
    assert_eq!(
        outputs(out),
        vec![json!(["great", "galactic"]), json!(["cage", "ocean"])]
    );
}

#[test]
fn nested_linear_pipeline_acts_as_one_stage() {
    let inner = build(vec![stage(strip_tags()), stage(lower())]);
    let p = build(vec![nested(inner), stage(first_word())]);
    assert!(!p.is_multi());
    assert_eq!(
        p.to_string(),
        "Pipeline(Pipeline(StripTags(), Lower()), FirstWord())"
    );
    let out = p.run(json!(["<div>Vast Empty</div>"])).unwrap();
    assert_eq!(out.to_value(), json!(["vast"]));
}

#[test]
fn nested_multi_pipeline_expands_the_outer_one() {
    let inner = build(vec![
        stage(lower()),
        alternatives([stage(first_word()), stage(last_word())]),
    ]);
    let p = build(vec![stage(strip_tags()), nested(inner)]);
    let multi = p.as_multi().expect("nested multi expands");
    assert_eq!(multi.len(), 2);
    let out = p.run(json!(["<div>Sacred Galactic Seas</div>"])).unwrap();
    assert_eq!(outputs(out), vec![json!(["sacred"]), json!(["seas"])]);
}

#[test]
fn alternatives_may_hold_whole_sequences() {
    let two_steps = build(vec![stage(lower()), stage(first_word())]);
    let p = build(vec![
        stage(strip_tags()),
        alternatives([nested(two_steps), stage(last_word())]),
    ]);
    let out = p.run(json!(["<div>Mighty Palms</div>"])).unwrap();
    assert_eq!(outputs(out), vec![json!(["mighty"]), json!(["Palms"])]);
}

#[test]
fn product_size_is_multiplicative() {
    let p = build(vec![
        alternatives([stage(lower()), stage(lower()), stage(lower())]),
        alternatives([stage(first_word()), stage(last_word())]),
    ]);
    assert_eq!(p.as_multi().map(|m| m.len()), Some(6));
}
