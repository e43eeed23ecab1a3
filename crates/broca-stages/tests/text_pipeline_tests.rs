//! Pipelines de texto completos sobre los stages de este crate.

use std::sync::Arc;

use broca_core::{alternatives, stage, Cryo, Flow, Pipeline, PipelineError, PipelineOptions};
use broca_stages::{Cleaner, HashingVectorizer, HtmlCleaner, Tokenizer};
use serde_json::json;

fn docs() -> serde_json::Value {
    json!([
        "<div>The Great Nicolas Cage's will</div>",
        "<div>A Galactic Ocean — floated by</div>"
    ])
}

#[test]
fn html_to_tokens() {
    let p = Pipeline::with_options(
        vec![
            stage(HtmlCleaner::default()),
            stage(Cleaner::default()),
            stage(Tokenizer::new(3)),
        ],
        PipelineOptions::uncached(),
    )
    .unwrap();
    let out = p.run(docs()).unwrap();
    assert_eq!(
        out.to_value(),
        json!([
            ["the", "great", "nicolas", "cage", "will"],
            ["galactic", "ocean", "floated"]
        ])
    );
}

#[test]
fn cleaner_before_html_cleaner_is_rejected() {
    let err = Pipeline::with_options(
        vec![stage(Cleaner::default()), stage(HtmlCleaner::default())],
        PipelineOptions::uncached(),
    )
    .unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, PipelineError::Incompatible { .. }));
    assert!(msg.contains("Cleaner()") && msg.contains("HtmlCleaner()"), "{msg}");
}

#[test]
fn tokenizer_alternatives_share_cached_prefix() {
    let cryo = Arc::new(Cryo::in_memory());
    let options = PipelineOptions::default()
        .parallel(false)
        .with_cache(cryo.clone());
    let p = Pipeline::with_options(
        vec![
            stage(HtmlCleaner::default()),
            stage(Cleaner::default()),
            alternatives([stage(Tokenizer::new(1)), stage(Tokenizer::new(5))]),
            stage(HashingVectorizer::new(16).unwrap()),
        ],
        options,
    )
    .unwrap();
    let out = p.run(docs()).unwrap();
    let variants = out.as_tuple().unwrap();
    assert_eq!(variants.len(), 2);
    for v in variants {
        let rows: Vec<Vec<u32>> = serde_json::from_value(v.to_value()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 16));
    }

    // HtmlCleaner y Cleaner se calculan una vez; la segunda variante los reutiliza.
    let stats = cryo.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 6);

    // Segunda ejecución completa: todo sale de la cache.
    let again = p.run(docs()).unwrap();
    assert_eq!(again, out);
    assert_eq!(cryo.stats().misses, 6);
}

#[test]
fn differently_configured_cleaners_do_not_collide() {
    let cryo = Arc::new(Cryo::in_memory());
    let options = PipelineOptions::default().with_cache(cryo.clone());
    let lower = Pipeline::with_options(vec![stage(Cleaner::default())], options.clone()).unwrap();
    let keep = Pipeline::with_options(vec![stage(Cleaner::keep_case())], options).unwrap();
    let a = lower.run(json!(["Hello World"])).unwrap();
    let b = keep.run(json!(["Hello World"])).unwrap();
    assert_eq!(a, Flow::scalar(json!(["hello world"])));
    assert_eq!(b, Flow::scalar(json!(["Hello World"])));
}
