use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use broca_core::{
    alternatives, branch, stage, BrocaConfig, Cryo, Flow, Pipeline, PipelineError, PipelineOptions,
};
use broca_stages::{
    AddConst, Cleaner, HashingVectorizer, HtmlCleaner, SumElementwise, Tokenizer,
};
use serde_json::json;

const USAGE: &str = "Uso:
  broca demo [--no-cache] [--refresh] [--cache-dir <DIR>]
  broca fingerprint <N>
  broca tags <NOMBRE>...";

fn main() {
    // Cargar .env si existe (BROCA_CACHE_DIR, BROCA_FREEZE, ...)
    broca_core::config::init_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let code = match args.get(1).map(String::as_str) {
        Some("demo") => demo(&args[2..]),
        Some("fingerprint") => fingerprint(&args[2..]),
        Some("tags") => tags(&args[2..]),
        _ => {
            eprintln!("{USAGE}");
            2
        }
    };
    exit(code);
}

fn demo(args: &[String]) -> i32 {
    let config = match BrocaConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[broca demo] config: {e}");
            return 2;
        }
    };
    let mut options = PipelineOptions::from_config(&config);
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--no-cache" => options.freeze = false,
            "--refresh" => options.refresh = true,
            "--cache-dir" => {
                i += 1;
                match args.get(i) {
                    Some(dir) => options.cache_dir = PathBuf::from(dir),
                    None => {
                        eprintln!("{USAGE}");
                        return 2;
                    }
                }
            }
            other => {
                eprintln!("[broca demo] argumento desconocido: {other}\n{USAGE}");
                return 2;
            }
        }
        i += 1;
    }
    let cryo = options.freeze.then(|| Arc::new(Cryo::on_disk(&options.cache_dir)));
    if let Some(c) = &cryo {
        options = options.with_cache(c.clone());
    }

    match run_demo(options) {
        Ok(()) => {
            if let Some(c) = cryo {
                let stats = c.stats();
                println!(
                    "cache: hits={} misses={} writes={} write_failures={} corrupt={} hit_rate={:.1}%",
                    stats.hits,
                    stats.misses,
                    stats.writes,
                    stats.write_failures,
                    stats.corrupt,
                    stats.hit_rate_percent()
                );
            }
            0
        }
        Err(e) => {
            eprintln!("[broca demo] error: {e}");
            1
        }
    }
}

fn run_demo(options: PipelineOptions) -> Result<(), PipelineError> {
    log::info!(
        "demo: freeze={} refresh={} parallel={}",
        options.freeze,
        options.refresh,
        options.parallel
    );
    let numeric = Pipeline::with_options(
        vec![
            stage(AddConst::new(1)),
            branch![AddConst::new(2), AddConst::new(2), AddConst::new(2)],
            stage(SumElementwise::new(3)?),
        ],
        options.clone(),
    )?;
    let out = numeric.run(json!([1, 2, 3, 4]))?;
    println!("{numeric}\n  => {}", out.to_value());

    let text = Pipeline::with_options(
        vec![
            stage(HtmlCleaner::default()),
            alternatives([stage(Cleaner::default()), stage(Cleaner::keep_case())]),
            alternatives([stage(Tokenizer::new(1)), stage(Tokenizer::new(4))]),
            stage(HashingVectorizer::new(8)?),
        ],
        options,
    )?;
    let docs = json!([
        "<p>In the Before-Time, there was only the Vast Empty.</p>",
        "<p>As a Galactic Ocean floated by, Nicolas Cage reached out His hand.</p>"
    ]);
    let results = text.run(docs)?;
    if let (Some(multi), Some(rows)) = (text.as_multi(), results.as_tuple()) {
        for (variant, result) in multi.variants().iter().zip(rows) {
            println!("{variant}\n  => {}", result.to_value());
        }
    }
    Ok(())
}

fn fingerprint(args: &[String]) -> i32 {
    let Some(n) = args.first().and_then(|a| a.parse::<i64>().ok()) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let stage = AddConst::new(n);
    let input = [Flow::scalar(json!([1, 2, 3, 4]))];
    match Cryo::in_memory().fingerprint(&stage, &input) {
        Ok(key) => {
            println!("{}/{}/{}", key.module, key.name, key.digest);
            println!("{}", key.relative_path().display());
            0
        }
        Err(e) => {
            eprintln!("[broca fingerprint] error: {e}");
            1
        }
    }
}

fn tags(names: &[String]) -> i32 {
    if names.is_empty() {
        eprintln!("{USAGE}");
        return 2;
    }
    for name in names {
        let tag = broca_core::tag_for(name);
        println!("{} -> #{}", tag, tag.id());
    }
    println!("registradas: {}", broca_core::model::registered_count());
    0
}
