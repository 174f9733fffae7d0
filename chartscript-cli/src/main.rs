//! chartscript CLI: run chart scripts over candle history.
//!
//! Commands:
//! - `run`: load candles (file or synthetic), compute overlays, print or save them
//! - `classify`: show which engine a script routes to and its parameters
//! - `templates`: list the built-in scripts
//! - `synthetic`: print a placeholder candle series as JSON

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chartscript_core::compute_overlays;
use chartscript_core::script::{all_templates, classify, find_template};
use chartscript_runner::config::ChartConfig;
use chartscript_runner::export::{export_json, save_artifacts, ExportDocument};
use chartscript_runner::{load_candles, CandleSource, FetchRequest, JsonFileSource};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartscript",
    about = "chartscript CLI: indicator and ML-signal overlays from chart scripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute overlays for one chart.
    Run {
        /// Path to a TOML chart config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbol (overrides the config).
        #[arg(long)]
        symbol: Option<String>,

        /// Timeframe: 1m, 5m, 15m, 1h, 4h, D, W, M (overrides the config).
        #[arg(long)]
        timeframe: Option<String>,

        /// Candle JSON file, or a directory of `<SYMBOL>.json` files.
        /// Without it, synthetic placeholder candles are used.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Inline script; repeatable. Runs after config scripts.
        #[arg(long = "script")]
        scripts: Vec<String>,

        /// Script file; repeatable. Each file is one script.
        #[arg(long = "script-file")]
        script_files: Vec<PathBuf>,

        /// Built-in template name; repeatable.
        #[arg(long = "template")]
        templates: Vec<String>,

        /// Seed for reproducible placeholder candles.
        #[arg(long)]
        seed: Option<u64>,

        /// Save manifest.json, markers.csv and series.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full JSON document instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show how a script is routed.
    Classify {
        /// Script file to classify.
        #[arg(long, conflicts_with = "script")]
        file: Option<PathBuf>,

        /// Inline script (or template name) to classify.
        script: Option<String>,
    },
    /// List built-in script templates.
    Templates {
        /// Also print each template's script.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Print placeholder candles for a symbol as JSON.
    Synthetic {
        #[arg(long, default_value = "BBCA")]
        symbol: String,

        /// Number of bars after the first.
        #[arg(long, default_value_t = 200)]
        bars: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,chartscript=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            symbol,
            timeframe,
            data,
            scripts,
            script_files,
            templates,
            seed,
            output_dir,
            json,
        } => {
            let mut chart = match config {
                Some(path) => ChartConfig::from_file(&path)?,
                None => ChartConfig::default(),
            };
            if let Some(symbol) = symbol {
                chart.chart.symbol = symbol;
            }
            if let Some(timeframe) = timeframe {
                chart.chart.timeframe = timeframe;
            }
            if seed.is_some() {
                chart.synthetic.seed = seed;
            }
            chart.templates.extend(templates);
            for path in script_files {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read script {}", path.display()))?;
                chart.scripts.push(text);
            }
            chart.scripts.extend(scripts);
            run_chart(&chart, data, output_dir, json)
        }
        Commands::Classify { file, script } => run_classify(file, script),
        Commands::Templates { verbose } => {
            for t in all_templates() {
                if verbose {
                    println!("== {} ==\n{}\n", t.name, t.script);
                } else {
                    println!("{}", t.name);
                }
            }
            Ok(())
        }
        Commands::Synthetic { symbol, bars, seed } => {
            let mut chart = ChartConfig::default();
            chart.synthetic.bar_count = bars;
            chart.synthetic.seed = seed;
            let loaded = load_candles(None, &FetchRequest::new(symbol), &chart.synthetic);
            let payload = serde_json::json!({ "data": loaded.candles });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
    }
}

fn run_chart(
    chart: &ChartConfig,
    data: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let scripts = chart.resolved_scripts()?;
    if scripts.is_empty() {
        bail!("no scripts: pass --script, --script-file, --template or a config with scripts");
    }

    let source = data.map(JsonFileSource::new);
    let source_ref = source.as_ref().map(|s| s as &dyn CandleSource);
    let loaded = load_candles(source_ref, &chart.fetch_request(), &chart.synthetic);

    let overlays = compute_overlays(&loaded.candles, &scripts);
    let doc = ExportDocument::new(&loaded, &scripts, overlays);
    info!(
        symbol = %doc.symbol,
        fingerprint = doc.fingerprint.short(),
        results = doc.overlays.results.len(),
        markers = doc.overlays.markers.len(),
        "overlays computed"
    );

    if json {
        println!("{}", export_json(&doc)?);
    } else {
        print_summary(&doc, loaded.candles.len());
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&doc, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_classify(file: Option<PathBuf>, script: Option<String>) -> Result<()> {
    let text = match (file, script) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        (None, Some(s)) => match find_template(&s) {
            Some(t) => t.script.to_string(),
            None => s,
        },
        (None, None) => bail!("pass a script or --file"),
    };
    let kind = classify(&text);
    println!("{}", serde_json::to_string_pretty(&kind)?);
    Ok(())
}

fn print_summary(doc: &ExportDocument, bars: usize) {
    println!("=== {} ({} bars) ===", doc.symbol, bars);
    if doc.placeholder {
        println!("!! placeholder data: synthetic candles, not market history");
    }
    println!("Fingerprint: {}", doc.fingerprint.short());
    for result in &doc.overlays.results {
        let lines: Vec<String> = result
            .lines
            .iter()
            .map(|l| format!("{} ({} pts)", l.label, l.points.len()))
            .collect();
        println!("  {:<28} {}", result.name, lines.join(", "));
    }
    if !doc.overlays.markers.is_empty() {
        println!("Markers: {}", doc.overlays.markers.len());
        for m in doc.overlays.markers.iter().rev().take(5).rev() {
            println!("  {:>12}  {:<8} {:.4}", m.time, m.kind.as_str(), m.price);
        }
    }
}
