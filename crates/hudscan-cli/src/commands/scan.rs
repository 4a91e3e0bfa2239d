//! Scan command - extract HUD values from a single screenshot.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use hudscan_core::models::config::HudscanConfig;
use hudscan_core::ocr::{OnnxOcrEngine, RecognitionEngine};
use hudscan_core::values::{build_fragments, ValueExtractor};

/// Placeholder printed for a keyword that resolved no value.
const NOT_RECOGNIZED: &str = "未识别";

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input screenshot (default: testimage.png)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One "keyword: value" line per keyword
    Text,
    /// JSON object with null for unresolved keywords
    Json,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        HudscanConfig::from_file(std::path::Path::new(path))?
    } else {
        HudscanConfig::default()
    };
    if let Some(model_dir) = args.model_dir {
        config.models.model_dir = model_dir;
    }

    // Check input file exists
    let input = args.input.unwrap_or_else(|| PathBuf::from("testimage.png"));
    if !input.exists() {
        anyhow::bail!("Image not found: {}", input.display());
    }

    check_models(&config)?;

    info!("Processing screenshot: {}", input.display());

    let engine = OnnxOcrEngine::from_config(&config.models, config.ocr.clone())?;
    let image = image::open(&input)?;

    let ocr = engine.recognize(&image)?;
    debug!("{} detections in {}ms", ocr.detections.len(), ocr.processing_time_ms);

    let fragments = build_fragments(&ocr.detections);
    let extractor = ValueExtractor::from_config(&config.extraction);
    let values = extractor.extract(&fragments);

    // Format output
    let output = match args.format {
        OutputFormat::Text => values
            .iter()
            .map(|(keyword, value)| {
                format!("{}: {}", keyword, value.unwrap_or(NOT_RECOGNIZED))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&values)?,
    };

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Fail early with guidance when the model files are not in place.
fn check_models(config: &HudscanConfig) -> anyhow::Result<()> {
    let missing: Vec<String> = [
        &config.models.detection_model,
        &config.models.recognition_model,
        &config.models.dictionary,
    ]
    .into_iter()
    .filter(|name| !config.model_path(name.as_str()).exists())
    .cloned()
    .collect();

    if missing.is_empty() {
        return Ok(());
    }

    anyhow::bail!(
        "Models not found in {}: missing {}.\n\
         Place the detection model, recognition model and character dictionary \
         there, or point --model-dir at the directory that contains them.",
        config.models.model_dir.display(),
        missing.join(", ")
    );
}
