//! Calibrate command - check label templates against a screenshot.
//!
//! Diagnostic for the template images used to pinpoint the HUD labels:
//! reports, per template, whether the file is present, fits inside the
//! screenshot, and where its normalized cross-correlation peaks. Low peak
//! scores usually mean background interference or a resolution-scaled
//! screenshot (Retina captures), not a broken screenshot.

use std::path::PathBuf;

use clap::Args;
use console::style;
use image::GenericImageView;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};
use tracing::debug;

/// Peak score above which a template counts as matched.
const MATCH_THRESHOLD: f32 = 0.8;

/// Label templates checked, in HUD order.
const TEMPLATES: [(&str, &str); 3] = [
    ("现金", "template_cash.png"),
    ("获得经验", "template_exp.png"),
    ("储备金", "template_reserve.png"),
];

/// Arguments for the calibrate command.
#[derive(Args)]
pub struct CalibrateArgs {
    /// Screenshot to match templates against (default: testimage.png)
    input: Option<PathBuf>,

    /// Directory containing the template images
    #[arg(short, long, default_value = ".")]
    template_dir: PathBuf,
}

pub async fn run(args: CalibrateArgs) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| PathBuf::from("testimage.png"));
    if !input.exists() {
        anyhow::bail!("Image not found: {}", input.display());
    }

    let screenshot = image::open(&input)?;
    let (width, height) = screenshot.dimensions();
    println!(
        "Screenshot: {} ({} x {})",
        input.display(),
        width,
        height
    );
    let gray = screenshot.to_luma8();

    for (label, filename) in TEMPLATES {
        let template_path = args.template_dir.join(filename);

        if !template_path.exists() {
            println!(
                "{:<10} {:<22} {} missing",
                label,
                filename,
                style("✗").red()
            );
            continue;
        }

        let template = match image::open(&template_path) {
            Ok(t) => t,
            Err(e) => {
                println!(
                    "{:<10} {:<22} {} unreadable: {}",
                    label,
                    filename,
                    style("✗").red(),
                    e
                );
                continue;
            }
        };

        let (tw, th) = template.dimensions();
        if tw > width || th > height {
            println!(
                "{:<10} {:<22} {} template ({} x {}) larger than screenshot",
                label,
                filename,
                style("!").yellow(),
                tw,
                th
            );
            continue;
        }

        debug!("Matching {} ({} x {})", filename, tw, th);

        let scores = match_template(
            &gray,
            &template.to_luma8(),
            MatchTemplateMethod::CrossCorrelationNormalized,
        );
        let extremes = find_extremes(&scores);
        let peak = extremes.max_value;
        let (px, py) = extremes.max_value_location;

        if peak > MATCH_THRESHOLD {
            println!(
                "{:<10} {:<22} {} score {:.4} at ({}, {})",
                label,
                filename,
                style("✓").green(),
                peak,
                px,
                py
            );
        } else {
            println!(
                "{:<10} {:<22} {} score {:.4}",
                label,
                filename,
                style("!").yellow(),
                peak
            );
            if peak > 0.4 {
                println!("           hint: score near 0.5 suggests background interference; crop the template to the text only, without borders");
            } else {
                println!("           hint: very low score usually means resolution scaling (Retina capture); re-crop the template from this screenshot");
            }
        }
    }

    Ok(())
}
