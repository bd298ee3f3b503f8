use ortho_vectorizer::config::{load_convert_config, ConvertToolConfig};
use ortho_vectorizer::image::io::load_raster;
use ortho_vectorizer::learning::{parameters_of, FeedbackHistory};
use ortho_vectorizer::{ExportTargets, Pipeline, PipelineConfig, PixelToWorld};
use std::env;
use std::error::Error;
use std::path::Path;

/// Only entries rated at least this well feed the learned parameters.
const LEARNING_MIN_RATING: u8 = 4;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("convert") => {
            let config = args.get(1).ok_or_else(usage)?;
            convert(Path::new(config))
        }
        Some("feedback") => {
            let config = args.get(1).ok_or_else(usage)?;
            let rating = args
                .get(2)
                .ok_or_else(usage)?
                .parse::<u8>()
                .map_err(|e| format!("rating must be an integer 1-5: {e}"))?;
            let notes = (args.len() > 3).then(|| args[3..].join(" "));
            feedback(Path::new(config), rating, notes)
        }
        Some("stats") => {
            let history = args.get(1).ok_or_else(usage)?;
            stats(Path::new(history))
        }
        _ => Err(usage().into()),
    }
}

fn usage() -> String {
    [
        "Usage:",
        "  ortho2dxf convert  <config.json>",
        "  ortho2dxf feedback <config.json> <rating 1-5> [notes]",
        "  ortho2dxf stats    <feedback_history.json>",
    ]
    .join("\n")
}

/// Pipeline settings of `config`, with learned values filled in when asked.
fn effective_pipeline(config: &ConvertToolConfig) -> PipelineConfig {
    let mut pipeline = config.pipeline.clone();
    if config.use_learned {
        let history = FeedbackHistory::open(&config.feedback_file);
        let learned = history.suggested_parameters(Some(config.input.as_path()), LEARNING_MIN_RATING);
        let applied = learned.apply_to(&mut pipeline, &config.explicit_pipeline_keys);
        let stats = history.statistics();
        println!(
            "Using learned parameters ({}) from {} previous conversions, average rating {:.1}/5.0",
            applied.join(", "),
            stats.total_feedback,
            stats.average_rating
        );
    }
    pipeline
}

fn convert(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = load_convert_config(config_path)?;
    let pipeline = Pipeline::new(effective_pipeline(&config))?;

    let mut raster = load_raster(&config.input)?;
    if let Some(gt) = config.geotransform {
        raster = raster.with_transform(PixelToWorld::from_geotransform(gt)?);
    }
    let mut targets = ExportTargets::to_files(&config.output.dxf, config.output.geojson.as_ref());
    let summary = pipeline.run(&raster, &mut targets)?;

    println!("Conversion complete");
    println!(
        "  Image {}x{}, {} edge pixels",
        summary.image_width, summary.image_height, summary.edge_pixels
    );
    println!("  Detected {} segments", summary.segments_detected);
    println!(
        "  Snapped and merged to {} segments",
        summary.segments_after_snap_and_merge
    );
    for bucket in summary.dominant_angles.iter().take(4) {
        println!("    {:>6.1}°: {}", bucket.angle_deg, bucket.count);
    }
    println!("  DXF saved to {}", config.output.dxf.display());
    if let Some(geojson) = &config.output.geojson {
        println!("  GeoJSON saved to {}", geojson.display());
    }
    println!();
    println!("To rate this conversion, run:");
    println!("  ortho2dxf feedback {} <rating 1-5> [notes]", config_path.display());
    Ok(())
}

fn feedback(config_path: &Path, rating: u8, notes: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = load_convert_config(config_path)?;
    let pipeline = effective_pipeline(&config);
    let mut history = FeedbackHistory::open(&config.feedback_file);
    history.add(
        config.input.display().to_string(),
        parameters_of(&pipeline),
        rating,
        notes,
    )?;
    println!(
        "Feedback recorded ({}/5) in {}; {} entries total",
        rating,
        history.path().display(),
        history.len()
    );
    Ok(())
}

fn stats(history_path: &Path) -> Result<(), Box<dyn Error>> {
    let history = FeedbackHistory::open(history_path);
    let stats = history.statistics();
    if stats.total_feedback == 0 {
        println!("No feedback recorded in {}", history_path.display());
        return Ok(());
    }
    println!("Feedback statistics for {}", history_path.display());
    println!("  Total conversions rated: {}", stats.total_feedback);
    println!("  Average rating: {:.2}/5.0", stats.average_rating);
    for (rating, count) in &stats.rating_distribution {
        println!("    {rating} star: {count}");
    }
    if let Some(latest) = &stats.most_recent {
        println!("  Most recent: {latest}");
    }

    let learned = history.suggested_parameters(None, LEARNING_MIN_RATING);
    println!("  Suggested parameters:");
    for (key, value) in learned.iter() {
        println!("    {key}: {value}");
    }
    Ok(())
}
