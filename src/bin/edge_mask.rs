use ortho_vectorizer::config::load_edge_mask_config;
use ortho_vectorizer::diagnostics::{SegmentReport, TimingBreakdown};
use ortho_vectorizer::edges::EdgeExtractor;
use ortho_vectorizer::image::io::{load_raster, save_mask_png, write_json_file};
use ortho_vectorizer::segments::SegmentDetector;
use ortho_vectorizer::snapping::AngleSnapper;
use ortho_vectorizer::Stage;
use std::env;
use std::error::Error;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_edge_mask_config(Path::new(&config_path))?;
    config.pipeline.validate()?;

    let total_start = Instant::now();
    let raster = load_raster(&config.input)?;
    let mut timings = TimingBreakdown::default();

    let edges = EdgeExtractor::new(config.pipeline.to_edge_options()).extract(&raster)?;
    timings.record(Stage::Edges, edges.gradient_ms + edges.linking_ms);

    let detected = SegmentDetector::new(config.pipeline.to_hough_options()).detect(
        &edges.mask,
        raster.width(),
        raster.height(),
    )?;
    timings.record(Stage::Segments, detected.elapsed_ms);

    let snap_start = Instant::now();
    let snapped = AngleSnapper::new(config.pipeline.to_snap_options())?.snap_all(&detected.segments);
    timings.record(Stage::Snapping, snap_start.elapsed().as_secs_f64() * 1000.0);
    timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

    let report = SegmentReport {
        input: config.input.clone(),
        width: raster.width(),
        height: raster.height(),
        edge_pixels: edges.mask.count(),
        strong_edge_pixels: edges.counts.strong,
        hough_runs: detected.hough_runs,
        raw_segments: detected.segments,
        snapped_segments: snapped.segments,
        buckets: snapped.buckets,
        discarded: snapped.discarded,
        timings,
    };

    save_mask_png(&edges.mask, &config.output.mask_png)?;
    write_json_file(&config.output.report_json, &report)?;

    println!(
        "Saved edge mask ({} edge px) to {}",
        report.edge_pixels,
        config.output.mask_png.display()
    );
    println!(
        "Saved {} raw / {} snapped segments to {}",
        report.raw_segments.len(),
        report.snapped_segments.len(),
        config.output.report_json.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: edge_mask <config.json>".to_string()
}
