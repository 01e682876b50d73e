//! Split analyzer tool - runs the detection pipeline on a recording and
//! reports what each stage saw, without writing any track files.
//!
//! Useful for tuning thresholds on a recording that splits badly:
//! - computed energy/bandwidth thresholds and the levels behind them
//! - every quiet region that qualified as a split candidate
//! - the resulting segment list
//! - optionally the raw smoothed feature curves (tab-separated, for plotting)

use songsplit::{analysis, decibel, features, load_audio, regions, Defaults};
use std::env;
use std::path::Path;
use std::process;

fn print_usage() {
    println!("Split Analyzer - inspect song boundary detection on a recording");
    println!();
    println!("Usage: split_analyzer <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --verbose, -v                  Show per-region detail");
    println!("  --dump                         Dump smoothed feature curves (tab-separated)");
    println!("  --min-silence-duration <SEC>   Minimum quiet stretch to split at (default: 5.0)");
    println!("  --min-song-duration <SEC>      Shorter segments merge into the previous song (default: 30.0)");
    println!("  --frame-length <SAMPLES>       Analysis window size (default: 4096)");
    println!("  --hop-length <SAMPLES>         Step between analysis windows (default: 2048)");
    println!("  --help                         Show this help message");
    println!();
    println!("Tuning tips:");
    println!("  - Missed boundaries: lower --min-silence-duration, or check the");
    println!("    dump for gaps where talk keeps the bandwidth up");
    println!("  - Too many boundaries: raise --min-silence-duration or --min-song-duration");
}

fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = seconds % 60.0;
    format!("{:02}:{:05.2}", mins, secs)
}

fn option_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let dump = args.iter().any(|a| a == "--dump");

    let option_flags = [
        "--min-silence-duration",
        "--min-song-duration",
        "--frame-length",
        "--hop-length",
    ];
    let input = match args.iter().enumerate().skip(1).find(|(i, a)| {
        !a.starts_with('-') && !option_flags.contains(&args[i - 1].as_str())
    }) {
        Some((_, input)) => input.clone(),
        None => {
            print_usage();
            process::exit(1);
        }
    };

    let overrides = Defaults {
        min_silence_duration: option_value(&args, "--min-silence-duration")
            .and_then(|v| v.parse().ok()),
        min_song_duration: option_value(&args, "--min-song-duration")
            .and_then(|v| v.parse().ok()),
        frame_length: option_value(&args, "--frame-length").and_then(|v| v.parse().ok()),
        hop_length: option_value(&args, "--hop-length").and_then(|v| v.parse().ok()),
        output_dir: None,
    };
    let config = overrides.to_split_config();
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    println!("Split Analyzer");
    println!("==============");
    println!("File: {}", input);
    println!();

    let decoded = match load_audio(Path::new(&input)) {
        Ok(decoded) => decoded,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    println!(
        "Audio: {} Hz, duration {} ({:.1}s)",
        decoded.sample_rate,
        format_timestamp(decoded.duration_sec()),
        decoded.duration_sec()
    );
    println!();

    // Run the pipeline stage by stage so the intermediate curves are
    // available for the dump.
    let frame_to_sec = config.hop_length as f64 / decoded.sample_rate as f64;
    let smooth_frames = ((1.0 / frame_to_sec) as usize).max(1);

    let feats = match features::extract(
        &decoded.samples,
        decoded.sample_rate,
        config.frame_length,
        config.hop_length,
    ) {
        Ok(feats) => feats,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let energy_db = analysis::smooth(&decibel::amplitude_to_db(&feats.rms), smooth_frames);
    let bandwidth_hz = analysis::smooth(&feats.bandwidth_hz, smooth_frames);
    let thresholds = analysis::estimate_thresholds(&energy_db, &bandwidth_hz);

    println!("Levels:");
    println!(
        "  Energy threshold:    {:.1} dB (performing mean: {:.1} dB)",
        thresholds.energy_db, thresholds.energy_loud_mean_db
    );
    println!(
        "  Bandwidth threshold: {:.0} Hz (performing mean: {:.0} Hz)",
        thresholds.bandwidth_hz, thresholds.bandwidth_loud_mean_hz
    );
    println!(
        "  Frames: {} ({:.0} ms each, smoothing window {} frames)",
        feats.rms.len(),
        frame_to_sec * 1000.0,
        smooth_frames
    );
    println!();

    let quiet = regions::detect_quiet_regions(
        &energy_db,
        &bandwidth_hz,
        &thresholds,
        frame_to_sec,
        config.min_silence_duration,
    );

    println!("Split candidates: {}", quiet.len());
    if verbose {
        for (i, region) in quiet.iter().enumerate() {
            println!(
                "  Gap {:2}: {} - {} ({:.1}s)",
                i + 1,
                format_timestamp(region.start_sec(frame_to_sec)),
                format_timestamp(region.end_sec(frame_to_sec)),
                region.duration_sec(frame_to_sec)
            );
        }
    }
    println!();

    if dump {
        println!("# time_s\tenergy_db\tbandwidth_hz\tnot_playing");
        for i in 0..energy_db.len() {
            let not_playing = energy_db[i] < thresholds.energy_db
                || bandwidth_hz[i] < thresholds.bandwidth_hz;
            println!(
                "{:.2}\t{:.2}\t{:.0}\t{}",
                i as f64 * frame_to_sec,
                energy_db[i],
                bandwidth_hz[i],
                if not_playing { 1 } else { 0 }
            );
        }
        println!();
    }

    let result = match songsplit::detect_splits(&decoded.samples, decoded.sample_rate, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("Segments: {}", result.segments.len());
    for segment in &result.segments {
        println!(
            "  Track {:2}: {} ({:.1}s - {:.1}s)",
            segment.index + 1,
            format_timestamp(segment.duration_sec),
            segment.start_sec,
            segment.end_sec
        );
    }

    if result.segments.len() == 1 && quiet.is_empty() {
        println!();
        println!("No usable quiet region found. Try lowering --min-silence-duration");
        println!("or inspect the curves with --dump.");
    }
}
