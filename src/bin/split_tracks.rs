//! Command-line track splitter: decodes a session recording, detects song
//! boundaries, and writes one WAV per song.

use songsplit::{split_and_save, Defaults};
use std::env;
use std::path::Path;
use std::process;

fn print_usage() {
    println!("Split Tracks - cut a session recording into one file per song");
    println!();
    println!("Usage: split_tracks <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --output-dir <DIR>, -o <DIR>   Output directory (default: ./output)");
    println!("  --min-silence-duration <SEC>   Minimum quiet stretch to split at (default: 5.0)");
    println!("  --min-song-duration <SEC>      Shorter segments merge into the previous song (default: 30.0)");
    println!("  --frame-length <SAMPLES>       Analysis window size (default: 4096)");
    println!("  --hop-length <SAMPLES>         Step between analysis windows (default: 2048)");
    println!("  --save-defaults                Save the given options to the defaults file");
    println!("  --help                         Show this help message");
    println!();
    println!("Reads WAV, FLAC and MP3. Tracks are written to the output");
    println!("directory as <name>_trackNN.wav.");
}

fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = seconds % 60.0;
    format!("{:02}:{:05.2}", mins, secs)
}

const OPTION_FLAGS: &[&str] = &[
    "--output-dir",
    "-o",
    "--min-silence-duration",
    "--min-song-duration",
    "--frame-length",
    "--hop-length",
];

fn option_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
}

/// First positional argument: not a flag, and not the value of one.
fn input_file(args: &[String]) -> Option<&String> {
    args.iter().enumerate().skip(1).find_map(|(i, a)| {
        if a.starts_with('-') {
            return None;
        }
        if i > 0 && OPTION_FLAGS.contains(&args[i - 1].as_str()) {
            return None;
        }
        Some(a)
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let input = match input_file(&args) {
        Some(input) => input.clone(),
        None => {
            print_usage();
            process::exit(1);
        }
    };

    if !Path::new(&input).is_file() {
        eprintln!("Error: file not found: {}", input);
        process::exit(1);
    }

    // File defaults first, command-line overrides on top
    let mut defaults = Defaults::load().unwrap_or_else(|e| {
        eprintln!("Warning: could not read defaults file: {}", e);
        Defaults::default()
    });

    let overrides = Defaults {
        min_silence_duration: option_value(&args, "--min-silence-duration")
            .and_then(|v| v.parse().ok()),
        min_song_duration: option_value(&args, "--min-song-duration")
            .and_then(|v| v.parse().ok()),
        frame_length: option_value(&args, "--frame-length").and_then(|v| v.parse().ok()),
        hop_length: option_value(&args, "--hop-length").and_then(|v| v.parse().ok()),
        output_dir: option_value(&args, "--output-dir")
            .or_else(|| option_value(&args, "-o"))
            .cloned(),
    };
    defaults.merge(&overrides);

    if args.iter().any(|a| a == "--save-defaults") {
        match defaults.save() {
            Ok(()) => println!("Defaults saved."),
            Err(e) => eprintln!("Warning: could not save defaults: {}", e),
        }
    }

    let config = defaults.to_split_config();
    let output_dir = defaults
        .output_dir
        .clone()
        .unwrap_or_else(|| "./output".to_string());

    println!("Splitting: {}", input);

    let result = match split_and_save(Path::new(&input), Path::new(&output_dir), &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let t = &result.analysis.thresholds;
    println!(
        "  Energy threshold:    {:.1} dB (performing mean: {:.1} dB)",
        t.energy_db, t.energy_loud_mean_db
    );
    println!(
        "  Bandwidth threshold: {:.0} Hz (performing mean: {:.0} Hz)",
        t.bandwidth_hz, t.bandwidth_loud_mean_hz
    );
    println!("  Quiet regions used:  {}", result.analysis.quiet_spans.len());
    println!();
    println!("Result: {} track(s)", result.segments.len());

    let stem = Path::new(&input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("session");

    for segment in &result.segments {
        println!(
            "  Track {:2}: {} ({:.1}s - {:.1}s) -> {}_track{:02}.wav",
            segment.index + 1,
            format_timestamp(segment.duration_sec),
            segment.start_sec,
            segment.end_sec,
            stem,
            segment.index + 1
        );
    }

    println!();
    println!("Output directory: {}", output_dir);
}
