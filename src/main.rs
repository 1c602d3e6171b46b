//! LED cube CLI - inspect, generate and play `.lca` animation files.

use std::fs;
use std::path::PathBuf;

use lumicube::generate::Pattern;
use lumicube::model::{CUBE_SIZE, Frame};
use lumicube::playback::{Player, TimerScheduler};
use lumicube::raster;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "info" => info(&args[2..]),
        "gen" => generate(&args[2..]),
        "play" => play(&args[2..]),
        _ => {
            usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Work with LED cube animation (.lca) files.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info <file.lca> [--json]       Show a stored animation's metadata");
    eprintln!("  gen <pattern.json> <out.lca>   Generate an animation from a pattern");
    eprintln!("  gen --example                  Print an example pattern file");
    eprintln!("  play <file.lca> [cycles]       Play an animation (default: 1 cycle)");
}

fn info(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: lumicube info <file.lca> [--json]");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[0]);
    let entry = raster::read_metadata(&path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        std::process::exit(1);
    });

    if args.iter().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&entry).unwrap());
        return;
    }

    println!("Animation: {}", entry.name);
    println!("  Frames: {}", entry.frame_count);
    println!("  Size: {} bytes", entry.size);
    println!("  Kind: {:?}", entry.kind);
}

fn generate(args: &[String]) {
    if args.first().map(String::as_str) == Some("--example") {
        print_example_pattern();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: lumicube gen <pattern.json> <out.lca>");
        eprintln!("       lumicube gen --example");
        std::process::exit(1);
    }

    let pattern_path = PathBuf::from(&args[0]);
    let out_path = PathBuf::from(&args[1]);

    let pattern_str = fs::read_to_string(&pattern_path).unwrap_or_else(|e| {
        eprintln!("Error reading pattern file: {}", e);
        std::process::exit(1);
    });

    let pattern: Pattern = serde_json::from_str(&pattern_str).unwrap_or_else(|e| {
        eprintln!("Error parsing pattern: {}", e);
        std::process::exit(1);
    });

    let mut animation = pattern.generate();
    animation.name = out_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(String::from);

    let size = raster::encode_to_file(&animation, &out_path).unwrap_or_else(|e| {
        eprintln!("Error writing animation: {}", e);
        std::process::exit(1);
    });

    println!(
        "Generated {} frames to {} ({} bytes)",
        animation.frame_count(),
        out_path.display(),
        size
    );
}

fn print_example_pattern() {
    println!("Example pattern (pattern.json):");
    println!(
        "{}",
        serde_json::to_string_pretty(&Pattern::default()).unwrap()
    );
}

fn play(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: lumicube play <file.lca> [cycles]");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[0]);
    let cycles: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);

    let animation = raster::read_animation(&path).unwrap_or_else(|e| {
        eprintln!("Error reading animation: {}", e);
        std::process::exit(1);
    });

    let frame_count = animation.frame_count();
    println!(
        "Playing {} ({} frames, {} cycle{})",
        animation.display_name(),
        frame_count,
        cycles,
        if cycles == 1 { "" } else { "s" }
    );
    println!("  lit voxels per layer, top to bottom:");

    let summaries: Vec<String> = animation.frames().iter().map(layer_counts).collect();

    let (scheduler, fired) = TimerScheduler::new();
    let mut player = Player::new(animation, scheduler);
    player.subscribe(move |change| {
        println!("  frame {:>3}/{}  [{}]", change.frame + 1, frame_count, summaries[change.frame]);
    });

    player.toggle_play();
    let total_advances = frame_count * cycles;
    let mut advances = 0;
    while advances < total_advances {
        match fired.recv() {
            Ok(token) => {
                player.advance(token);
                advances += 1;
            }
            Err(_) => break,
        }
    }
    player.toggle_play();

    println!("Done.");
}

/// Lit-voxel count for each horizontal layer, top (y = 7) to bottom.
fn layer_counts(frame: &Frame) -> String {
    (0..CUBE_SIZE)
        .rev()
        .map(|y| {
            let lit = (0..CUBE_SIZE)
                .flat_map(|x| (0..CUBE_SIZE).map(move |z| (x, z)))
                .filter(|&(x, z)| frame.voxel(x, y, z).is_some())
                .count();
            lit.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumicube::model::Rgb;

    #[test]
    fn test_generate_writes_container_from_pattern_file() {
        let dir = tempfile::tempdir().unwrap();
        let pattern_path = dir.path().join("rain.json");
        fs::write(
            &pattern_path,
            r#"{"type":"Rain","frames":6,"drops":2,"color":{"r":0,"g":80,"b":255},"seed":5}"#,
        )
        .unwrap();
        let out_path = dir.path().join("downpour.lca");

        generate(&[
            pattern_path.to_string_lossy().into_owned(),
            out_path.to_string_lossy().into_owned(),
        ]);

        let written = raster::read_animation(&out_path).unwrap();
        assert_eq!(written.frame_count(), 6);
        assert_eq!(written.name.as_deref(), Some("downpour"));
    }

    #[test]
    fn test_layer_counts_reads_top_down() {
        let mut frame = Frame::new();
        frame.set_voxel(0, CUBE_SIZE - 1, 0, Some(Rgb::new(255, 255, 255)));
        frame.set_voxel(3, 0, 3, Some(Rgb::new(200, 200, 200)));
        frame.set_voxel(4, 0, 5, Some(Rgb::new(150, 150, 150)));

        assert_eq!(layer_counts(&frame), "1 0 0 0 0 0 0 2");
    }
}
