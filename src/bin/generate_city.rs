//! City generator binary — builds one city layout and writes it as JSON.
//!
//! Usage: cargo run --release --bin generate_city -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   JSON config file (default: built-in defaults)
//!   --seed <SEED>     Random seed (overrides config)
//!   --grid <N>        Blocks per side (overrides config)
//!   --out <PATH>      Write the layout as JSON to PATH
//!   --jobs <N>        Max parallel cell workers (default: all cores)

use std::fs::File;
use std::io::BufWriter;

use citygen::core::Result;
use citygen::generation::{CityConfig, CityGenerator};

fn main() -> Result<()> {
    citygen::core::logging::init_timestamped();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => CityConfig::load(&path)?,
        None => CityConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(grid) = parse_u32_arg(&args, "--grid") {
        config.grid_size = grid;
    }

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .expect("Failed to configure thread pool");
    }

    println!("=== City Generator ===");
    println!("Seed:  {}", config.seed);
    println!("Grid:  {} x {} blocks ({}m)", config.grid_size, config.grid_size, config.city_width());
    println!("Subdivisions: {}, tree density: {}", config.block_subdivisions, config.maximum_tree_density);
    println!();

    let generator = CityGenerator::new(config)?;
    let layout = generator.generate();

    for (kind, count) in layout.kind_counts() {
        println!("{:>9}: {}", format!("{:?}", kind), count);
    }
    println!("Buildings: {} volumes in {} blocks", layout.building_count(), layout.blocks.len());
    println!("Trees:     {}", layout.trees.len());

    if let Some(out) = parse_str_arg(&args, "--out") {
        let writer = BufWriter::new(File::create(&out)?);
        serde_json::to_writer_pretty(writer, &layout)?;
        println!("Layout written to {}", out);
    }

    Ok(())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
