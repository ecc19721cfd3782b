//! World generator binary: builds a world, renders a minimap and writes a
//! placement manifest.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --seed <SEED>     World seed (default: 12345)
//!   --size <TILES>    Minimap side length in tiles, centered on 0,0 (default: 256)
//!   --out <DIR>       Output directory (default: "out/world_<seed>")
//!   --config <FILE>   WorldConfig JSON; --seed overrides its seed
//!
//! Output structure:
//!   <out>/
//!     minimap.png       # One pixel per tile, settlements white, landmarks red
//!     manifest.json     # Seed, placements and the demo route

use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use serde_json::json;

use overland::core::IVec2;
use overland::placement::PlacementKind;
use overland::world::{World, WorldConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_arg::<PathBuf>(&args, "--config") {
        Some(path) => WorldConfig::load_sync(&path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        config.seed = seed;
    } else if parse_arg::<PathBuf>(&args, "--config").is_none() {
        config.seed = 12345;
    }
    let size = parse_arg::<u32>(&args, "--size").unwrap_or(256).max(1);
    let output_dir = parse_arg::<PathBuf>(&args, "--out")
        .unwrap_or_else(|| PathBuf::from(format!("out/world_{}", config.seed)));

    println!("=== Overland World Generator ===");
    println!("Seed:   {}", config.seed);
    println!("Map:    {} x {} tiles", size, size);
    println!("Output: {}", output_dir.display());
    println!();

    let start = Instant::now();
    let mut world = World::create(config)?;
    println!(
        "Placed {} settlements, {} landmarks in {:.2}s",
        world.placements().of_kind(PlacementKind::Settlement).count(),
        world.placements().of_kind(PlacementKind::Landmark).count(),
        start.elapsed().as_secs_f32()
    );

    // Route between the first two settlements.
    let towns: Vec<(String, IVec2)> = world
        .placements()
        .of_kind(PlacementKind::Settlement)
        .take(2)
        .map(|r| (r.id.clone(), r.position))
        .collect();
    let route = match towns.as_slice() {
        [(from_id, from), (to_id, to), ..] => {
            let started = Instant::now();
            let path = world.find_path(*from, *to);
            match &path {
                Some(p) => println!(
                    "Route {} -> {}: {} steps, cost {:.1} ({:.2}s)",
                    from_id, to_id, p.len(), p.cost, started.elapsed().as_secs_f32()
                ),
                None => println!("Route {} -> {}: unreachable", from_id, to_id),
            }
            path
        }
        _ => {
            log::warn!("Fewer than two settlements; skipping route");
            None
        }
    };

    let min = IVec2::splat(-(size as i32) / 2);
    let max = min + IVec2::splat(size as i32 - 1);
    let started = Instant::now();
    let generated = world.cache_mut().prefetch_region(min, max);
    println!(
        "Generated {} tiles in {:.2}s",
        generated,
        started.elapsed().as_secs_f32()
    );

    let mut minimap = image::RgbImage::from_fn(size, size, |x, y| {
        let color = world.tile(min + IVec2::new(x as i32, y as i32)).color;
        image::Rgb([color.0, color.1, color.2])
    });

    let mut plot = |at: IVec2, pixel: [u8; 3]| {
        let local = at - min;
        if local.cmpge(IVec2::ZERO).all() && local.cmple(max - min).all() {
            minimap.put_pixel(local.x as u32, local.y as u32, image::Rgb(pixel));
        }
    };
    if let Some(path) = &route {
        for &step in &path.steps {
            plot(step, [20, 20, 20]);
        }
    }
    for record in world.placements().records() {
        let pixel = match record.kind {
            PlacementKind::Settlement => [255, 255, 255],
            PlacementKind::Landmark => [220, 40, 40],
        };
        plot(record.position, pixel);
    }

    std::fs::create_dir_all(&output_dir)?;
    let minimap_path = output_dir.join("minimap.png");
    minimap.save(&minimap_path)?;

    let manifest = json!({
        "seed": world.seed(),
        "minimap": { "min": min, "max": max, "file": "minimap.png" },
        "placements": world.placements(),
        "route": route,
    });
    let manifest_path = output_dir.join("manifest.json");
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    println!();
    println!("Wrote {}", minimap_path.display());
    println!("Wrote {}", manifest_path.display());
    Ok(())
}

fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
