use criterion::{criterion_group, criterion_main, Criterion, black_box};

use overland::core::IVec2;
use overland::pathfinding::Pathfinder;
use overland::placement::{PlacementDefTable, PlacementDirector};
use overland::world::{BiomeTable, GenerationConfig, TileGenerator, WorldCache};

fn generator(seed: u64) -> TileGenerator {
    TileGenerator::new(seed, GenerationConfig::default(), BiomeTable::default())
}

fn bench_generate_tile(c: &mut Criterion) {
    let generator = generator(12345);
    let mut x = 0;

    c.bench_function("generate_tile", |b| {
        b.iter(|| {
            x += 1;
            generator.generate(black_box(IVec2::new(x, -x / 3)))
        });
    });
}

fn bench_classify(c: &mut Criterion) {
    let generator = generator(12345);

    c.bench_function("classify_64x64", |b| {
        b.iter(|| {
            let mut count = 0;
            for y in 0..64 {
                for x in 0..64 {
                    if generator.classify(black_box(IVec2::new(x, y))).as_str() == "plains" {
                        count += 1;
                    }
                }
            }
            count
        });
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut cache = WorldCache::new(generator(7));
    cache.prefetch_region(IVec2::splat(-16), IVec2::splat(15));

    c.bench_function("cache_hit", |b| {
        b.iter(|| cache.move_cost(black_box(IVec2::new(3, -5))));
    });
}

fn bench_prefetch_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefetch_region");
    group.sample_size(10);

    for side in [32, 128] {
        group.bench_function(format!("{}x{}", side, side), |b| {
            b.iter(|| {
                let mut cache = WorldCache::new(generator(7));
                cache.prefetch_region(IVec2::ZERO, IVec2::splat(side - 1))
            });
        });
    }
    group.finish();
}

fn bench_find_path(c: &mut Criterion) {
    let biomes = BiomeTable::default();
    let config = GenerationConfig::default();
    let finder = Pathfinder::for_table(&biomes, &config);
    let mut cache = WorldCache::new(TileGenerator::new(99, config, biomes));
    cache.prefetch_region(IVec2::splat(-80), IVec2::splat(80));

    c.bench_function("find_path_60", |b| {
        b.iter(|| finder.find_path(&mut cache, black_box(IVec2::new(-30, -30)), black_box(IVec2::new(30, 30))));
    });
}

fn bench_placement(c: &mut Criterion) {
    let director = PlacementDirector::with_defaults(&PlacementDefTable::default());
    let mut group = c.benchmark_group("placement");
    group.sample_size(10);

    group.bench_function("default_table", |b| {
        b.iter(|| {
            let mut cache = WorldCache::new(generator(2024));
            director.run(black_box(2024), &mut cache)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_generate_tile,
    bench_classify,
    bench_cache_hit,
    bench_prefetch_region,
    bench_find_path,
    bench_placement,
);
criterion_main!(benches);
