use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use serde_json::json;

use bundleview::atlas::{Atlas, GridPos};
use bundleview::bundle::{BundleRenderer, DescriptorSource, RenderOptions, TileDescriptor};
use bundleview::config::ViewerConfig;
use bundleview::export;
use bundleview::render::TileCompositor;

fn atlas() -> Atlas {
    Atlas::from_rgba(RgbaImage::from_fn(256, 256, |x, y| {
        if (x + y) % 3 == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([200, 200, 200, 255])
        }
    }))
}

fn bundle(enemies: usize) -> serde_json::Value {
    let tile = |name: String, x: u32| {
        json!({ "tile_with_texture": {
            "name": name,
            "color": "#44aa88",
            "texture": { "tileset_position": { "x": x, "y": 3 } }
        }, "rarity": 2, "thread": 5 })
    };
    json!({
        "name": "Bench",
        "player": tile("hero".into(), 0),
        "final_objective": tile("amulet".into(), 1),
        "dungeon_levels": { "items": (0..5).map(|i| json!({
            "name": format!("level_{}", i),
            "depth": i,
            "wall_tile_with_texture": { "texture": { "tileset_position": { "x": 2, "y": i } } },
            "floor_tile_with_texture": { "texture": { "tileset_position": { "x": 3, "y": i } } }
        })).collect::<Vec<_>>() },
        "enemies": { "items": (0..enemies).map(|i| tile(format!("enemy_{}", i), i as u32 % 16)).collect::<Vec<_>>() },
        "weapons": { "items": (0..enemies).map(|i| tile(format!("weapon_{}", i), i as u32 % 16)).collect::<Vec<_>>() }
    })
}

fn bench_render_tile(c: &mut Criterion) {
    let atlas = atlas();
    let config = ViewerConfig::default();
    let compositor = TileCompositor::new(&atlas, &config.atlas);
    let descriptor = TileDescriptor {
        name: Some("cave_rat".to_string()),
        position: Some(GridPos { x: 4, y: 7 }),
        color: Some("#c0392b".to_string()),
        source: DescriptorSource::Nested,
    };

    c.bench_function("render_tile_48px", |b| {
        b.iter(|| compositor.render_tile(black_box(&descriptor)))
    });
}

fn bench_bundle(c: &mut Criterion) {
    let atlas = atlas();
    let config = ViewerConfig::default();
    let doc = bundle(24);
    let renderer = BundleRenderer::new(
        TileCompositor::new(&atlas, &config.atlas),
        RenderOptions::from(&config.layout),
    );

    c.bench_function("render_bundle_24", |b| b.iter(|| renderer.render(black_box(&doc))));

    let view = renderer.render(&doc);
    c.bench_function("capture_bundle_24", |b| {
        b.iter(|| export::capture(black_box(&view), &config))
    });
}

criterion_group!(benches, bench_render_tile, bench_bundle);
criterion_main!(benches);
