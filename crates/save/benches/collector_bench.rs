//! Gather / restore / encode benchmarks for a populated context.
//!
//! Run with: `cargo bench -p save --bench collector_bench`

use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use save::collector::{gather_level, restore_level, RestoreOptions};
use save::record_io::{decode_record, encode_record};
use save::snapshot_types::LevelRecord;
use save::{ItemRegistry, ITEM_RESOURCE_TABLE};
use scene::{
    Activatable, AttachedNote, AudioDiary, ContextScoped, Door, Drawer, GenericState, Inventory,
    ItemKind, Journal, PrefabLibrary, TriggerZone, WorldInventoryItem,
};

// ---------------------------------------------------------------------------
// Helpers: build a synthetic context of a given size
// ---------------------------------------------------------------------------

const SCALES: [usize; 3] = [50, 200, 1000];

fn prefab_library() -> PrefabLibrary {
    let mut library = PrefabLibrary::default();
    for (_, path) in ITEM_RESOURCE_TABLE {
        let path: &'static str = *path;
        library.register(path, |world: &mut World, t: Transform| world.spawn(t).id());
    }
    library
}

/// `count` entities spread across every match-in-place category, plus one
/// world item per eight entities.
fn build_world(count: usize) -> World {
    let mut world = World::new();
    world.init_resource::<Inventory>();
    world.init_resource::<ItemRegistry>();
    world.insert_resource(prefab_library());

    for i in 0..count {
        let name = Name::new(format!("entity_{i}"));
        let mut entity = world.spawn((name, ContextScoped));
        match i % 8 {
            0 => entity.insert(TriggerZone { armed: true, tripped: i % 3 == 0 }),
            1 => entity.insert(Activatable::default()),
            2 => entity.insert(Door::default()),
            3 => entity.insert(Drawer::default()),
            4 => entity.insert(GenericState { int_slot: i as i32, ..Default::default() }),
            5 => entity.insert(AttachedNote { collected: i % 2 == 0 }),
            6 => entity.insert(AudioDiary::passive()),
            _ => entity.insert(Journal::default()),
        };
    }
    for i in 0..count / 8 {
        world.spawn((
            WorldInventoryItem { kind: ItemKind::Battery },
            Transform::from_xyz(i as f32, 0.0, 0.0),
            ContextScoped,
        ));
    }
    world
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_gather(c: &mut Criterion) {
    let mut group = c.benchmark_group("gather_level");
    for &count in &SCALES {
        let mut world = build_world(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(gather_level(&mut world)));
        });
    }
    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore_level");
    for &count in &SCALES {
        let mut world = build_world(count);
        let record = gather_level(&mut world);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(restore_level(&mut world, &record, RestoreOptions::default())));
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_codec");
    for &count in &SCALES {
        let record = gather_level(&mut build_world(count));
        let bytes = encode_record(&record, true);
        group.bench_with_input(BenchmarkId::new("encode", count), &record, |b, record| {
            b.iter(|| black_box(encode_record(record, true)));
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &bytes, |b, bytes| {
            b.iter(|| black_box(decode_record::<LevelRecord>(bytes)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gather, bench_restore, bench_codec);
criterion_main!(benches);
