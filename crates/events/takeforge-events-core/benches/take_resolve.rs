use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use takeforge_events::{
    resolve_take, AnimKey, ChildEvent, ChildEventGroup, EventTemplate, TemplateLibrary,
};

fn key(name: &str) -> AnimKey {
    AnimKey::new("_HeadGestureLib", name)
}

/// Three-level gesture tree: root -> picks -> leaf gestures.
fn library(picks: usize) -> (TemplateLibrary, EventTemplate) {
    let leaves = ["_Blink", "_Nod", "_Squint", "_Eyebrow Raise", "_Head Tilt"];
    let mut lib = TemplateLibrary::new();
    for leaf in leaves {
        lib.insert_leaf(key(leaf), 1.0);
    }
    let mut root = EventTemplate::new();
    for p in 0..picks {
        let group: ChildEventGroup = leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| {
                ChildEvent::builder(key(leaf))
                    .start((0.0, 0.4))
                    .magnitude((0.5, 1.0))
                    .probability(0.8)
                    .weight(1.0 + i as f64)
                    .build()
            })
            .collect();
        let pick = EventTemplate::new()
            .with_group(group)
            .with_event(ChildEvent::builder(key("_Blink")).start((0.0, 1.0)).build());
        let pick_key = key(&format!("Pick{p}"));
        lib.insert_template(pick_key.clone(), 2.0, pick);
        root = root.with_event(
            ChildEvent::builder(pick_key)
                .start((p as f64, p as f64 + 0.5))
                .duration((0.9, 1.1))
                .build(),
        );
    }
    (lib, root)
}

fn bench_resolve(c: &mut Criterion) {
    let (lib, root) = library(16);
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("resolve_take/16_picks", |b| {
        b.iter(|| resolve_take(black_box(&root), &lib, &mut rng).map(|t| t.len()))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
