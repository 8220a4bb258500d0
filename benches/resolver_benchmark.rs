use chord::{
    event::KeyEvent,
    keymap::{KeyId, Keymap},
    resolver::Resolver,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::convert::TryFrom;

/// The home row of the keymap, with mod-tap keys on both hands
const HOME_ROW: &[(KeyId, &str)] = &[
    (0, "MT(MOD_LCTL, KC_A)"),
    (1, "MT(MOD_LALT, KC_S)"),
    (2, "MT(MOD_LGUI, KC_D)"),
    (3, "MT(MOD_LSFT, KC_F)"),
    (4, "KC_G"),
    (5, "KC_H"),
    (6, "MT(MOD_RSFT, KC_J)"),
    (7, "MT(MOD_RGUI, KC_K)"),
    (8, "MT(MOD_RALT, KC_L)"),
    (9, "MT(MOD_RCTL, KC_SCLN)"),
    (10, "LT(2, KC_SPACE)"),
];

static KEYMAP: once_cell::sync::Lazy<Keymap> = once_cell::sync::Lazy::new(|| {
    Keymap::try_from(HOME_ROW).expect("A panic happend while building the home row keymap.")
});

/// Will generate overlapping presses, every key is released after the
/// next one was pressed.
fn rolling_events(count: usize) -> Vec<KeyEvent> {
    let mut events = Vec::with_capacity(count * 2);
    let mut time = 0;
    for i in 0..count {
        let key = (i % HOME_ROW.len()) as KeyId;
        events.push(KeyEvent::press(key, time));
        if i > 0 {
            let last = ((i - 1) % HOME_ROW.len()) as KeyId;
            events.push(KeyEvent::release(last, time + 10));
        }
        time += 45;
    }
    events
}

pub fn rolling_bench(c: &mut Criterion) {
    let events = rolling_events(500);
    c.bench_function("rolling_bench", |b| {
        b.iter(|| {
            let mut resolver = Resolver::new(KEYMAP.clone());
            for event in events.iter() {
                black_box(resolver.on_key_event(*event));
            }
        });
    });
}

pub fn tick_bench(c: &mut Criterion) {
    let mut resolver = Resolver::new(KEYMAP.clone());
    resolver.on_key_event(KeyEvent::press(0, 0));
    c.bench_function("tick_bench", |b| {
        b.iter(|| black_box(resolver.on_tick(black_box(100))));
    });
}

criterion_group!(benches, rolling_bench, tick_bench);
criterion_main!(benches);
