//! Benchmarks for table parsing and cascade resolution
//!
//! Run with: cargo bench -p chanplan-core --bench plan_bench

use std::collections::HashMap;
use std::sync::Arc;

use chanplan_core::capability::{DeviceClass, RadioCapabilities};
use chanplan_core::cascade::{CascadeResolver, FieldChange};
use chanplan_core::channel_map::{ChannelMap, DRIVER_COUNTRIES};
use chanplan_core::config_binding::PersistedFields;
use chanplan_core::freq_classifier::{BandChannels, RawFrequencyEntry};
use chanplan_core::types::Mode;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Fixture Synthesis
// ============================================================================

fn synth_table(regions: usize, channels_per_region: usize) -> String {
    let mut text = String::from("country_code,s1g_chan,bw,centre_freq_mhz,usable\n");
    for region in 0..regions {
        // Cycle the driver allow-list so every row survives the parse filter;
        // globally unique channel numbers keep repeated regions distinct
        let code = DRIVER_COUNTRIES[region % DRIVER_COUNTRIES.len()];
        for chan in 0..channels_per_region {
            let idx = region * channels_per_region + chan;
            let bw = [1u8, 2, 4, 8][chan % 4];
            let freq = 902.0 + idx as f64 * 0.5;
            text.push_str(&format!("{},{},{},{},1\n", code, idx * 2 + 1, bw, freq));
        }
    }
    text
}

fn synth_freqs(count: usize) -> Vec<RawFrequencyEntry> {
    (0..count)
        .map(|i| {
            let step = i / 2;
            if i % 2 == 0 {
                RawFrequencyEntry {
                    channel: (1 + step % 13) as u16,
                    mhz: 2412.0 + (step % 13) as f64 * 5.0,
                    restricted: false,
                }
            } else {
                RawFrequencyEntry {
                    channel: (36 + 4 * (step % 35)) as u16,
                    mhz: 5180.0 + (step % 35) as f64 * 20.0,
                    restricted: false,
                }
            }
        })
        .collect()
}

fn synth_caps(freq_count: usize) -> RadioCapabilities {
    let mut hw_modes = HashMap::new();
    for mode in ["n", "ac", "ax"] {
        hw_modes.insert(mode.to_string(), true);
    }
    let mut ht_modes = HashMap::new();
    for token in [
        "HT20", "HT40", "VHT20", "VHT40", "VHT80", "VHT160", "HE20", "HE40", "HE80", "HE160",
    ] {
        ht_modes.insert(token.to_string(), true);
    }
    RadioCapabilities {
        frequencies: synth_freqs(freq_count),
        hw_modes,
        ht_modes,
    }
}

// ============================================================================
// Channel Map Parsing
// ============================================================================

fn bench_map_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_map_parse");

    for rows in [64usize, 256, 1024].iter() {
        let text = synth_table(rows / 16, 16);

        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("parse", rows), &text, |b, text| {
            b.iter(|| ChannelMap::parse(black_box(text)))
        });
    }

    group.finish();
}

fn bench_map_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_map_queries");

    let map = ChannelMap::parse(&synth_table(8, 32));

    group.bench_function("widths", |b| b.iter(|| map.widths(black_box("US"))));

    group.bench_function("channels_for_width", |b| {
        b.iter(|| map.channels_for_width(black_box("US"), black_box(4)))
    });

    group.finish();
}

// ============================================================================
// Frequency Classification
// ============================================================================

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for count in [32usize, 128, 512].iter() {
        let entries = synth_freqs(*count);

        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("classify", count), &entries, |b, entries| {
            b.iter(|| BandChannels::classify(black_box(entries), true))
        });
    }

    group.finish();
}

// ============================================================================
// Cascade Resolution
// ============================================================================

fn bench_cascade_seed(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_seed");

    let caps = synth_caps(64);
    let map = Arc::new(ChannelMap::parse(&synth_table(8, 32)));
    let fields = PersistedFields {
        htmode: Some("VHT80".to_string()),
        band: Some("5g".to_string()),
        channel: Some("36".to_string()),
        ..PersistedFields::default()
    };

    group.bench_function("standard", |b| {
        b.iter(|| {
            CascadeResolver::seed(
                black_box(&fields),
                DeviceClass::Standard,
                &caps,
                Arc::clone(&map),
                true,
            )
        })
    });

    let subghz_fields = PersistedFields {
        country: Some("US".to_string()),
        channel: Some("9".to_string()),
        ..PersistedFields::default()
    };

    group.bench_function("subghz", |b| {
        b.iter(|| {
            CascadeResolver::seed(
                black_box(&subghz_fields),
                DeviceClass::SubGhz,
                &RadioCapabilities::default(),
                Arc::clone(&map),
                false,
            )
        })
    });

    group.finish();
}

fn bench_cascade_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_apply");

    let caps = synth_caps(64);
    let map = Arc::new(ChannelMap::parse(&synth_table(8, 32)));

    group.bench_function("mode_flip", |b| {
        let mut resolver = CascadeResolver::seed(
            &PersistedFields::default(),
            DeviceClass::Standard,
            &caps,
            Arc::clone(&map),
            true,
        );
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let mode = if flip { Mode::Ac } else { Mode::N };
            resolver.apply(black_box(FieldChange::Mode(mode)))
        })
    });

    group.bench_function("country_change", |b| {
        let mut resolver = CascadeResolver::seed(
            &PersistedFields::default(),
            DeviceClass::SubGhz,
            &RadioCapabilities::default(),
            Arc::clone(&map),
            false,
        );
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let code = if flip { "AU" } else { "NZ" };
            resolver.apply(black_box(FieldChange::Country(code.to_string())))
        })
    });

    group.finish();
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = map_benches;
    config = Criterion::default();
    targets = bench_map_parse, bench_map_queries
);

criterion_group!(
    name = cascade_benches;
    config = Criterion::default();
    targets = bench_classification, bench_cascade_seed, bench_cascade_apply
);

criterion_main!(map_benches, cascade_benches);
