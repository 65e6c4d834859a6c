//! Criterion benchmarks for settings reads.
//!
//! Getters run on the UI thread for every balance redraw, so the read path
//! (one store lookup plus validation or migration) should stay well under a
//! microsecond on the in-memory store.
//!
//! Run with:
//! ```bash
//! cargo bench --package piwallet-settings --bench settings_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use piwallet_settings::{
    BoolSetting, FixedLocale, MemoryStore, Rate, SettingKey, SettingsStore, StoredValue,
};

fn populated_settings() -> SettingsStore<MemoryStore, FixedLocale> {
    let store = MemoryStore::with_entries([
        (SettingKey::MaxDisplayDigits.storage_key(), StoredValue::Int(5)),
        (
            SettingKey::DefaultCurrencyCode.storage_key(),
            StoredValue::Str("ZAR".to_string()),
        ),
        (SettingKey::BiometricsEnabled.storage_key(), StoredValue::Bool(true)),
    ]);
    let settings = SettingsStore::new(store, FixedLocale::new("USD"));
    settings.set_current_rate(&Rate {
        code: "USD".to_string(),
        name: "US Dollar".to_string(),
        rate: 0.02,
        reciprocal_code: None,
    });
    settings
}

fn bench_reads(c: &mut Criterion) {
    let settings = populated_settings();
    let mut group = c.benchmark_group("settings_read");

    group.bench_function("max_digits_legacy_remap", |b| {
        b.iter(|| black_box(settings.max_digits()))
    });
    group.bench_function("currency_code_last_in_allow_list", |b| {
        b.iter(|| black_box(settings.currency_code()))
    });
    group.bench_function("get_bool", |b| {
        b.iter(|| black_box(settings.get_bool(black_box(BoolSetting::BiometricsEnabled))))
    });
    group.bench_function("current_rate_decode", |b| {
        b.iter(|| black_box(settings.current_rate()))
    });
    group.bench_function("wallet_requires_backup", |b| {
        b.iter(|| black_box(settings.wallet_requires_backup()))
    });

    group.finish();
}

fn bench_unset_reads(c: &mut Criterion) {
    let settings = SettingsStore::new(MemoryStore::new(), FixedLocale::new("JPY"));

    c.bench_function("currency_code_from_locale", |b| {
        b.iter(|| black_box(settings.currency_code()))
    });
}

criterion_group!(benches, bench_reads, bench_unset_reads);
criterion_main!(benches);
