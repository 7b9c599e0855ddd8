//! Benchmarks for machine configuration and conversion.
//!
//! Measures settings-line application, single-symbol conversion, and
//! message throughput across rotor stack depths.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enigma::config::{MachineConfig, Settings};
use enigma::{Alphabet, Machine, Permutation, RotorDef};

/// Enigma I catalog used across benchmarks.
const ENIGMA_I: &str = include_str!("../tests/data/enigma_i.conf");

/// Settings line applied before each conversion benchmark.
const SETTINGS: &str = "* B IV II I QEV KTL (AQ) (BZ) (MP) (HX)";

fn configured() -> Machine {
    let mut machine = MachineConfig::parse(ENIGMA_I).unwrap().build().unwrap();
    Settings::parse(SETTINGS, machine.num_rotors())
        .unwrap()
        .apply(&mut machine)
        .unwrap();
    machine
}

/// Builds a machine with `moving` rotors behind a reflector, all wired as
/// shifted copies of one cycle.
fn deep_machine(moving: usize) -> Machine {
    let alpha = Arc::new(Alphabet::uppercase());
    let mut rotors = vec![RotorDef::reflector(
        "B",
        Permutation::new("(AY)(BR)(CU)(DH)(EQ)(FS)(GL)(IP)(JX)(KN)(MO)(TZ)(VW)", &alpha).unwrap(),
    )];
    let mut names = vec!["B".to_string()];
    for k in 0..moving {
        let name = format!("R{}", k);
        let cycle: String = (0..26).map(|i| alpha.to_symbol((i * 7 + k) % 26)).collect();
        let perm = Permutation::new(&format!("({})", cycle), &alpha).unwrap();
        rotors.push(RotorDef::moving(name.clone(), perm, "Z").unwrap());
        names.push(name);
    }
    let mut machine = Machine::new(alpha, moving + 1, moving, rotors).unwrap();
    machine.insert_rotors(&names).unwrap();
    machine
}

/// Benchmarks parsing and applying a full settings line.
fn bench_apply_settings(c: &mut Criterion) {
    let config = MachineConfig::parse(ENIGMA_I).unwrap();
    let mut machine = config.build().unwrap();
    c.bench_function("apply_settings", |b| {
        b.iter(|| {
            Settings::parse(black_box(SETTINGS), 4)
                .unwrap()
                .apply(&mut machine)
                .unwrap();
        });
    });
}

/// Benchmarks one `convert` call; the machine keeps stepping across iterations.
fn bench_convert_symbol(c: &mut Criterion) {
    let mut machine = configured();
    c.bench_function("convert_symbol", |b| {
        b.iter(|| machine.convert(black_box(7)).unwrap());
    });
}

/// Benchmarks message throughput for different rotor stack depths.
fn bench_message_throughput(c: &mut Criterion) {
    let message = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG".repeat(30);
    let mut group = c.benchmark_group("convert_message");
    group.throughput(Throughput::Elements(message.len() as u64));

    for moving in [3usize, 8, 16] {
        let mut machine = deep_machine(moving);
        group.bench_with_input(BenchmarkId::from_parameter(moving), &message, |b, msg| {
            b.iter(|| machine.convert_str(black_box(msg)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_settings,
    bench_convert_symbol,
    bench_message_throughput
);
criterion_main!(benches);
