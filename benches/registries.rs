use bioledger_core::{ConstructRegistry, ExperimentRegistry, ProjectRegistry};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_registries(c: &mut Criterion) {
    c.bench_function("create_project", |b| {
        let mut registry = ProjectRegistry::new();
        b.iter(|| registry.create_project("alice", "screen", "genome-wide knockout screen"))
    });

    c.bench_function("mint_and_transfer_construct", |b| {
        let mut registry = ConstructRegistry::new();
        b.iter(|| {
            let id = registry.create_construct("alice", "prom", "", "TTGACA");
            registry.transfer("alice", id, "alice", "bob").unwrap();
        })
    });

    c.bench_function("experiment_lifecycle", |b| {
        let mut registry = ExperimentRegistry::new();
        b.iter(|| {
            let id = registry.create_experiment("bob", 1, "PCR amplification");
            registry.submit_results("bob", id, "42 colonies").unwrap();
        })
    });

    let mut journaled = ConstructRegistry::new();
    for i in 0..1000 {
        let id = journaled.create_construct("alice", &format!("c{}", i), "", "ATCG");
        journaled.transfer("alice", id, "alice", "bob").unwrap();
    }
    c.bench_function("verify_journal_2000_entries", |b| {
        b.iter(|| journaled.journal().verify_chain())
    });
}

criterion_group!(benches, bench_registries);
criterion_main!(benches);
