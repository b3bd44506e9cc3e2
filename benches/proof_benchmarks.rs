#![allow(non_snake_case)]
use one_out_of_many::proofs::*;

extern crate rand;
use rand::rngs::OsRng;

extern crate curve25519_dalek;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// (n, m) configurations, from 16 to 4096 members
const DIMENSIONS: [(usize, usize); 4] = [(2, 4), (4, 2), (4, 4), (4, 6)];

fn full_set(gens: &ProofGens, l: usize, r: &Scalar) -> Vec<RistrettoPoint> {
    let C_l = gens.commit(&Scalar::zero(), r); // Prover's commitment

    // Build a random set containing the prover's commitment at index `l`
    let mut set = (1..gens.max_set_size())
        .map(|_| RistrettoPoint::random(&mut OsRng))
        .collect::<Vec<RistrettoPoint>>();
    set.insert(l, C_l);
    set
}

pub fn prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("Prove");
    for &(n, m) in DIMENSIONS.iter() {
        let l: usize = 1; // Index within the set, of the prover's commitment
        let r = Scalar::random(&mut OsRng); // Blinding factor for prover's commitment
        let gens = ProofGens::new(n, m).unwrap();
        let set = full_set(&gens, l, &r);

        let prover_transcript = Transcript::new(b"OneOfMany-Benchmark");
        group.bench_with_input(
            BenchmarkId::new(format!("n={}, m={}", n, m), set.len()),
            &set,
            |b, set| {
                b.iter(|| {
                    let mut t = prover_transcript.clone();
                    set.iter()
                        .prove(black_box(&gens), black_box(&mut t), black_box(l), black_box(&r))
                        .unwrap();
                })
            },
        );
    }
    group.finish();
}

pub fn verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Verify");
    for &(n, m) in DIMENSIONS.iter() {
        let l: usize = 1;
        let r = Scalar::random(&mut OsRng);
        let gens = ProofGens::new(n, m).unwrap();
        let set = full_set(&gens, l, &r);

        let mut prover_transcript = Transcript::new(b"OneOfMany-Benchmark");
        let proof = set.iter().prove(&gens, &mut prover_transcript, l, &r).unwrap();

        let verifier_transcript = Transcript::new(b"OneOfMany-Benchmark");
        group.bench_with_input(
            BenchmarkId::new(format!("n={}, m={}", n, m), set.len()),
            &set,
            |b, set| {
                b.iter(|| {
                    let mut t = verifier_transcript.clone();
                    assert!(set
                        .iter()
                        .verify(black_box(&gens), black_box(&mut t), black_box(&proof))
                        .is_ok());
                })
            },
        );
    }
    group.finish();
}

pub fn serialize(c: &mut Criterion) {
    let l: usize = 1;
    let r = Scalar::random(&mut OsRng);
    let gens = ProofGens::new(4, 4).unwrap();
    let set = full_set(&gens, l, &r);
    let mut t = Transcript::new(b"OneOfMany-Benchmark");
    let bytes = set.iter().prove(&gens, &mut t, l, &r).unwrap().to_bytes().unwrap();

    c.bench_function("Decode proof: n=4, m=4", |b| {
        b.iter(|| SigmaProof::from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = prove, verify, serialize
}
criterion_main!(benches);
