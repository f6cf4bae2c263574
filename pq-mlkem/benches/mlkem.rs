use criterion::{Criterion, criterion_group, criterion_main};
use pq_kem::Scheme;
use pq_mlkem::{ML_KEM_512, ML_KEM_768, ML_KEM_1024, ml_kem_768};

fn typed(c: &mut Criterion) {
    let mut rng = rand::rng();

    c.bench_function("ml-kem-768/keygen", |b| {
        b.iter(|| ml_kem_768::DecapsulationKey::generate(&mut rng).unwrap());
    });

    let dk = ml_kem_768::DecapsulationKey::generate(&mut rng).unwrap();
    let ek = dk.encapsulation_key();
    c.bench_function("ml-kem-768/encapsulate", |b| {
        b.iter(|| ek.encapsulate(&mut rng).unwrap());
    });

    let (ct, _) = ek.encapsulate(&mut rng).unwrap();
    c.bench_function("ml-kem-768/decapsulate", |b| {
        b.iter(|| dk.decapsulate(&ct).unwrap());
    });

    let dk_bytes = dk.to_bytes();
    c.bench_function("ml-kem-768/parse_private_key", |b| {
        b.iter(|| ml_kem_768::DecapsulationKey::from_bytes(&dk_bytes).unwrap());
    });
}

fn round_trip(c: &mut Criterion) {
    let mut rng = rand::rng();
    let schemes: [&dyn Scheme; 3] = [&ML_KEM_512, &ML_KEM_768, &ML_KEM_1024];

    for scheme in schemes {
        c.bench_function(&format!("{}/round_trip", scheme.name()), |b| {
            b.iter(|| {
                let (pk, sk) = scheme.generate_key(&mut rng).unwrap();
                let (ct, _) = scheme.encapsulate(pk.as_ref(), &mut rng).unwrap();
                scheme.decapsulate(sk.as_ref(), &ct).unwrap()
            });
        });
    }
}

criterion_group!(benches, typed, round_trip);
criterion_main!(benches);
