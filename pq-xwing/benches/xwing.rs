use criterion::{Criterion, criterion_group, criterion_main};
use pq_xwing::DecapsulationKey;

fn xwing(c: &mut Criterion) {
    let mut rng = rand::rng();

    c.bench_function("x-wing/keygen", |b| {
        b.iter(|| DecapsulationKey::generate(&mut rng).unwrap());
    });

    let sk = DecapsulationKey::generate(&mut rng).unwrap();
    let pk = sk.encapsulation_key();
    c.bench_function("x-wing/encapsulate", |b| {
        b.iter(|| pk.encapsulate(&mut rng).unwrap());
    });

    let (ct, _) = pk.encapsulate(&mut rng).unwrap();
    c.bench_function("x-wing/decapsulate", |b| {
        b.iter(|| sk.decapsulate(&ct).unwrap());
    });
}

criterion_group!(benches, xwing);
criterion_main!(benches);
