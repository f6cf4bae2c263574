use criterion::{Criterion, criterion_group, criterion_main};

fn round_trip(c: &mut Criterion) {
    let mut rng = rand::rng();

    for scheme in pq_schemes::all() {
        let (pk, sk) = scheme.generate_key(&mut rng).unwrap();
        let (ct, _) = scheme.encapsulate(pk.as_ref(), &mut rng).unwrap();

        c.bench_function(&format!("{}/keygen", scheme.name()), |b| {
            b.iter(|| scheme.generate_key(&mut rng).unwrap());
        });
        c.bench_function(&format!("{}/encapsulate", scheme.name()), |b| {
            b.iter(|| scheme.encapsulate(pk.as_ref(), &mut rng).unwrap());
        });
        c.bench_function(&format!("{}/decapsulate", scheme.name()), |b| {
            b.iter(|| scheme.decapsulate(sk.as_ref(), &ct).unwrap());
        });
    }
}

criterion_group!(benches, round_trip);
criterion_main!(benches);
