use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shop_content_mcp::catalog::MockCatalog;
use shop_content_mcp::config::AppConfig;
use shop_content_mcp::types::Product;
use shop_content_mcp::ContentCoordinator;

fn catalog_of(size: usize) -> Vec<Product> {
    let base = MockCatalog::products();
    (0..size)
        .map(|i| {
            let mut product = base[i % base.len()].clone();
            product.id = format!("bench_{:05}", i);
            product
        })
        .collect()
}

fn benchmark_audit(c: &mut Criterion) {
    let coordinator = ContentCoordinator::new(&AppConfig::default()).unwrap();
    let products = MockCatalog::products();

    c.bench_function("audit_single_product", |b| {
        b.iter(|| coordinator.checker().audit(black_box(&products[1])))
    });
}

fn benchmark_process(c: &mut Criterion) {
    let coordinator = ContentCoordinator::new(&AppConfig::default()).unwrap();
    let products = MockCatalog::products();

    c.bench_function("process_flawed_product", |b| {
        b.iter(|| coordinator.process(black_box(&products[0])).unwrap())
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let coordinator = ContentCoordinator::new(&AppConfig::default()).unwrap();
    let products = catalog_of(300);

    c.bench_function("process_batch_300", |b| {
        b.iter(|| {
            let results = coordinator.process_batch(black_box(&products));
            coordinator.statistics(&results)
        })
    });
}

criterion_group!(benches, benchmark_audit, benchmark_process, benchmark_batch);
criterion_main!(benches);
