use catalog_core::{Identity, ImageStore, InMemoryProductRepository, ListQuery, ProductForm, ProductService, Role};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tokio::runtime::Runtime;

const CATEGORIES: &[&str] = &["Tools", "Toys", "Home", "Garden", "Office"];

fn seeded_service(rt: &Runtime, products: usize) -> ProductService {
  let repository = Arc::new(InMemoryProductRepository::new());
  // No images are written; the directory is never touched.
  let images = Arc::new(ImageStore::new(std::env::temp_dir().join("catalog-bench"), 1024));
  let service = ProductService::new(repository, images).unwrap();
  let admin = Identity::new("bench", Role::Admin);

  rt.block_on(async {
    for i in 0..products {
      let form = ProductForm {
        name: Some(format!("Product {i}")),
        price: Some(format!("{}.99", i % 100)),
        category: Some(CATEGORIES[i % CATEGORIES.len()].to_string()),
        description: (i % 3 == 0).then(|| format!("Limited edition batch {}", i % 17)),
        stock: Some((i % 50).to_string()),
      };
      service.create(&admin, form, None).await.unwrap();
    }
  });
  service
}

fn bench_list_pages(c: &mut Criterion) {
  let mut group = c.benchmark_group("ListFirstPage");
  let rt = Runtime::new().unwrap();

  for size in [100usize, 1_000, 10_000] {
    let service = seeded_service(&rt, size);
    group.throughput(Throughput::Elements(size as u64));
    group.bench_with_input(BenchmarkId::new("no_search", size), &size, |b, _| {
      b.to_async(&rt)
        .iter(|| async { service.list(ListQuery::new(1, 10, "")).await.unwrap() });
    });
    group.bench_with_input(BenchmarkId::new("search", size), &size, |b, _| {
      b.to_async(&rt)
        .iter(|| async { service.list(ListQuery::new(2, 10, "edition")).await.unwrap() });
    });
  }
  group.finish();
}

fn bench_create(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let service = seeded_service(&rt, 0);
  let admin = Identity::new("bench", Role::Admin);

  c.bench_function("CreateProductWorkflow", |b| {
    b.to_async(&rt).iter(|| async {
      let form = ProductForm {
        name: Some("Widget".to_string()),
        price: Some("9.99".to_string()),
        category: Some("Tools".to_string()),
        ..Default::default()
      };
      service.create(&admin, form, None).await.unwrap()
    });
  });
}

criterion_group!(benches, bench_list_pages, bench_create);
criterion_main!(benches);
