use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use rolodex::{
    contact::Contact,
    store::{sqlite::SqliteContactTable, ContactTable},
    types::UNASSIGNED_CONTACT_ID,
};

fn contact(i: u64) -> Contact {
    Contact {
        id: UNASSIGNED_CONTACT_ID,
        name: format!("Contact {i}"),
        email: format!("c{i}@x.com"),
        phone_number: format!("555-{i:04}"),
        profile_image: None,
        last_edited: i as i64,
    }
}

fn bench_inserts(c: &mut Criterion) {
    c.bench_function("table_insert_1k", |b| {
        b.iter(|| {
            let mut table = SqliteContactTable::open_in_memory().expect("open");
            for i in 0..1_000u64 {
                let _ = table.upsert(&contact(i)).expect("upsert");
            }
        });
    });
}

fn bench_updates(c: &mut Criterion) {
    c.bench_function("table_update_1k", |b| {
        b.iter(|| {
            let mut table = SqliteContactTable::open_in_memory().expect("open");
            let mut ids = Vec::new();
            for i in 0..1_000u64 {
                ids.push(table.upsert(&contact(i)).expect("upsert"));
            }
            for (i, id) in ids.iter().enumerate() {
                let mut c = contact(i as u64);
                c.id = *id;
                c.phone_number = "555-9999".to_string();
                let _ = table.upsert(&c).expect("update");
            }
        });
    });
}

fn bench_full_list_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_list_read");

    for n in [10u64, 100, 1000] {
        let mut table = SqliteContactTable::open_in_memory().expect("open");
        for i in 0..n {
            let _ = table.upsert(&contact(i)).expect("upsert");
        }

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let _ = table.all().expect("all");
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inserts, bench_updates, bench_full_list_read);
criterion_main!(benches);
