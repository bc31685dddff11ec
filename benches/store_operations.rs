use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

use todo_service::storage::{IdAllocation, MemoryStore, TodoCollection};
use todo_service::types::{Namespace, NewTodo, TodoPatch, TodoQuery};

fn collection(allocation: IdAllocation) -> TodoCollection<MemoryStore> {
    TodoCollection::new(
        Arc::new(MemoryStore::new()),
        Namespace::new("todo_list_db", "todo_list_collection"),
        allocation,
    )
}

fn seeded(rt: &Runtime, count: usize) -> TodoCollection<MemoryStore> {
    let todos = collection(IdAllocation::Atomic);
    rt.block_on(async {
        for n in 0..count {
            let new = NewTodo::new(format!("todo {}", n), "bench", n % 2 == 0);
            todos.create(&new).await.ok();
        }
    });
    todos
}

fn criterion_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");

    for allocation in [IdAllocation::Atomic, IdAllocation::Scan] {
        c.bench_function(&format!("create_{}", allocation), |b| {
            b.to_async(&rt).iter_batched(
                || collection(allocation),
                |todos| async move {
                    for _ in 0..100 {
                        black_box(todos.create(&NewTodo::new("A", "d", false)).await.ok());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    let todos = seeded(&rt, 1_000);
    c.bench_function("read_by_id_1000", |b| {
        b.to_async(&rt).iter(|| async { black_box(todos.read_by_id(500).await.ok()) })
    });
    c.bench_function("read_by_query_1000", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(todos.read_by_query(&TodoQuery::completed(true)).await.ok()) })
    });
    c.bench_function("update_by_id_1000", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(todos.update_by_id(250, &TodoPatch::completed(true)).await.ok()) })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
