//! Validator compilation benchmarks.
//!
//! Run with: cargo bench --bench compile_bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use tsguard::compiler::{CallKind, CallSite, ValidatorOptions, compile_module};
use tsguard::types::{TypeId, TypeTable};

/// `width` interfaces `Node{i}<T>`, each with a scalar field, a generic
/// field, an optional link to the next node and a recursive child list.
/// Returns the table and one `Node{i}<string>` instantiation per node.
fn wide_graph(width: usize) -> (TypeTable, Vec<TypeId>) {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();

    let mut nodes = Vec::with_capacity(width);
    let mut params = Vec::with_capacity(width);
    for i in 0..width {
        let t = table.type_parameter("T", None);
        let node = table.interface(&format!("Node{i}"), vec![t]);
        table.property(node, "id", number, false);
        table.property(node, "value", t, false);
        let this = table.reference(node, vec![t]);
        let children = table.array(this);
        table.property(node, "children", children, true);
        nodes.push(node);
        params.push(t);
    }
    for i in 0..width {
        let next = nodes[(i + 1) % width];
        let link = table.reference(next, vec![params[i]]);
        table.property(nodes[i], "next", link, true);
    }

    let roots = nodes
        .iter()
        .map(|&node| table.reference(node, vec![string]))
        .collect();
    (table, roots)
}

fn bench_compile_wide_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_wide_graph");

    for width in [8usize, 64, 256] {
        let (table, roots) = wide_graph(width);
        let sites: Vec<CallSite> = roots
            .iter()
            .map(|&ty| CallSite::new(CallKind::Is, ty))
            .collect();

        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &sites, |b, sites| {
            b.iter(|| {
                let module =
                    compile_module(&table, ValidatorOptions::default(), black_box(sites));
                black_box(module.map(|m| m.functions.len()))
            });
        });
    }

    group.finish();
}

fn bench_print_module(c: &mut Criterion) {
    let (table, roots) = wide_graph(64);
    let sites: Vec<CallSite> = roots
        .iter()
        .map(|&ty| CallSite::new(CallKind::AssertType, ty))
        .collect();
    let Ok(module) = compile_module(&table, ValidatorOptions::default(), &sites) else {
        return;
    };

    c.bench_function("print_module_64", |b| {
        b.iter(|| black_box(module.print().len()));
    });
}

criterion_group!(benches, bench_compile_wide_graph, bench_print_module);
criterion_main!(benches);
