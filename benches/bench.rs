use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ordered_tree::OrderedTree;

/// Pushes `lo..hi` in an order that builds a perfectly balanced tree when inserted.
fn balanced_order(lo: i32, hi: i32, out: &mut Vec<i32>) {
    if lo >= hi {
        return;
    }
    let mid = lo + (hi - lo) / 2;
    out.push(mid);
    balanced_order(lo, mid, out);
    balanced_order(mid + 1, hi, out);
}

/// Helper to bench a function on an `OrderedTree`.
/// It creates a group for the given name and closure and runs it against balanced and
/// degenerate trees of various sizes before finishing the group. The closure gets the largest
/// key in the tree.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut OrderedTree<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11] {
        let num_nodes = 2i32.pow(num_levels) - 1;
        let largest_element_in_tree = num_nodes - 1;

        let balanced_tree = {
            let mut keys = Vec::with_capacity(num_nodes as usize);
            balanced_order(0, num_nodes, &mut keys);
            keys.into_iter().collect::<OrderedTree<_>>()
        };
        let degenerate_tree = (0..num_nodes).collect::<OrderedTree<_>>();

        let tree_tests = [("balanced", balanced_tree), ("degenerate", degenerate_tree)];
        for (name, tree) in tree_tests {
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |tree, i| {
        let _found = black_box(tree.find(&i).get());
    });
    bench_helper(c, "find-miss", |tree, i| {
        let _found = black_box(tree.find(&(i + 1)).get());
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "min-greater-than", |tree, i| {
        let _found = black_box(tree.min_greater_than(&(i / 2)).get());
    });

    bench_helper(c, "clone", |tree, _| {
        let _copy = black_box(tree.clone());
    });
    bench_helper(c, "iterate", |tree, _| {
        let _sum: i64 = black_box(tree.iter().map(|k| i64::from(*k)).sum());
    });
    bench_helper(c, "check-sorting-invariant", |tree, _| {
        let _ok = black_box(tree.check_sorting_invariant());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
