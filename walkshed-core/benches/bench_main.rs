use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::Point;
use walkshed_core::prelude::*;

fn grid(side: i64) -> IndexedGraph {
    let id = |row: i64, col: i64| row * side + col;
    let nodes = (side * side) as usize;
    let mut streets = StreetGraph::with_capacity(nodes, 4 * nodes);

    for row in 0..side {
        for col in 0..side {
            let geometry = Point::new(col as f64 * 80.0, row as f64 * 80.0);
            streets.add_node(id(row, col), geometry);
            if col + 1 < side {
                streets.add_edge(StreetEdge::new(id(row, col), id(row, col + 1), 80.0));
                streets.add_edge(StreetEdge::new(id(row, col + 1), id(row, col), 80.0));
            }
            if row + 1 < side {
                streets.add_edge(StreetEdge::new(id(row, col), id(row + 1, col), 80.0));
                streets.add_edge(StreetEdge::new(id(row + 1, col), id(row, col), 80.0));
            }
        }
    }

    add_time_weights(&mut streets, DEFAULT_TRAVEL_SPEED).unwrap();
    GraphIndexer::default().build(&streets).unwrap()
}

fn bench_bounded_dijkstra(c: &mut Criterion) {
    let graph = grid(200);
    let source = graph.index_of(100 * 200 + 100).unwrap();

    let mut group = c.benchmark_group("bounded_dijkstra");
    for bound in [5.0, 15.0, 30.0, 60.0] {
        group.bench_with_input(BenchmarkId::from_parameter(bound), &bound, |b, &bound| {
            b.iter(|| bounded_dijkstra(black_box(&graph), source, bound).unwrap());
        });
    }
    group.finish();
}

fn bench_walk_times(c: &mut Criterion) {
    let graph = grid(120);
    let thresholds = TripTimeThresholds::default();
    let origins: Vec<NodeId> = (0..120 * 120).step_by(29).collect();
    let targets: Vec<NodeId> = (0..120 * 120).step_by(97).collect();

    let mut group = c.benchmark_group("walk_times");
    group.sample_size(10);
    group.bench_function("serial", |b| {
        b.iter(|| calculate_walk_times(&graph, &origins, &targets, &thresholds).unwrap());
    });
    for workers in [2, 4] {
        let id = BenchmarkId::new("parallel", workers);
        group.bench_with_input(id, &workers, |b, &workers| {
            b.iter(|| {
                let workers = Some(workers);
                calculate_walk_times_parallel(&graph, &origins, &targets, &thresholds, workers)
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bounded_dijkstra, bench_walk_times);
criterion_main!(benches);
