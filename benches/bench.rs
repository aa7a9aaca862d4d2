use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathtrie::{with_handler, Params, Trie};

const ROUTES: &[&str] = &[
    "/",
    "/login",
    "/signup",
    "/settings",
    "/settings/:page",
    "/users/:user",
    "/users/:user/repos",
    "/users/:user/repos/:repo",
    "/users/:user/repos/:repo/issues/:id",
    "/files/file+:name",
    "/img/thumb-:.png",
    "/static/*path",
    "/api/v1/projects/:project/builds/:build",
    "/api/v1/projects/:project/builds/latest",
];

fn build() -> Trie<&'static str> {
    let mut trie = Trie::new();
    for route in ROUTES {
        trie.insert(route, [with_handler(*route)]);
    }
    trie
}

fn bench_search(c: &mut Criterion) {
    let trie = build();
    let backtracking = {
        let mut trie = Trie::new().search_unvisited_params();
        for route in ROUTES {
            trie.insert(route, [with_handler(*route)]);
        }
        trie
    };

    let mut group = c.benchmark_group("search");

    group.bench_function("static", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = trie.search(black_box("/settings"), &mut params);
            assert!(node.is_some());
        })
    });

    group.bench_function("params", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = trie.search(black_box("/users/gordon/repos/pathtrie"), &mut params);
            assert!(node.is_some());
        })
    });

    group.bench_function("prefix-suffix", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = trie.search(black_box("/files/fileA"), &mut params);
            assert!(node.is_some());
            let node = trie.search(black_box("/img/logo.png"), &mut params);
            assert!(node.is_some());
        })
    });

    group.bench_function("wildcard", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = trie.search(black_box("/static/js/inc/framework.js"), &mut params);
            assert!(node.is_some());
        })
    });

    group.bench_function("backtracking", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = backtracking.search(
                black_box("/api/v1/projects/demo/builds/latest"),
                &mut params,
            );
            assert!(node.is_some());
        })
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            let mut params = Params::new();
            let node = trie.search(black_box("/api/v2/unknown"), &mut params);
            assert!(node.is_none());
        })
    });

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert", |b| {
        b.iter(|| {
            let trie = build();
            black_box(&trie);
        })
    });
}

criterion_group!(benches, bench_search, bench_insert);
criterion_main!(benches);
