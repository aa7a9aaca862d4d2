use pathtrie::{default_keys_sorter, with_data, with_handler, with_tag, Params, Trie, TrieOptions};

fn sample() -> Trie<&'static str> {
    let mut trie = Trie::new();
    for route in [
        "/",
        "/users",
        "/users/admin",
        "/users/admin/logs",
        "/users/:id",
        "/static/*path",
    ] {
        trie.insert(route, [with_handler(route)]);
    }
    trie
}

#[test]
fn keys_lists_every_pattern() {
    let trie = sample();

    let mut keys = trie.keys(None);
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "/",
            "/static/*path",
            "/users",
            "/users/:id",
            "/users/admin",
            "/users/admin/logs",
        ]
    );
}

#[test]
fn default_sorter_orders_by_segment_count() {
    let trie = sample();

    let keys = trie.keys(Some(default_keys_sorter));
    let counts: Vec<usize> = keys.iter().map(|key| key.split('/').count()).collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable();
    assert_eq!(counts, sorted);
    assert_eq!(keys.len(), 6);
}

#[test]
fn autocomplete_returns_extensions_of_the_prefix() {
    let trie = sample();

    let mut keys = trie.autocomplete("/users", None);
    keys.sort_unstable();
    assert_eq!(keys, ["/users", "/users/:id", "/users/admin", "/users/admin/logs"]);

    let keys = trie.autocomplete("/users/admin", Some(default_keys_sorter));
    assert_eq!(keys, ["/users/admin", "/users/admin/logs"]);

    assert!(trie.autocomplete("/missing", None).is_empty());
}

#[test]
fn has_prefix() {
    let trie = sample();

    assert!(trie.has_prefix("/users"));
    assert!(trie.has_prefix("/users/admin"));
    assert!(trie.has_prefix("/static"));
    assert!(!trie.has_prefix("/missing"));
    assert!(!trie.has_prefix("/users/admin/logs/deeper"));
}

#[test]
fn search_prefix_reaches_interior_nodes() {
    let trie = sample();

    // "/static" exists only as the parent of the wildcard
    let node = trie.search_prefix("/static").unwrap();
    assert!(!node.is_end());
    assert_eq!(node.key(), "");

    let node = trie.search_prefix("/users/admin").unwrap();
    assert!(node.is_end());
    assert_eq!(node.key(), "/users/admin");

    assert!(trie.search_prefix("/nope").is_none());
}

#[test]
fn parents_are_terminal_ancestors_closest_first() {
    let trie = sample();

    let parents: Vec<&str> = trie
        .parents("/users/admin/logs")
        .into_iter()
        .map(|node| node.key())
        .collect();
    assert_eq!(parents, ["/users/admin", "/users"]);

    // the reached node itself is excluded
    let parents = trie.parents("/users");
    assert!(parents.is_empty());

    let parents = trie.parents("/missing");
    assert!(parents.is_empty());
}

#[test]
fn handler_and_tag_are_kept_on_reinsert() {
    let mut trie = Trie::new();
    trie.insert("/x", [with_handler(1), with_tag("first")]);
    trie.insert("/x", [with_handler(2), with_tag("second"), with_data(42_u32)]);

    let mut params = Params::new();
    let node = trie.search("/x", &mut params).unwrap();
    assert_eq!(node.handler(), Some(&1));
    assert_eq!(node.tag(), Some("first"));
    assert_eq!(
        node.data().and_then(|data| data.downcast_ref::<u32>()),
        Some(&42)
    );
}

#[test]
fn data_is_replaced_on_reinsert() {
    let mut trie: Trie<()> = Trie::new();
    trie.insert("/x", [with_data(1_i32)]);
    trie.insert("/x", [with_data("two")]);

    let mut params = Params::new();
    let node = trie.search("/x", &mut params).unwrap();
    assert!(node.data().unwrap().downcast_ref::<i32>().is_none());
    assert_eq!(
        node.data().and_then(|data| data.downcast_ref::<&str>()),
        Some(&"two")
    );
}

#[test]
fn bare_insert_carries_no_payload() {
    let mut trie: Trie<()> = Trie::new();
    trie.insert("/empty", []);

    let mut params = Params::new();
    let node = trie.search("/empty", &mut params).unwrap();
    assert!(node.handler().is_none());
    assert!(node.tag().is_none());
    assert!(node.data().is_none());
    assert_eq!(node.to_string(), "/empty");
}

#[test]
#[should_panic(expected = "empty pattern")]
fn empty_pattern_panics() {
    let mut trie: Trie<()> = Trie::new();
    trie.insert("", []);
}

#[test]
fn with_options_matches_the_chainable_setters() {
    let mut from_options: Trie<()> = Trie::with_options(TrieOptions {
        case_insensitive: true,
        search_unvisited_params: true,
    });
    let mut chained: Trie<()> = Trie::new().case_insensitive().search_unvisited_params();

    for trie in [&mut from_options, &mut chained] {
        trie.insert("/Static/b/c", []);
        trie.insert("/Static/:p", []);
    }

    for trie in [&from_options, &chained] {
        let mut params = Params::new();
        let node = trie.search("/STATIC/b", &mut params).unwrap();
        assert_eq!(node.key(), "/Static/:p");
        assert_eq!(params.get("p"), Some("b"));
    }
}

#[test]
fn case_insensitive_prefix_lookups() {
    let mut trie: Trie<()> = Trie::new().case_insensitive();
    trie.insert("/Users/Admin", []);

    assert!(trie.has_prefix("/users/admin"));
    assert!(trie.has_prefix("/USERS"));

    let keys = trie.autocomplete("/users", None);
    assert_eq!(keys, ["/Users/Admin"]);
}

#[test]
fn shared_readers() {
    let trie = std::sync::Arc::new(sample());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let trie = std::sync::Arc::clone(&trie);
            std::thread::spawn(move || {
                let mut params = Params::new();
                let node = trie.search("/users/7", &mut params).unwrap();
                assert_eq!(node.key(), "/users/:id");
                assert_eq!(params.get("id"), Some("7"));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
