#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<String>, String, bool, bool)| {
    let (patterns, path, case_insensitive, search_unvisited_params) = data;

    let mut trie = pathtrie::Trie::new();
    if case_insensitive {
        trie = trie.case_insensitive();
    }
    if search_unvisited_params {
        trie = trie.search_unvisited_params();
    }

    for pattern in patterns {
        if pattern.is_empty() {
            continue;
        }
        trie.insert(&pattern, [pathtrie::with_handler(())]);
    }

    let mut params = pathtrie::Params::new();
    let _ = trie.search(&path, &mut params);
    let _ = trie.search_prefix(&path);
});
