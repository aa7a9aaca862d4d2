#![deny(rust_2018_idioms)]

//! A trie of URL path patterns with named, wildcard, prefix and suffix
//! parameters.
//!
//! ```rust
//! use pathtrie::{with_handler, Params, Trie};
//!
//! let mut trie = Trie::new();
//! trie.insert("/home", [with_handler("Welcome!")]);
//! trie.insert("/users/:id", [with_handler("A User")]);
//!
//! let mut params = Params::new();
//! let node = trie.search("/users/1", &mut params).unwrap();
//! assert_eq!(node.handler(), Some(&"A User"));
//! assert_eq!(params.get("id"), Some("1"));
//! ```
//!
//! The trie stores one node per path segment. Four parameter classes coexist
//! with static segments on the same node, and a lookup tries them in a fixed
//! priority order, so the most specific registered pattern always wins:
//!
//! ```text
//! Syntax            Type                Priority
//! static            literal segment     1
//! literal+:name     prefix parameter    2
//! name-:literal     suffix parameter    3
//! :name             named parameter     4
//! *name             wildcard            5
//! ```
//!
//! # Named parameters
//!
//! A named parameter matches exactly one segment, whatever its content:
//!
//! ```text
//! Pattern: /user/:name
//!
//!  /user/gordon           match, name = "gordon"
//!  /user/you              match, name = "you"
//!  /user/gordon/profile   no match
//! ```
//!
//! Unlike routers built on explicit-match radix trees, static segments and
//! parameters may share a parent: with `/user/new` and `/user/:name` both
//! registered, `/user/new` takes the static route and everything else binds
//! `name`.
//!
//! # Wildcards
//!
//! A wildcard consumes the rest of the path, across segments, so it is only
//! meaningful as the final segment of a pattern:
//!
//! ```text
//! Pattern: /src/*filepath
//!
//!  /src/somefile.rs           match, filepath = "somefile.rs"
//!  /src/subdir/somefile.rs    match, filepath = "subdir/somefile.rs"
//! ```
//!
//! A wildcard also acts as the fallback for every dead end beneath its
//! parent: `/src/sub/missing` matches `/src/*filepath` even when
//! `/src/sub/other` is registered. A wildcard registered directly under the
//! root claims any path nothing else wants.
//!
//! # Prefix and suffix parameters
//!
//! Prefix and suffix parameters constrain one segment to start or end with a
//! literal. The captured value is always the whole segment:
//!
//! ```rust
//! use pathtrie::{with_handler, Params, Trie};
//!
//! let mut trie = Trie::new();
//! trie.insert("/img/name-:.png", [with_handler(())]);
//!
//! let mut params = Params::new();
//! let node = trie.search("/img/logo.png", &mut params).unwrap();
//! assert_eq!(node.key(), "/img/name-:.png");
//! assert_eq!(params.get("name"), Some("logo.png"));
//! ```
//!
//! When several literals are registered on the same parent, the longest one
//! that fits the request segment wins.
//!
//! # Unvisited-parameter retry
//!
//! A static segment shadows a parameter registered on the same parent. With
//! [`search_unvisited_params`](Trie::search_unvisited_params) enabled, a
//! dead-ended lookup backtracks and retries the parameter branches it
//! skipped:
//!
//! ```rust
//! use pathtrie::{with_handler, Params, Trie};
//!
//! let mut trie = Trie::new().search_unvisited_params();
//! trie.insert("/a/b/c/z", [with_handler(())]);
//! trie.insert("/a/:p1/c/d", [with_handler(())]);
//!
//! let mut params = Params::new();
//! let node = trie.search("/a/b/c/d", &mut params).unwrap();
//! assert_eq!(node.key(), "/a/:p1/c/d");
//! assert_eq!(params.get("p1"), Some("b"));
//! ```
//!
//! # Build, then serve
//!
//! Insertion requires `&mut Trie`; lookups take `&Trie`, never write, and
//! can run from any number of threads once building is done.

mod params;
mod pattern;
mod tree;

pub use params::{Params, ParamsSetter};
pub use tree::{
    default_keys_sorter, with_data, with_handler, with_tag, InsertOption, KeysSorter, Node, Trie,
    TrieOptions,
};

#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
