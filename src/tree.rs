use std::any::Any;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use smallvec::SmallVec;

use crate::params::ParamsSetter;
use crate::pattern::{
    self, Segment, PARAM_START, PATH_SEP, PATH_SEP_BYTE, PREFIX_PARAM_START, SUFFIX_PARAM_START,
    WILDCARD_PARAM_START,
};

type NodeId = usize;

const ROOT: NodeId = 0;

// capture buffer for one search; sized like the Params sink
type ParamValues<'q> = SmallVec<[&'q str; 4]>;

/// A node of the trie.
///
/// Nodes are created by [`Trie::insert`] and handed out by
/// [`Trie::search`] and the prefix helpers. A node is *terminal* when a
/// pattern ends at it; only terminal nodes carry a [`key`](Node::key) and a
/// payload.
pub struct Node<T> {
    parent: Option<NodeId>,
    children: HashMap<Box<str>, NodeId>,

    has_named_child: bool,
    has_wildcard_child: bool,
    has_prefix_child: bool,
    has_suffix_child: bool,

    // registered literal lengths, strictly descending and deduplicated, so
    // probes hit the longest literal first
    prefix_lengths: Vec<usize>,
    suffix_lengths: Vec<usize>,

    // 1-based index of the child segment in the inserted pattern
    path_index: usize,
    // parameters captured strictly before the child segment
    param_count: usize,

    param_keys: Vec<Box<str>>,
    end: bool,
    key: Box<str>,
    static_key: Box<str>,

    handler: Option<T>,
    tag: Option<Box<str>>,
    data: Option<Box<dyn Any + Send + Sync>>,
}

impl<T> Node<T> {
    fn new(parent: Option<NodeId>) -> Self {
        Node {
            parent,
            children: HashMap::new(),
            has_named_child: false,
            has_wildcard_child: false,
            has_prefix_child: false,
            has_suffix_child: false,
            prefix_lengths: Vec::new(),
            suffix_lengths: Vec::new(),
            path_index: 0,
            param_count: 0,
            param_keys: Vec::new(),
            end: false,
            key: Box::from(""),
            static_key: Box::from(""),
            handler: None,
            tag: None,
            data: None,
        }
    }

    /// The pattern this node terminates, or `""` for an interior node.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if a pattern ends at this node.
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// The handler registered with [`with_handler`], if any.
    pub fn handler(&self) -> Option<&T> {
        self.handler.as_ref()
    }

    /// The tag registered with [`with_tag`], if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The data registered with [`with_data`], if any.
    pub fn data(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.data.as_deref()
    }
}

impl<T> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("end", &self.end)
            .field("path_index", &self.path_index)
            .field("param_keys", &self.param_keys)
            .field("children", &self.children.len())
            .finish()
    }
}

/// An option applied to the terminal node of an inserted pattern.
///
/// Built with [`with_handler`], [`with_tag`] or [`with_data`]. Handler and
/// tag are set only if the node does not already carry one; data always
/// replaces the previous value.
pub enum InsertOption<T> {
    #[doc(hidden)]
    Handler(T),
    #[doc(hidden)]
    Tag(Box<str>),
    #[doc(hidden)]
    Data(Box<dyn Any + Send + Sync>),
}

/// Attaches a handler to the inserted pattern.
pub fn with_handler<T>(handler: T) -> InsertOption<T> {
    InsertOption::Handler(handler)
}

/// Attaches a tag to the inserted pattern, useful for things like route names.
pub fn with_tag<T>(tag: impl Into<Box<str>>) -> InsertOption<T> {
    InsertOption::Tag(tag.into())
}

/// Attaches arbitrary data to the inserted pattern. The trie never inspects
/// it; read it back with [`Node::data`] and downcast.
pub fn with_data<T>(data: impl Any + Send + Sync) -> InsertOption<T> {
    InsertOption::Data(Box::new(data))
}

/// Comparator for the pattern lists returned by [`Trie::keys`] and
/// [`Trie::autocomplete`].
pub type KeysSorter = fn(&str, &str) -> Ordering;

/// Orders patterns with fewer `/`-separated segments first.
pub fn default_keys_sorter(a: &str, b: &str) -> Ordering {
    a.split(PATH_SEP).count().cmp(&b.split(PATH_SEP).count())
}

/// Behavior switches for a [`Trie`], all off by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrieOptions {
    /// Match static, prefix and suffix literals without ASCII case
    /// sensitivity. Captured parameter values keep the request's case.
    pub case_insensitive: bool,
    /// When a lookup dead-ends, retry parameter branches at ancestors that
    /// were skipped in favor of static matches. Resolves conflicts like
    /// `/a/b/c/z` vs `/a/:p1/c/d` for the request `/a/b/c/d`.
    pub search_unvisited_params: bool,
}

/// A trie of URL path patterns.
///
/// Patterns mix five segment classes on the same tree: static text, named
/// parameters (`:name`), wildcards (`*name`), prefix parameters
/// (`literal+:name`) and suffix parameters (`name-:literal`). A lookup walks
/// the request path segment by segment, trying each class in that priority
/// order, and returns the single best-matching pattern together with its
/// parameter bindings.
///
/// ```rust
/// use pathtrie::{with_handler, Params, Trie};
///
/// let mut trie = Trie::new();
/// trie.insert("/profile/:name", [with_handler("profile")]);
/// trie.insert("/profile/:name/friends", [with_handler("friends")]);
///
/// let mut params = Params::new();
/// let node = trie.search("/profile/gordon", &mut params).unwrap();
/// assert_eq!(node.handler(), Some(&"profile"));
/// assert_eq!(params.get("name"), Some("gordon"));
/// ```
///
/// The trie is built once and then searched: `insert` takes `&mut self`,
/// `search` takes `&self` and never writes, so a built trie can be shared
/// across threads freely.
pub struct Trie<T> {
    nodes: Vec<Node<T>>,

    // a root-level wildcard handles any path no other pattern claims
    has_root_wildcard: bool,
    has_root_slash: bool,

    case_insensitive: bool,
    search_unvisited_params: bool,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trie<T> {
    /// Creates an empty trie with default options.
    pub fn new() -> Self {
        Trie {
            nodes: vec![Node::new(None)],
            has_root_wildcard: false,
            has_root_slash: false,
            case_insensitive: false,
            search_unvisited_params: false,
        }
    }

    /// Creates an empty trie with the given options.
    pub fn with_options(options: TrieOptions) -> Self {
        let mut trie = Self::new();
        trie.case_insensitive = options.case_insensitive;
        trie.search_unvisited_params = options.search_unvisited_params;
        trie
    }

    /// Turns on case-insensitive matching of literals.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Turns on the retry of unvisited parameter branches.
    pub fn search_unvisited_params(mut self) -> Self {
        self.search_unvisited_params = true;
        self
    }

    /// Registers a pattern and applies the given insert options to its
    /// terminal node. Inserting the same pattern again reuses the node.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn insert(&mut self, pattern: &str, options: impl IntoIterator<Item = InsertOption<T>>) {
        if pattern.is_empty() {
            panic!("pathtrie: empty pattern");
        }

        let id = self.insert_pattern(pattern);
        let node = &mut self.nodes[id];

        for option in options {
            match option {
                InsertOption::Handler(handler) => {
                    if node.handler.is_none() {
                        node.handler = Some(handler);
                    }
                }
                InsertOption::Tag(tag) => {
                    if node.tag.is_none() {
                        node.tag = Some(tag);
                    }
                }
                InsertOption::Data(data) => node.data = Some(data),
            }
        }
    }

    fn insert_pattern(&mut self, pattern: &str) -> NodeId {
        if pattern == PATH_SEP {
            self.has_root_slash = true;
        }

        let mut n = ROOT;
        let mut param_keys: Vec<Box<str>> = Vec::new();

        for (index, segment) in pattern::split(pattern).into_iter().enumerate() {
            self.nodes[n].path_index = index + 1;
            self.nodes[n].param_count = param_keys.len();

            let key: Cow<'_, str> = match pattern::classify(segment) {
                Segment::Static(text) => Cow::Borrowed(text),
                Segment::Named(name) => {
                    param_keys.push(name.into());
                    self.nodes[n].has_named_child = true;
                    Cow::Borrowed(PARAM_START)
                }
                Segment::Wildcard(name) => {
                    param_keys.push(name.into());
                    self.nodes[n].has_wildcard_child = true;
                    if n == ROOT {
                        self.has_root_wildcard = true;
                    }
                    Cow::Borrowed(WILDCARD_PARAM_START)
                }
                Segment::Prefix { literal, name } => {
                    param_keys.push(name.into());
                    self.nodes[n].has_prefix_child = true;
                    add_length(&mut self.nodes[n].prefix_lengths, literal.len());
                    // canonical child key: literal + "+:"
                    Cow::Borrowed(&segment[..literal.len() + PREFIX_PARAM_START.len()])
                }
                Segment::Suffix { name, literal } => {
                    param_keys.push(name.into());
                    self.nodes[n].has_suffix_child = true;
                    add_length(&mut self.nodes[n].suffix_lengths, literal.len());
                    // canonical child key: "-:" + literal
                    Cow::Borrowed(&segment[name.len()..])
                }
            };

            let key = if self.case_insensitive && key.bytes().any(|b| b.is_ascii_uppercase()) {
                Cow::Owned(key.to_ascii_lowercase())
            } else {
                key
            };

            n = self.child_or_new(n, key);
        }

        let node = &mut self.nodes[n];
        node.param_keys = param_keys;
        node.key = pattern.into();
        node.static_key = pattern::static_part(pattern).into();
        node.end = true;
        n
    }

    fn child_or_new(&mut self, parent: NodeId, key: Cow<'_, str>) -> NodeId {
        if let Some(&child) = self.nodes[parent].children.get(key.as_ref()) {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(Node::new(Some(parent)));
        self.nodes[parent].children.insert(key.into(), child);
        child
    }

    /// Finds the terminal node responsible for the request path `path`,
    /// reporting its parameter bindings through `params`.
    ///
    /// Segment classes are tried in priority order: static, prefix
    /// parameter (longest literal first), suffix parameter (longest literal
    /// first), named parameter, wildcard. A dead-ended walk retries skipped
    /// parameter branches when [`search_unvisited_params`](Trie::search_unvisited_params)
    /// is on, and finally falls back to the closest ancestor wildcard.
    ///
    /// Returns `None` when no pattern is responsible for `path`.
    pub fn search(&self, path: &str, params: &mut impl ParamsSetter) -> Option<&Node<T>> {
        let q = path;
        let end = q.len();

        if end == 0 || q == PATH_SEP {
            if self.has_root_slash {
                return self.child_id(ROOT, PATH_SEP).map(|id| &self.nodes[id]);
            }
            if self.has_root_wildcard {
                // the wildcard claims the root path, with nothing to bind
                return self
                    .child_id(ROOT, WILDCARD_PARAM_START)
                    .map(|id| &self.nodes[id]);
            }
            return None;
        }

        let bytes = q.as_bytes();
        if bytes[0] != PATH_SEP_BYTE {
            return None;
        }

        // lowercased copy for child-map lookups only; captured values always
        // come from the original path
        let qc: Cow<'_, str> = if self.case_insensitive {
            Cow::Owned(q.to_ascii_lowercase())
        } else {
            Cow::Borrowed(q)
        };

        let mut n = ROOT;
        let mut start = 1;
        let mut i = 1;
        let mut param_values = ParamValues::new();
        let mut visited: HashSet<NodeId> = HashSet::new();

        loop {
            if i == end || bytes[i] == PATH_SEP_BYTE {
                let segment = &qc[start..i];

                if let Some(child) = self.child_id(n, segment) {
                    n = child;
                } else if let Some(child) = self.prefix_param_child(n, segment) {
                    n = child;
                    visited.insert(child);
                    param_values.push(&q[start..i]);
                } else if let Some(child) = self.suffix_param_child(n, segment) {
                    n = child;
                    visited.insert(child);
                    param_values.push(&q[start..i]);
                } else if let Some(child) = self.named_child(n) {
                    n = child;
                    visited.insert(child);
                    param_values.push(&q[start..i]);
                } else if let Some(child) = self.wildcard_child(n) {
                    n = child;
                    param_values.push(&q[start..]);
                    break;
                } else {
                    let unvisited = if self.search_unvisited_params {
                        // the first ancestor re-examines the segment before
                        // the one that just failed
                        let seg_end = start - 1;
                        let seg_start = segment_start(&qc, seg_end);
                        self.closest_unvisited(&visited, &qc, seg_start, seg_end, n)
                    } else {
                        None
                    };

                    match unvisited {
                        Some((child, seg_start, seg_end)) => {
                            start = seg_start;
                            i = seg_end;
                            n = child;
                            visited.insert(child);
                            rewind_params(&mut param_values, &self.nodes, child);
                            param_values.push(&q[start..i]);
                        }
                        None => return self.wildcard_fallback(n, q, params),
                    }
                }

                if i == end {
                    if self.search_unvisited_params && !self.nodes[n].end {
                        // the final segment may still satisfy a skipped
                        // parameter branch
                        if let Some((child, seg_start, seg_end)) =
                            self.closest_unvisited(&visited, &qc, start, i, n)
                        {
                            start = seg_start;
                            i = seg_end;
                            n = child;
                            visited.insert(child);
                            rewind_params(&mut param_values, &self.nodes, child);
                            param_values.push(&q[start..i]);
                            if i < end {
                                // rewound into the middle of the path: resume
                                // the walk from there
                                i += 1;
                                start = i;
                                continue;
                            }
                        }
                    }
                    break;
                }

                i += 1;
                start = i;
                continue;
            }

            i += 1;
        }

        let node = &self.nodes[n];
        if !node.end {
            return self.wildcard_fallback(n, q, params);
        }

        for (name, value) in node.param_keys.iter().zip(&param_values) {
            params.set(name, value);
        }

        Some(node)
    }

    /// Returns the node reached by walking the segments of `prefix`, or
    /// `None` if some segment has no child. Dynamic segments are looked up
    /// by their canonical key (`:`, `*`, `literal+:`, `-:literal`).
    pub fn search_prefix(&self, prefix: &str) -> Option<&Node<T>> {
        self.search_prefix_id(prefix).map(|id| &self.nodes[id])
    }

    /// Returns `true` if `prefix` reaches a node of the trie.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.search_prefix_id(prefix).is_some()
    }

    /// The terminal ancestors of the node reached by `prefix`, closest
    /// first. The reached node itself is not included.
    pub fn parents(&self, prefix: &str) -> Vec<&Node<T>> {
        let mut parents = Vec::new();

        if let Some(id) = self.search_prefix_id(prefix) {
            let mut current = self.nodes[id].parent;
            while let Some(id) = current {
                let node = &self.nodes[id];
                if node.end {
                    parents.push(node);
                }
                current = node.parent;
            }
        }

        parents
    }

    /// Every registered pattern, optionally ordered by `sorter`.
    pub fn keys(&self, sorter: Option<KeysSorter>) -> Vec<&str> {
        self.keys_under(ROOT, sorter)
    }

    /// The registered patterns that extend `prefix`, optionally ordered by
    /// `sorter`.
    pub fn autocomplete(&self, prefix: &str, sorter: Option<KeysSorter>) -> Vec<&str> {
        match self.search_prefix_id(prefix) {
            Some(id) => self.keys_under(id, sorter),
            None => Vec::new(),
        }
    }

    fn search_prefix_id(&self, prefix: &str) -> Option<NodeId> {
        let mut n = ROOT;

        for segment in pattern::split(prefix) {
            n = if self.case_insensitive && segment.bytes().any(|b| b.is_ascii_uppercase()) {
                self.child_id(n, &segment.to_ascii_lowercase())
            } else {
                self.child_id(n, segment)
            }?;
        }

        Some(n)
    }

    fn keys_under(&self, id: NodeId, sorter: Option<KeysSorter>) -> Vec<&str> {
        let mut list = Vec::new();
        self.collect_keys(id, &mut list);

        if let Some(sorter) = sorter {
            list.sort_by(|a, b| sorter(a, b));
        }
        list
    }

    fn collect_keys<'t>(&'t self, id: NodeId, list: &mut Vec<&'t str>) {
        let node = &self.nodes[id];
        if node.end {
            list.push(&node.key);
        }
        for &child in node.children.values() {
            self.collect_keys(child, list);
        }
    }

    fn child_id(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.nodes[id].children.get(key).copied()
    }

    fn named_child(&self, id: NodeId) -> Option<NodeId> {
        if !self.nodes[id].has_named_child {
            return None;
        }
        self.child_id(id, PARAM_START)
    }

    fn wildcard_child(&self, id: NodeId) -> Option<NodeId> {
        if !self.nodes[id].has_wildcard_child {
            return None;
        }
        self.child_id(id, WILDCARD_PARAM_START)
    }

    fn prefix_param_child(&self, id: NodeId, segment: &str) -> Option<NodeId> {
        let node = &self.nodes[id];
        if !node.has_prefix_child {
            return None;
        }

        for &len in &node.prefix_lengths {
            if len > segment.len() || !segment.is_char_boundary(len) {
                continue;
            }
            let key = [&segment[..len], PREFIX_PARAM_START].concat();
            if let Some(&child) = node.children.get(key.as_str()) {
                return Some(child);
            }
        }
        None
    }

    fn suffix_param_child(&self, id: NodeId, segment: &str) -> Option<NodeId> {
        let node = &self.nodes[id];
        if !node.has_suffix_child {
            return None;
        }

        for &len in &node.suffix_lengths {
            if len > segment.len() {
                continue;
            }
            let at = segment.len() - len;
            if !segment.is_char_boundary(at) {
                continue;
            }
            let key = [SUFFIX_PARAM_START, &segment[at..]].concat();
            if let Some(&child) = node.children.get(key.as_str()) {
                return Some(child);
            }
        }
        None
    }

    // Climb the parent chain looking for a parameter branch that was skipped
    // in favor of a static match. `seg_start..seg_end` bound the request
    // segment the first ancestor re-examines; every further climb rewinds one
    // segment. At each ancestor the candidates are tried in priority order:
    // prefix, suffix, named, wildcard.
    fn closest_unvisited(
        &self,
        visited: &HashSet<NodeId>,
        qc: &str,
        mut seg_start: usize,
        mut seg_end: usize,
        from: NodeId,
    ) -> Option<(NodeId, usize, usize)> {
        let mut current = self.nodes[from].parent;

        while let Some(id) = current {
            let segment = &qc[seg_start..seg_end];

            let candidates = [
                self.prefix_param_child(id, segment),
                self.suffix_param_child(id, segment),
                self.named_child(id),
                self.wildcard_child(id),
            ];
            for child in candidates.into_iter().flatten() {
                if !visited.contains(&child) {
                    return Some((child, seg_start, seg_end));
                }
            }

            seg_end = seg_start.saturating_sub(1);
            seg_start = segment_start(qc, seg_end);
            current = self.nodes[id].parent;
        }

        None
    }

    // A dead-ended walk still matches the nearest enclosing wildcard, if any.
    fn wildcard_fallback(
        &self,
        from: NodeId,
        q: &str,
        params: &mut impl ParamsSetter,
    ) -> Option<&Node<T>> {
        let mut current = self.nodes[from].parent;
        while let Some(id) = current {
            if let Some(child) = self.wildcard_child(id) {
                let node = &self.nodes[child];
                if let Some(name) = node.param_keys.first() {
                    // everything past the pattern's static part is the
                    // wildcard's capture
                    let tail = q.get(node.static_key.len()..).unwrap_or_default();
                    params.set(name, tail);
                }
                return Some(node);
            }
            current = self.nodes[id].parent;
        }

        if self.has_root_wildcard {
            if let Some(child) = self.child_id(ROOT, WILDCARD_PARAM_START) {
                let node = &self.nodes[child];
                if let Some(name) = node.param_keys.first() {
                    params.set(name, &q[1..]);
                }
                return Some(node);
            }
        }

        None
    }
}

impl<T> fmt::Debug for Trie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("patterns", &self.keys(Some(default_keys_sorter)))
            .field("case_insensitive", &self.case_insensitive)
            .field("search_unvisited_params", &self.search_unvisited_params)
            .finish()
    }
}

// keep the table descending and deduplicated
fn add_length(lengths: &mut Vec<usize>, len: usize) {
    if let Err(at) = lengths.binary_search_by(|probe| len.cmp(probe)) {
        lengths.insert(at, len);
    }
}

// start of the segment ending at `seg_end`: one past the previous separator
fn segment_start(qc: &str, seg_end: usize) -> usize {
    match qc[..seg_end].rfind(PATH_SEP) {
        Some(sep) => sep + 1,
        None => 0,
    }
}

// drop captures made below the retried branch: everything after the
// ancestor's parameter count belongs to the abandoned descent
fn rewind_params<T>(param_values: &mut ParamValues<'_>, nodes: &[Node<T>], child: NodeId) {
    if let Some(parent) = nodes[child].parent {
        param_values.truncate(nodes[parent].param_count);
    }
}
