//! Variable store.
//!
//! A prefix tree keyed by the characters of the variable name.  Children are
//! kept in a [`BTreeMap`], so [`VarStore::enumerate`] visits names in sorted
//! order and listings are reproducible.

use std::collections::BTreeMap;

use crate::script::Word;

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<char, Node>,
    value: Option<Word>,
}

impl Node {
    fn is_prunable(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

/// Name → word bindings.
#[derive(Debug, Default, Clone)]
pub struct VarStore {
    root: Node,
    len: usize,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) a variable.  Returns the previous value.
    pub fn insert(&mut self, name: &str, value: Word) -> Option<Word> {
        let mut node = &mut self.root;
        for c in name.chars() {
            node = node.children.entry(c).or_default();
        }
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Option<Word> {
        let mut node = &self.root;
        for c in name.chars() {
            node = node.children.get(&c)?;
        }
        node.value
    }

    /// Remove a binding, pruning nodes that no longer lead to any name.
    /// Returns the removed value.
    pub fn delete(&mut self, name: &str) -> Option<Word> {
        let key: Vec<char> = name.chars().collect();
        let removed = remove(&mut self.root, &key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// All bound names, depth first, in ascending character order.
    pub fn enumerate(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    /// All bindings in the same order as [`enumerate`](Self::enumerate).
    pub fn entries(&self) -> Vec<(String, Word)> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = String::new();
        collect(&self.root, &mut prefix, &mut out);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, Word)> {
        self.entries().into_iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn remove(node: &mut Node, key: &[char]) -> Option<Word> {
    let Some((c, rest)) = key.split_first() else {
        return node.value.take();
    };
    let child = node.children.get_mut(c)?;
    let removed = remove(child, rest)?;
    if child.is_prunable() {
        node.children.remove(c);
    }
    Some(removed)
}

fn collect(node: &Node, prefix: &mut String, out: &mut Vec<(String, Word)>) {
    if let Some(value) = node.value {
        out.push((prefix.clone(), value));
    }
    for (&c, child) in &node.children {
        prefix.push(c);
        collect(child, prefix, out);
        prefix.pop();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
