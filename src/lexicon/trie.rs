//! Prefix trie of multi-word expressions
//!
//! Nodes live in an arena and edges in a single hash map keyed by
//! `(parent, segment)`. A node may be terminal (a complete expression ends
//! there) and still have children.

use rustc_hash::FxHashMap;

use crate::clitic::split_word;
use crate::forms::{FormId, FormTable};
use crate::tag::Tag;

/// Segment standing for any proper name
pub const NAME_KEY: &str = "NAME";
/// Segment standing for any number
pub const NUMBER_KEY: &str = "#";

pub type NodeId = u32;

/// Payload of a complete expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocutionEntry {
    pub tag: Tag,
    pub lemma: Option<String>,
    /// Preferred spelling of the whole expression
    pub norm: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Node {
    terminal: Option<LocutionEntry>,
    children: u32,
    depth: u16,
}

#[derive(Debug, Clone)]
pub struct LocutionTrie {
    nodes: Vec<Node>,
    edges: FxHashMap<(NodeId, FormId), NodeId>,
    keys: FormTable,
    terminals: usize,
    max_depth: usize,
}

impl Default for LocutionTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Split an expression into the segments a token stream would show.
///
/// Words are separated at spaces, then cut by [`split_word`]: elided
/// prefixes expanded ("qu'il" -> "que" "il"), postposed clitics broken
/// off ("est-ce" -> "est" "ce"), lexicalized words kept ("d'abord").
pub fn segments(expression: &str) -> Vec<String> {
    let mut out = Vec::new();
    for word in expression.split_whitespace() {
        let word: String = word
            .chars()
            .map(|c| if c == '’' { '\'' } else { c })
            .collect();
        out.extend(split_word(&word));
    }
    out
}

impl LocutionTrie {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            edges: FxHashMap::default(),
            keys: FormTable::with_capacity(1024),
            terminals: 0,
            max_depth: 0,
        }
    }

    /// Number of expressions
    pub fn len(&self) -> usize {
        self.terminals
    }

    pub fn is_empty(&self) -> bool {
        self.terminals == 0
    }

    /// Segments in the longest expression
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Add an expression; the last payload wins. Returns the segment count.
    pub fn insert(&mut self, expression: &str, entry: LocutionEntry) -> usize {
        let parts = segments(expression);
        if parts.is_empty() {
            return 0;
        }
        let mut node = Self::ROOT;
        for part in &parts {
            let key = self.keys.intern(part);
            node = match self.edges.get(&(node, key)) {
                Some(child) => *child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    let depth = self.nodes[node as usize].depth + 1;
                    self.nodes.push(Node {
                        depth,
                        ..Default::default()
                    });
                    self.nodes[node as usize].children += 1;
                    self.edges.insert((node, key), child);
                    child
                }
            };
        }
        let slot = &mut self.nodes[node as usize];
        if slot.terminal.is_none() {
            self.terminals += 1;
        }
        slot.terminal = Some(entry);
        self.max_depth = self.max_depth.max(parts.len());
        parts.len()
    }

    /// Child of `node` along `key`
    pub fn step(&self, node: NodeId, key: &str) -> Option<NodeId> {
        let key = self.keys.find(key)?;
        self.edges.get(&(node, key)).copied()
    }

    /// Payload when an expression ends at `node`
    pub fn entry(&self, node: NodeId) -> Option<&LocutionEntry> {
        self.nodes.get(node as usize)?.terminal.as_ref()
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        self.nodes
            .get(node as usize)
            .is_some_and(|n| n.children > 0)
    }

    /// Payload for a whole expression
    pub fn get(&self, expression: &str) -> Option<&LocutionEntry> {
        let mut node = Self::ROOT;
        for part in segments(expression) {
            node = self.step(node, &part)?;
        }
        if node == Self::ROOT {
            return None;
        }
        self.entry(node)
    }

    /// Remove the payload of an expression, keeping its branch
    pub fn remove(&mut self, expression: &str) -> bool {
        let mut node = Self::ROOT;
        for part in segments(expression) {
            match self.step(node, &part) {
                Some(next) => node = next,
                None => return false,
            }
        }
        match self.nodes.get_mut(node as usize) {
            Some(slot) if node != Self::ROOT && slot.terminal.is_some() => {
                slot.terminal = None;
                self.terminals -= 1;
                true
            }
            _ => false,
        }
    }
}
