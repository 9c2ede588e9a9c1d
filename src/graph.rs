//! Overlap graph construction over an arena of k-mer nodes.
//!
//! Every input k-mer becomes one [`Node`] in a contiguous arena and is
//! addressed by its [`NodeId`]. Adjacency is stored as ordered index lists in
//! both directions, so compression can grow a node's value in place without
//! invalidating anybody else's references.

use std::collections::HashMap;

use log::{debug, info};

use crate::input::InputError;

/// Handle into the node arena.
pub type NodeId = usize;

/// An input k-mer or, once compression has run, a contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) value: String,
    pub(crate) next: Vec<NodeId>,
    pub(crate) prev: Vec<NodeId>,
    pub(crate) consumed: bool,
    pub(crate) compressed: bool,
}

impl Node {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            next: Vec::new(),
            prev: Vec::new(),
            consumed: false,
            compressed: false,
        }
    }

    /// Sequence content; grows as chains are merged into this node.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Successors in discovery order.
    pub fn next(&self) -> &[NodeId] {
        &self.next
    }

    /// Predecessors in discovery order.
    pub fn prev(&self) -> &[NodeId] {
        &self.prev
    }

    /// True once this node's content has been folded into another node.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// True once the compressor has finalised this node.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The part of the value that follows the leading `overlap` characters.
    #[inline]
    pub fn tail(&self, overlap: usize) -> &str {
        &self.value[overlap..]
    }
}

/// Check the k-mer set and return the word size `k` taken from the first entry.
pub fn validate_kmers<S: AsRef<str>>(kmers: &[S]) -> Result<usize, InputError> {
    let first = kmers.first().ok_or(InputError::Empty)?.as_ref();
    let word_size = first.len();
    if word_size < 2 {
        return Err(InputError::KmerTooShort { length: word_size });
    }

    for (idx, kmer) in kmers.iter().enumerate() {
        let kmer = kmer.as_ref();
        if !kmer.is_ascii() {
            return Err(InputError::NonAscii { line: idx + 1 });
        }
        if kmer.len() != word_size {
            return Err(InputError::InconsistentLineLength {
                line: idx + 1,
                expected: word_size,
                found: kmer.len(),
            });
        }
    }
    Ok(word_size)
}

/// Directed overlap graph: `a -> b` when the `k-1` suffix of `a` equals the
/// `k-1` prefix of `b`.
#[derive(Debug, Clone)]
pub struct OverlapGraph {
    nodes: Vec<Node>,
    word_size: usize,
}

impl OverlapGraph {
    /// Build the graph with one node per k-mer, in input order.
    ///
    /// Neighbour lists keep the order in which matching k-mers appear in the
    /// input. Edges between nodes carrying the same value (a k-mer overlapping
    /// itself, or a duplicate of it) are removed afterwards.
    pub fn build<S: AsRef<str>>(kmers: &[S]) -> Result<Self, InputError> {
        let word_size = validate_kmers(kmers)?;
        let overlap = word_size - 1;

        let mut by_prefix: HashMap<&str, Vec<NodeId>> = HashMap::new();
        let mut by_suffix: HashMap<&str, Vec<NodeId>> = HashMap::new();
        for (id, kmer) in kmers.iter().enumerate() {
            let kmer = kmer.as_ref();
            by_prefix.entry(&kmer[..overlap]).or_default().push(id);
            by_suffix.entry(&kmer[1..]).or_default().push(id);
        }

        let mut nodes: Vec<Node> = kmers.iter().map(|k| Node::new(k.as_ref())).collect();
        for node in nodes.iter_mut() {
            node.next = by_prefix
                .get(&node.value[1..])
                .cloned()
                .unwrap_or_default();
            node.prev = by_suffix
                .get(&node.value[..overlap])
                .cloned()
                .unwrap_or_default();
        }

        let mut graph = Self { nodes, word_size };
        let removed = graph.remove_self_loops();
        info!(
            "Overlap graph built: {} k-mers of length {}, {} edges ({} self-overlap edges removed)",
            graph.len(),
            word_size,
            graph.edge_count(),
            removed
        );
        Ok(graph)
    }

    fn remove_self_loops(&mut self) -> usize {
        let mut removed = 0;
        for id in 0..self.nodes.len() {
            let value = &self.nodes[id].value;
            let next: Vec<NodeId> = self.nodes[id]
                .next
                .iter()
                .copied()
                .filter(|&other| self.nodes[other].value != *value)
                .collect();
            let prev: Vec<NodeId> = self.nodes[id]
                .prev
                .iter()
                .copied()
                .filter(|&other| self.nodes[other].value != *value)
                .collect();
            let dropped = self.nodes[id].next.len() - next.len();
            if dropped > 0 {
                debug!("Dropped {} self-overlap edges on {}", dropped, value);
            }
            removed += dropped;
            let node = &mut self.nodes[id];
            node.next = next;
            node.prev = prev;
        }
        removed
    }

    /// Length `k` shared by all input k-mers.
    #[inline]
    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Overlap required between adjacent k-mers, `k - 1`.
    #[inline]
    pub fn overlap_len(&self) -> usize {
        self.word_size - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Panics on a dangling id; ids only come from this graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Number of outgoing edges across every node, consumed ones included.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.next.len()).sum()
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes[from].next.contains(&to)
    }

    /// The only successor of `id`, if it has exactly one.
    pub fn sole_successor(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id].next.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// The only predecessor of `id`, if it has exactly one.
    pub fn sole_predecessor(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id].prev.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Record `from -> to`, deduplicating each side by value.
    ///
    /// `to` joins `from.next` unless `from` already has a successor with the
    /// same value; `from` joins `to.prev` unless `to` already has a
    /// predecessor with the same value. Returns whether `from.next` grew.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let nodes = &self.nodes;
        let successor_known = nodes[from]
            .next
            .iter()
            .any(|&next| nodes[next].value == nodes[to].value);
        let predecessor_known = nodes[to]
            .prev
            .iter()
            .any(|&prev| nodes[prev].value == nodes[from].value);

        if !predecessor_known {
            self.nodes[to].prev.push(from);
        }
        if successor_known {
            return false;
        }
        self.nodes[from].next.push(to);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(graph: &OverlapGraph, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| graph.node(id).value().to_string()).collect()
    }

    #[test]
    fn links_suffix_to_prefix() {
        let graph = OverlapGraph::build(&["ABC", "BCD", "CDE"]).unwrap();
        assert_eq!(graph.word_size(), 3);
        assert_eq!(graph.node(0).next(), &[1]);
        assert_eq!(graph.node(1).next(), &[2]);
        assert!(graph.node(2).next().is_empty());
        assert!(graph.node(0).prev().is_empty());
        assert_eq!(graph.node(2).prev(), &[1]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn neighbour_order_follows_input_order() {
        let graph = OverlapGraph::build(&["BCE", "ABC", "BCD", "XAB"]).unwrap();
        assert_eq!(values(&graph, graph.node(1).next()), vec!["BCE", "BCD"]);
        assert_eq!(values(&graph, graph.node(0).prev()), vec!["ABC"]);
        assert_eq!(values(&graph, graph.node(1).prev()), vec!["XAB"]);
    }

    #[test]
    fn self_overlapping_kmer_has_no_self_loop() {
        let graph = OverlapGraph::build(&["AAA", "AAB"]).unwrap();
        assert!(!graph.has_edge(0, 0));
        assert_eq!(graph.node(0).next(), &[1]);
        assert!(graph.node(0).prev().is_empty());
        assert_eq!(graph.node(1).prev(), &[0]);
    }

    #[test]
    fn duplicate_self_overlapping_kmers_are_not_linked() {
        let graph = OverlapGraph::build(&["AAA", "AAA"]).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node(0).prev().is_empty());
        assert!(graph.node(1).prev().is_empty());
    }

    #[test]
    fn rejects_empty_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            OverlapGraph::build(&empty),
            Err(InputError::Empty)
        ));
    }

    #[test]
    fn rejects_inconsistent_lengths() {
        let err = OverlapGraph::build(&["ABC", "BCDE", "CDE"]).unwrap_err();
        match err {
            InputError::InconsistentLineLength {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_single_character_kmers() {
        assert!(matches!(
            OverlapGraph::build(&["A", "C"]),
            Err(InputError::KmerTooShort { length: 1 })
        ));
    }

    #[test]
    fn rejects_non_ascii_kmers() {
        assert!(matches!(
            OverlapGraph::build(&["ABC", "Bé"]),
            Err(InputError::NonAscii { line: 2 })
        ));
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut graph = OverlapGraph::build(&["ABC", "XYZ"]).unwrap();
        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(0, 1));
        assert_eq!(graph.node(0).next(), &[1]);
        assert_eq!(graph.node(1).prev(), &[0]);
    }

    #[test]
    fn add_edge_skips_successor_with_known_value() {
        let mut graph = OverlapGraph::build(&["ABC", "CXY", "CXY"]).unwrap();
        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(0, 2));
        assert_eq!(graph.node(0).next(), &[1]);
        // Each side deduplicates on its own, so the duplicate still records ABC.
        assert_eq!(graph.node(2).prev(), &[0]);
    }
}
