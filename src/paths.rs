//! Source detection and path enumeration over the contig graph.

use log::{debug, trace, warn};

use crate::graph::{NodeId, OverlapGraph};

/// Contigs with no predecessors, in `contigs` order.
///
/// With `require_successor`, isolated contigs (no successors either) are
/// skipped as well.
pub fn find_sources(
    graph: &OverlapGraph,
    contigs: &[NodeId],
    require_successor: bool,
) -> Vec<NodeId> {
    contigs
        .iter()
        .copied()
        .filter(|&id| {
            let node = graph.node(id);
            node.prev().is_empty() && (!require_successor || !node.next().is_empty())
        })
        .collect()
}

/// Nodes on the path currently being extended. Owned by one enumeration.
struct PathMarks {
    on_path: Vec<bool>,
}

impl PathMarks {
    fn new(len: usize) -> Self {
        Self {
            on_path: vec![false; len],
        }
    }

    #[inline]
    fn contains(&self, id: NodeId) -> bool {
        self.on_path[id]
    }

    #[inline]
    fn set(&mut self, id: NodeId, value: bool) {
        self.on_path[id] = value;
    }

    fn is_clear(&self) -> bool {
        !self.on_path.iter().any(|&marked| marked)
    }
}

struct Frame {
    node: NodeId,
    sequence: String,
    cursor: usize,
}

/// Every sequence spelled by a depth-first walk from `source`.
///
/// Each edge appends the successor's value minus its leading `k-1`
/// characters. A leaf yields the accumulated sequence; an edge back onto the
/// current path yields the sequence so far and is not followed, so every
/// path visits each node at most once.
pub fn enumerate_paths(graph: &OverlapGraph, source: NodeId) -> Vec<String> {
    let overlap = graph.overlap_len();
    let mut marks = PathMarks::new(graph.len());
    let mut solutions = Vec::new();

    marks.set(source, true);
    let mut stack = vec![Frame {
        node: source,
        sequence: graph.node(source).value().to_string(),
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let successors = graph.node(frame.node).next();
        if successors.is_empty() {
            solutions.push(frame.sequence.clone());
        }
        let Some(&succ) = successors.get(frame.cursor) else {
            marks.set(frame.node, false);
            stack.pop();
            continue;
        };
        frame.cursor += 1;

        if marks.contains(succ) {
            trace!("Cycle back onto {} closes a branch", succ);
            solutions.push(frame.sequence.clone());
            continue;
        }

        let mut sequence = String::with_capacity(frame.sequence.len() + graph.word_size());
        sequence.push_str(&frame.sequence);
        sequence.push_str(graph.node(succ).tail(overlap));
        marks.set(succ, true);
        stack.push(Frame {
            node: succ,
            sequence,
            cursor: 0,
        });
    }

    debug_assert!(marks.is_clear());
    debug!(
        "Source {} yielded {} sequences",
        source,
        solutions.len()
    );
    solutions
}

/// Enumerate from each source in order, optionally across a rayon pool.
///
/// Every enumeration owns its own path marks, so sources are independent.
pub fn enumerate_sources(
    graph: &OverlapGraph,
    sources: &[NodeId],
    use_threads: bool,
    max_workers: usize,
) -> Vec<(NodeId, Vec<String>)> {
    let run = |&source: &NodeId| (source, enumerate_paths(graph, source));

    if use_threads {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            use rayon::ThreadPoolBuilder;
            match ThreadPoolBuilder::new()
                .num_threads(max_workers.max(1))
                .build()
            {
                Ok(pool) => return pool.install(|| sources.par_iter().map(run).collect()),
                Err(err) => {
                    warn!("Failed to build rayon thread pool ({err}); enumerating sequentially")
                }
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!(
                "Threaded enumeration requested with {} workers, but the 'parallel' feature is not enabled; falling back to sequential mode",
                max_workers
            );
        }
    }
    sources.iter().map(run).collect()
}
