//! Overlap relaxation: re-links contigs under progressively shorter overlaps.
//!
//! Once chains are compressed, contigs that belong together may only share a
//! short overlap. Step `offset` compares the trailing `k-1-offset` characters
//! of each contig with the leading `k-1-offset` characters of every other and
//! adds the edges that match. Edges are only ever added, so the edge set
//! after step `offset + 1` contains the edge set after step `offset`.

use std::collections::HashMap;

use log::{debug, warn};

use crate::graph::{NodeId, OverlapGraph};

/// Overlap window compared at relaxation step `offset`, or `None` past the last step.
#[inline]
pub fn window_len(graph: &OverlapGraph, offset: usize) -> Option<usize> {
    graph.overlap_len().checked_sub(offset)
}

/// Add every edge among `contigs` whose relaxed overlap matches at `offset`.
///
/// Step 0 is the identity: full `k-1` overlaps already hold after compression.
/// Contigs are never linked to themselves or to a contig with an identical
/// value, and a neighbour is skipped when one with the same value is already
/// listed. Returns the number of successors added.
pub fn relax_overlaps(graph: &mut OverlapGraph, contigs: &[NodeId], offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    let Some(window) = window_len(graph, offset) else {
        warn!(
            "Relaxation offset {} exceeds overlap length {}; nothing to do",
            offset,
            graph.overlap_len()
        );
        return 0;
    };

    let candidates: Vec<(NodeId, NodeId)> = {
        let mut by_prefix: HashMap<&str, Vec<NodeId>> = HashMap::new();
        for &id in contigs {
            let value = graph.node(id).value();
            by_prefix.entry(&value[..window]).or_default().push(id);
        }

        let mut pairs = Vec::new();
        for &id in contigs {
            let value = graph.node(id).value();
            let suffix = &value[value.len() - window..];
            if let Some(targets) = by_prefix.get(suffix) {
                for &target in targets {
                    if target != id && graph.node(target).value() != value {
                        pairs.push((id, target));
                    }
                }
            }
        }
        pairs
    };

    let mut added = 0;
    for (from, to) in candidates {
        if graph.add_edge(from, to) {
            added += 1;
        }
    }
    debug!(
        "Relaxation step {} (window {}): {} new edges",
        offset, window, added
    );
    added
}
