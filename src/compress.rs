//! Chain compression: collapses unbranched one-in-one-out runs into contigs.

use log::{debug, info, trace};

use crate::graph::{NodeId, OverlapGraph};

/// Walk left from `id` to the earliest node of its unbranched run.
///
/// A closed cycle walks back to `id` itself; then `id` is the start.
fn chain_start(graph: &OverlapGraph, id: NodeId) -> NodeId {
    let mut current = id;
    while let Some(pred) = graph.sole_predecessor(current) {
        if pred == id {
            return id;
        }
        let pred_node = graph.node(pred);
        if pred_node.consumed || pred_node.compressed {
            break;
        }
        if graph.sole_successor(pred) != Some(current) {
            break;
        }
        current = pred;
    }
    current
}

/// Compress the unbranched run containing `id` into its first node.
///
/// Each absorbed successor contributes its value minus the leading `k-1`
/// characters and hands over its outgoing edges; it is then marked consumed.
/// Successors of the finished contig have their back-reference to the last
/// absorbed node redirected to the contig, and the contig is marked compressed.
pub fn merge(graph: &mut OverlapGraph, id: NodeId) {
    let head = chain_start(graph, id);
    if head != id {
        trace!("Run containing {} starts at {}", id, head);
    }

    let overlap = graph.overlap_len();
    let mut tail = head;
    while let Some(succ) = graph.sole_successor(head) {
        let succ_node = graph.node(succ);
        if succ == head
            || succ_node.consumed
            || succ_node.compressed
            || graph.sole_predecessor(succ) != Some(tail)
        {
            break;
        }

        let extension = succ_node.tail(overlap).to_string();
        let adopted = succ_node.next.clone();
        let head_node = graph.node_mut(head);
        head_node.value.push_str(&extension);
        head_node.next = adopted;
        graph.node_mut(succ).consumed = true;
        tail = succ;
    }

    if tail != head {
        let successors = graph.node(head).next.clone();
        for succ in successors {
            for pred in graph.node_mut(succ).prev.iter_mut() {
                if *pred == tail {
                    *pred = head;
                }
            }
        }
        debug!(
            "Merged run {}..{} into contig of length {}",
            head,
            tail,
            graph.node(head).value.len()
        );
    }

    graph.node_mut(head).compressed = true;
}

/// Compress the whole graph and return the contigs in arena order.
pub fn merge_all(graph: &mut OverlapGraph) -> Vec<NodeId> {
    let mut contigs = Vec::new();
    let mut cursor = 0;
    while cursor < graph.len() {
        let node = graph.node(cursor);
        if node.compressed {
            contigs.push(cursor);
            cursor += 1;
        } else if node.consumed {
            cursor += 1;
        } else {
            // Either compresses `cursor` or folds it into an earlier-starting run.
            merge(graph, cursor);
        }
    }
    info!(
        "Compressed {} k-mers into {} contigs",
        graph.len(),
        contigs.len()
    );
    contigs
}
