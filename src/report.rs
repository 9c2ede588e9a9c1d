//! Human-readable graph dumps and the JSON graph export.

use std::fmt;

use serde::Serialize;

use crate::graph::{NodeId, OverlapGraph};

/// Adjacency listing, one line per node: `i: value -> succ ...  <- pred ...`.
pub struct GraphDump<'a> {
    graph: &'a OverlapGraph,
    ids: &'a [NodeId],
}

impl<'a> GraphDump<'a> {
    pub fn new(graph: &'a OverlapGraph, ids: &'a [NodeId]) -> Self {
        Self { graph, ids }
    }
}

impl fmt::Display for GraphDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, &id) in self.ids.iter().enumerate() {
            let node = self.graph.node(id);
            write!(f, "{}: {} -> ", idx, node.value())?;
            for &next in node.next() {
                write!(f, "{} ", self.graph.node(next).value())?;
            }
            write!(f, " <- ")?;
            for &prev in node.prev() {
                write!(f, "{} ", self.graph.node(prev).value())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ExportNode<'a> {
    pub id: NodeId,
    pub sequence: &'a str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ExportEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Serialisable snapshot of the contig graph.
#[derive(Debug, Serialize)]
pub struct GraphExport<'a> {
    pub word_size: usize,
    pub nodes: Vec<ExportNode<'a>>,
    pub edges: Vec<ExportEdge>,
}

impl<'a> GraphExport<'a> {
    pub fn new(graph: &'a OverlapGraph, contigs: &[NodeId]) -> Self {
        let nodes = contigs
            .iter()
            .map(|&id| ExportNode {
                id,
                sequence: graph.node(id).value(),
            })
            .collect();
        let edges = contigs
            .iter()
            .flat_map(|&source| {
                graph
                    .node(source)
                    .next()
                    .iter()
                    .map(move |&target| ExportEdge { source, target })
            })
            .collect();
        Self {
            word_size: graph.word_size(),
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::merge_all;

    #[test]
    fn dump_lists_successors_and_predecessors_by_value() {
        let graph = OverlapGraph::build(&["ABC", "BCD", "BCE"]).unwrap();
        let ids: Vec<NodeId> = (0..graph.len()).collect();
        let dump = GraphDump::new(&graph, &ids).to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "0: ABC -> BCD BCE  <- ");
        assert_eq!(lines[1], "1: BCD ->  <- ABC ");
        assert_eq!(lines[2], "2: BCE ->  <- ABC ");
    }

    #[test]
    fn export_serialises_contigs_and_edges() {
        let mut graph = OverlapGraph::build(&["ABC", "BCD", "CDE", "CDF"]).unwrap();
        let contigs = merge_all(&mut graph);
        let export = GraphExport::new(&graph, &contigs);
        assert_eq!(
            export.edges,
            vec![
                ExportEdge { source: 0, target: 2 },
                ExportEdge { source: 0, target: 3 },
            ]
        );

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["word_size"], 3);
        assert_eq!(json["nodes"][0]["sequence"], "ABCD");
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    }
}
