//! End-to-end assembly: build, compress, then relax and enumerate step by step.

use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::compress::merge_all;
use crate::graph::{NodeId, OverlapGraph};
use crate::input::InputError;
use crate::paths::{enumerate_sources, find_sources};
use crate::relax::relax_overlaps;
use crate::report::GraphDump;

/// Environment variable that switches on the diagnostic graph dump.
pub const DEBUG_ENV_VAR: &str = "DNA_DEBUG";

/// Options that govern one assembly run.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyConfig {
    /// Only sequences at least this long are reported.
    pub min_output_len: usize,
    /// Skip sources that have no successors.
    pub require_successor: bool,
    /// Enumerate independent sources on a thread pool.
    pub use_threads: bool,
    /// Worker count when threading is enabled.
    pub max_workers: usize,
    /// Print the adjacency list after every phase to stdout.
    pub debug_dump: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            min_output_len: 0,
            require_successor: false,
            use_threads: false,
            max_workers: 1,
            debug_dump: false,
        }
    }
}

impl AssemblyConfig {
    /// Whether `DNA_DEBUG=1` is set in the environment.
    pub fn debug_from_env() -> bool {
        std::env::var(DEBUG_ENV_VAR).map_or(false, |v| v == "1")
    }
}

/// One assembled sequence, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Relaxation step that produced it.
    pub step: usize,
    /// Contig the path started from.
    pub source: NodeId,
    pub sequence: String,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.len(), self.sequence)
    }
}

/// Final state of a run: the graph after the last relaxation step, its
/// contigs, and every qualifying sequence in emission order.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub graph: OverlapGraph,
    pub contigs: Vec<NodeId>,
    pub solutions: Vec<Solution>,
}

/// Run the whole pipeline over an in-memory k-mer set.
///
/// Solutions are reported once per (step, source, path); identical sequences
/// found at different steps or from different sources are all kept.
pub fn assemble<S: AsRef<str>>(
    kmers: &[S],
    config: &AssemblyConfig,
) -> Result<Assembly, InputError> {
    let mut graph = OverlapGraph::build(kmers)?;
    if config.debug_dump {
        let all: Vec<NodeId> = (0..graph.len()).collect();
        print!("{}", GraphDump::new(&graph, &all));
    }

    let contigs = merge_all(&mut graph);
    if config.debug_dump {
        println!("Merging...");
        print!("{}", GraphDump::new(&graph, &contigs));
    }

    let mut solutions = Vec::new();
    for offset in 0..graph.word_size() {
        relax_overlaps(&mut graph, &contigs, offset);
        let sources = find_sources(&graph, &contigs, config.require_successor);
        debug!("Step {}: {} sources", offset, sources.len());
        if config.debug_dump {
            println!("Iteration {}", offset);
            print!("{}", GraphDump::new(&graph, &contigs));
            println!("Started..");
            for &source in &sources {
                println!("{}", graph.node(source).value());
            }
        }

        let enumerated =
            enumerate_sources(&graph, &sources, config.use_threads, config.max_workers);
        for (source, sequences) in enumerated {
            solutions.extend(
                sequences
                    .into_iter()
                    .filter(|sequence| sequence.len() >= config.min_output_len)
                    .map(|sequence| Solution {
                        step: offset,
                        source,
                        sequence,
                    }),
            );
        }
    }

    info!(
        "Assembly finished: {} contigs, {} edges, {} solutions of length >= {}",
        contigs.len(),
        graph.edge_count(),
        solutions.len(),
        config.min_output_len
    );
    Ok(Assembly {
        graph,
        contigs,
        solutions,
    })
}
