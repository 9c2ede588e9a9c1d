//! overlap_assembler library
//!
//! Reconstructs longer sequences from a set of equal-length overlapping
//! k-mers: overlap graph construction, chain compression into contigs,
//! stepwise overlap relaxation, and cycle-safe path enumeration from sources.

pub mod compress;
pub mod graph;
pub mod input;
pub mod paths;
pub mod pipeline;
pub mod relax;
pub mod report;

pub use compress::{merge, merge_all};
pub use graph::{validate_kmers, Node, NodeId, OverlapGraph};
pub use input::{parse_threshold, read_kmers, InputError};
pub use paths::{enumerate_paths, enumerate_sources, find_sources};
pub use pipeline::{assemble, Assembly, AssemblyConfig, Solution};
pub use relax::relax_overlaps;
pub use report::{GraphDump, GraphExport};
