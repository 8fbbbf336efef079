use std::io::{BufRead, Write};

pub mod error;
pub mod ingest;
pub mod matrix;
pub mod ranking;
pub mod shortest_path;
pub mod stream;
pub mod vertex_heap;

#[cfg(test)]
mod testing;

pub use crate::error::{Error, Result};
pub use crate::ingest::{Ingest, IngestStats, Options, Outcome};
pub use crate::matrix::AdjacencyMatrix;
pub use crate::ranking::{RankEntry, SnapshotOrder, TopK};
pub use crate::shortest_path::{PathScore, ShortestPath};
pub use crate::stream::{Command, LineReader, Params, RecordSource};

// vertex type; an index into a graph's adjacency matrix
pub type V = u32;

// edge weight; 0 means "no edge"
pub type Weight = u32;

// tentative or final distance from the source
pub type Distance = u64;

// sum of distances for one graph
pub type Score = u64;

// sequence number of a graph record, in arrival order
pub type GraphId = u64;

/// Distance of a vertex that has not been reached from the source.
pub const UNREACHED: Distance = !0u64;

/// Reads a whole command stream (header, then commands) from `input` and writes one
/// line per ranking query to `output`.
pub fn rank_stream<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    options: Options,
) -> Result<IngestStats> {
    let mut reader = LineReader::new(input);
    let params = reader.read_params()?;
    let mut ingest = Ingest::new(params, options);
    ingest.run(&mut reader, output)?;
    Ok(ingest.stats().clone())
}
