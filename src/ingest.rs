use crate::error::{Error, Result};
use crate::matrix::AdjacencyMatrix;
use crate::ranking::{RankEntry, SnapshotOrder, TopK};
use crate::shortest_path::{source_row_lower_bound, ShortestPath};
use crate::stream::{write_ranking, Command, Params, RecordSource};
use crate::GraphId;
use log::{debug, info, warn};
use std::io::Write;

/// Knobs that change how records are processed. None of them change which graphs end
/// up in the ranking, only how much work is done and how queries are reported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Skip the rest of a record when its source row alone proves it cannot be admitted.
    pub prune_rows: bool,
    /// Stop shortest-path runs once the partial score reaches the worst admitted score.
    pub prune_paths: bool,
    pub order: SnapshotOrder,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prune_rows: true,
            prune_paths: true,
            order: SnapshotOrder::Heap,
        }
    }
}

/// What happened to one graph record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Admitted,
    /// Fully scored, but not better than the worst admitted graph.
    Rejected,
    /// Abandoned after the source row; the remaining rows were not parsed.
    SkippedRows,
    /// Shortest-path run stopped early at the threshold.
    PrunedPath,
    /// The record could not be read and was abandoned.
    Malformed,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IngestStats {
    pub records: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub skipped_rows: u64,
    pub pruned_paths: u64,
    pub malformed: u64,
    pub queries: u64,
    pub unknown_commands: u64,
}

/// Owns the ranking and the per-record buffers, and drives records through them.
///
/// Graph ids are assigned in arrival order, whether or not the record is admitted.
pub struct Ingest {
    params: Params,
    options: Options,
    matrix: AdjacencyMatrix,
    engine: ShortestPath,
    ranking: TopK,
    next_id: GraphId,
    stats: IngestStats,
}

impl Ingest {
    pub fn new(params: Params, options: Options) -> Self {
        Self {
            params,
            options,
            matrix: AdjacencyMatrix::new(params.num_verts),
            engine: ShortestPath::with_capacity(params.num_verts),
            ranking: TopK::new(params.capacity),
            next_id: 0,
            stats: IngestStats::default(),
        }
    }

    pub fn ranking(&self) -> &TopK {
        &self.ranking
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Reads one graph record from `source` and offers it to the ranking.
    ///
    /// A record that cannot be read is abandoned (its id is still consumed) and reported
    /// as `Outcome::Malformed`. Only errors that spoil the whole stream are returned.
    pub fn add_graph<S: RecordSource + ?Sized>(&mut self, source: &mut S) -> Result<Outcome> {
        let graph_id = self.next_id;
        self.next_id += 1;
        self.stats.records += 1;

        let outcome = match self.score_record(graph_id, source) {
            Ok(outcome) => outcome,
            Err(e) if e.is_record_local() => {
                warn!("g{}: abandoned: {}", graph_id, e);
                Outcome::Malformed
            }
            Err(e) => return Err(e),
        };

        match outcome {
            Outcome::Admitted => self.stats.admitted += 1,
            Outcome::Rejected => self.stats.rejected += 1,
            Outcome::SkippedRows => self.stats.skipped_rows += 1,
            Outcome::PrunedPath => self.stats.pruned_paths += 1,
            Outcome::Malformed => self.stats.malformed += 1,
        }
        Ok(outcome)
    }

    fn score_record<S: RecordSource + ?Sized>(
        &mut self,
        graph_id: GraphId,
        source: &mut S,
    ) -> Result<Outcome> {
        let nv = self.params.num_verts;
        let threshold = self.ranking.current_worst_score();
        self.matrix.clear();

        for from in 0..nv {
            if let Err(e) = source.next_matrix_row(self.matrix.row_mut(from)) {
                if let Error::MalformedRow { .. } = e {
                    // The bad line has been consumed; drop the rest of the record.
                    source.skip_remaining_rows(nv - from - 1)?;
                }
                return Err(e);
            }

            if from == 0 && self.options.prune_rows {
                if let Some(worst) = threshold {
                    let bound = source_row_lower_bound(self.matrix.row(0));
                    if bound >= worst {
                        debug!(
                            "g{}: source row bound {} >= worst {}, skipping {} rows",
                            graph_id,
                            bound,
                            worst,
                            nv - 1
                        );
                        source.skip_remaining_rows(nv - 1)?;
                        return Ok(Outcome::SkippedRows);
                    }
                }
            }
        }

        let path_threshold = if self.options.prune_paths {
            threshold
        } else {
            None
        };
        let result = self.engine.run(&self.matrix, path_threshold);
        if result.pruned {
            debug!("g{}: pruned at partial score {}", graph_id, result.score);
            return Ok(Outcome::PrunedPath);
        }

        let entry = RankEntry {
            graph_id,
            score: result.score,
        };
        if self.ranking.admit(entry) {
            Ok(Outcome::Admitted)
        } else {
            debug!("g{}: score {} rejected", graph_id, result.score);
            Ok(Outcome::Rejected)
        }
    }

    /// Ids of the currently admitted graphs, in the configured order.
    pub fn query(&mut self) -> Vec<GraphId> {
        self.stats.queries += 1;
        self.ranking.snapshot(self.options.order)
    }

    /// Processes commands until end of input, writing one line per query to `output`.
    pub fn run<S: RecordSource + ?Sized, W: Write + ?Sized>(
        &mut self,
        source: &mut S,
        output: &mut W,
    ) -> Result<()> {
        loop {
            match source.next_command() {
                Ok(Command::AddGraph) => {
                    self.add_graph(source)?;
                }
                Ok(Command::Query) => {
                    let ids = self.query();
                    write_ranking(output, &ids)?;
                }
                Ok(Command::EndOfInput) => break,
                Err(e) if e.is_record_local() => {
                    warn!("{}", e);
                    self.stats.unknown_commands += 1;
                }
                Err(e) => return Err(e),
            }
        }
        output.flush()?;

        let s = &self.stats;
        info!(
            "{} records: {} admitted, {} rejected, {} skipped after source row, {} pruned during search, {} malformed; {} queries, {} unknown commands",
            s.records,
            s.admitted,
            s.rejected,
            s.skipped_rows,
            s.pruned_paths,
            s.malformed,
            s.queries,
            s.unknown_commands
        );
        Ok(())
    }
}
