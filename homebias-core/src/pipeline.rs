use crate::error::Result;
use crate::graph::{GraphBuilder, GraphDocument, InfluenceSource};
use crate::pairwise::{PairwiseDistanceRow, PairwiseOptions, compute_pairwise, write_pairwise_csv};
use crate::ranking::{RankingTable, SiteCodeTable, encode};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

pub const PAIRS_FILE_PREFIX: &str = "home_bias";
pub const GRAPH_FILE_PREFIX: &str = "graph_data";

/// Options for an end-to-end run from rankings to graph
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub ranking_path: PathBuf,
    /// Also persist the intermediate pairwise table here
    pub pairs_output: Option<PathBuf>,
    pub graph_output: PathBuf,
    pub pairwise: PairwiseOptions,
    pub influence: InfluenceSource,
    pub pretty: bool,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub site_codes: SiteCodeTable,
    pub pairs: Vec<PairwiseDistanceRow>,
    pub graph: GraphDocument,
}

/// Date-stamped file name, e.g. `home_bias_2019-06-15.csv`
pub fn dated_file_name(prefix: &str, extension: &str, date: NaiveDate) -> String {
    format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), extension)
}

/// Run every stage in-process on an already loaded ranking table
pub fn build_graph_from_rankings(
    table: &RankingTable,
    pairwise: &PairwiseOptions,
    influence: &InfluenceSource,
) -> Result<PipelineOutcome> {
    let (site_codes, sequences) = encode(table);
    let pairs = compute_pairwise(&sequences, pairwise);
    let graph = GraphBuilder::new()
        .with_influence(influence.clone())
        .build(&pairs)?;

    Ok(PipelineOutcome {
        site_codes,
        pairs,
        graph,
    })
}

pub fn run_pipeline(options: &PipelineOptions) -> Result<PipelineOutcome> {
    info!("Loading rankings from {}", options.ranking_path.display());
    let table = RankingTable::from_path(&options.ranking_path)?;

    let outcome = build_graph_from_rankings(&table, &options.pairwise, &options.influence)?;

    if let Some(ref pairs_path) = options.pairs_output {
        write_pairwise_csv(&outcome.pairs, pairs_path)?;
        info!("Pairwise table written to {}", pairs_path.display());
    }

    outcome
        .graph
        .write_json(&options.graph_output, options.pretty)?;
    info!("Graph written to {}", options.graph_output.display());

    Ok(outcome)
}
