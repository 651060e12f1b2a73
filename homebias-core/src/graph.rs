// Node/link graph assembly for force-directed visualization

use crate::error::{HomeBiasError, Result};
use crate::pairwise::PairwiseDistanceRow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Range used when influence values are drawn from a seeded generator
pub const SEEDED_INFLUENCE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub character: String,
    pub id: usize,
    pub influence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    pub weight: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the document to `path`, replacing anything already there
    pub fn write_json(&self, path: &Path, pretty: bool) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.to_json(pretty)?.as_bytes())?;
        writer.flush()?;
        debug!(
            "Wrote graph with {} nodes and {} links to {}",
            self.nodes.len(),
            self.links.len(),
            path.display()
        );
        Ok(())
    }

    pub fn node(&self, country: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.character == country)
    }

    pub fn link(&self, source: usize, target: usize) -> Option<&GraphLink> {
        let (source, target) = (source.min(target), source.max(target));
        self.links
            .iter()
            .find(|link| link.source == source && link.target == target)
    }
}

/// Where each node's `influence` attribute comes from
#[derive(Debug, Clone, PartialEq)]
pub enum InfluenceSource {
    /// Every node gets the same value
    Constant(u32),
    /// Values drawn from `SEEDED_INFLUENCE_RANGE` in node order
    Seeded { seed: u64 },
    /// Explicit per-country values
    Table(BTreeMap<String, u32>),
}

impl Default for InfluenceSource {
    fn default() -> Self {
        InfluenceSource::Constant(1)
    }
}

impl InfluenceSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_csv(file, &path.display().to_string())
    }

    /// Read a headered `country,influence` CSV
    pub fn read_csv<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| HomeBiasError::MissingColumn {
                    column: name.to_string(),
                    source_name: source_name.to_string(),
                })
        };
        let country_idx = column("country")?;
        let influence_idx = column("influence")?;

        let mut values = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            let country = record.get(country_idx).unwrap_or_default();
            let raw = record.get(influence_idx).unwrap_or_default();
            let value = raw.parse().map_err(|_| HomeBiasError::InvalidInfluence {
                country: country.to_string(),
                value: raw.to_string(),
            })?;
            values.insert(country.to_string(), value);
        }

        Ok(InfluenceSource::Table(values))
    }

    fn assign(&self, countries: &[&str]) -> Result<Vec<u32>> {
        match self {
            InfluenceSource::Constant(value) => Ok(vec![*value; countries.len()]),
            InfluenceSource::Seeded { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(countries
                    .iter()
                    .map(|_| rng.gen_range(SEEDED_INFLUENCE_RANGE))
                    .collect())
            }
            InfluenceSource::Table(values) => countries
                .iter()
                .map(|country| {
                    values
                        .get(*country)
                        .copied()
                        .ok_or_else(|| HomeBiasError::MissingInfluence(country.to_string()))
                })
                .collect(),
        }
    }
}

/// Distinct countries in first-seen order, scanning `country1` then
/// `country2` of each row.
pub fn node_order(rows: &[PairwiseDistanceRow]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for row in rows {
        for country in [row.country1.as_str(), row.country2.as_str()] {
            if seen.insert(country) {
                order.push(country);
            }
        }
    }
    order
}

pub struct GraphBuilder {
    influence: InfluenceSource,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            influence: InfluenceSource::default(),
        }
    }

    pub fn with_influence(mut self, influence: InfluenceSource) -> Self {
        self.influence = influence;
        self
    }

    /// Build the node/link document from a dense pairwise table.
    ///
    /// Every pair of distinct nodes must have a row (in either orientation),
    /// otherwise `HomeBiasError::MissingPair` is returned.
    pub fn build(&self, rows: &[PairwiseDistanceRow]) -> Result<GraphDocument> {
        let countries = node_order(rows);
        let influence = self.influence.assign(&countries)?;

        let nodes: Vec<GraphNode> = countries
            .iter()
            .zip(influence)
            .enumerate()
            .map(|(id, (country, influence))| GraphNode {
                character: country.to_string(),
                id,
                influence,
            })
            .collect();

        let distances: HashMap<(&str, &str), u64> = rows
            .iter()
            .map(|row| {
                (
                    (row.country1.as_str(), row.country2.as_str()),
                    row.pairwise_levenshtein,
                )
            })
            .collect();

        let mut links = Vec::with_capacity(countries.len() * countries.len().saturating_sub(1) / 2);
        for (i, country1) in countries.iter().enumerate() {
            for (j, country2) in countries.iter().enumerate().skip(i + 1) {
                let weight = distances
                    .get(&(*country1, *country2))
                    .or_else(|| distances.get(&(*country2, *country1)))
                    .copied()
                    .ok_or_else(|| HomeBiasError::MissingPair {
                        country1: country1.to_string(),
                        country2: country2.to_string(),
                    })?;
                links.push(GraphLink {
                    source: i,
                    target: j,
                    weight,
                });
            }
        }

        info!("Built graph with {} nodes and {} links", nodes.len(), links.len());
        Ok(GraphDocument { nodes, links })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
