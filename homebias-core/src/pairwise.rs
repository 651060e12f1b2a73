// Pairwise country distances and the intermediate CSV table

use crate::distance::levenshtein;
use crate::error::{HomeBiasError, Result};
use crate::ranking::{CountrySequences, SiteCode};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Label of the aggregate row in the Alexa country rankings
pub const GLOBAL_SENTINEL: &str = "Global";

pub const PAIRWISE_COLUMNS: [&str; 3] = ["country1", "country2", "pairwise_levenshtein"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseDistanceRow {
    pub country1: String,
    pub country2: String,
    pub pairwise_levenshtein: u64,
}

impl PairwiseDistanceRow {
    pub fn new(country1: impl Into<String>, country2: impl Into<String>, distance: u64) -> Self {
        Self {
            country1: country1.into(),
            country2: country2.into(),
            pairwise_levenshtein: distance,
        }
    }
}

/// Country labels that never take part in a pair.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionRule {
    labels: BTreeSet<String>,
}

impl ExclusionRule {
    pub fn none() -> Self {
        Self {
            labels: BTreeSet::new(),
        }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, country: &str) -> bool {
        self.labels.contains(country)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ExclusionRule {
    fn default() -> Self {
        Self::from_labels([GLOBAL_SENTINEL])
    }
}

/// Options for computing the pairwise table
#[derive(Debug, Clone, Default)]
pub struct PairwiseOptions {
    pub exclusion: ExclusionRule,
    pub show_progress_bar: bool,
}

/// Compute the edit distance for every unordered pair of countries.
///
/// Countries are visited in the sequence map's order and each pair (i, j)
/// with i < j yields exactly one row.
pub fn compute_pairwise(
    sequences: &CountrySequences,
    options: &PairwiseOptions,
) -> Vec<PairwiseDistanceRow> {
    for label in options.exclusion.labels() {
        if sequences.get(label).is_some() {
            debug!("Excluding aggregate row '{}' from pairing", label);
        } else {
            warn!(
                "Exclusion label '{}' does not match any country in the rankings",
                label
            );
        }
    }

    let countries: Vec<(&str, _)> = sequences
        .iter()
        .filter(|(country, _)| !options.exclusion.is_excluded(country))
        .collect();

    let total_pairs = countries.len() * countries.len().saturating_sub(1) / 2;
    let progress_bar = if options.show_progress_bar {
        let pb = ProgressBar::new(total_pairs as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("Computing pairwise distances...");
        Some(pb)
    } else {
        None
    };

    let mut rows = Vec::with_capacity(total_pairs);
    for (i, (country1, codes1)) in countries.iter().enumerate() {
        for (country2, codes2) in countries.iter().skip(i + 1) {
            let distance = levenshtein::<SiteCode>(codes1, codes2) as u64;
            rows.push(PairwiseDistanceRow::new(*country1, *country2, distance));
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("{} pairs computed", rows.len()));
    }

    info!(
        "Computed {} pairwise distances over {} countries",
        rows.len(),
        countries.len()
    );
    rows
}

/// Write the pairwise table, replacing any previous file at `path`
pub fn write_pairwise_csv(rows: &[PairwiseDistanceRow], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_pairwise(rows, file)?;
    debug!("Wrote {} pairwise rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_pairwise<W: Write>(rows: &[PairwiseDistanceRow], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    // header is written explicitly so an empty table still round-trips
    writer.write_record(PAIRWISE_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.country1.as_str(),
            row.country2.as_str(),
            row.pairwise_levenshtein.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_pairwise_csv(path: &Path) -> Result<Vec<PairwiseDistanceRow>> {
    let file = File::open(path)?;
    read_pairwise(file, &path.display().to_string())
}

/// Read a pairwise table. Columns beyond the three required ones (for
/// example a leading index column) are ignored.
pub fn read_pairwise<R: Read>(reader: R, source_name: &str) -> Result<Vec<PairwiseDistanceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in PAIRWISE_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(HomeBiasError::MissingColumn {
                column: column.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }

    let rows = reader
        .deserialize::<PairwiseDistanceRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("Read {} pairwise rows from {}", rows.len(), source_name);
    Ok(rows)
}
