// Ranking table loading and site-code encoding

use crate::error::{HomeBiasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const COUNTRY_COLUMN: &str = "country_name";
pub const URL_COLUMN: &str = "url";
pub const RANK_COLUMN: &str = "rank";

/// Integer stand-in for a distinct site URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteCode(pub usize);

/// One row of the global ranking table
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRankingRow {
    pub country_name: String,
    pub url: String,
    pub rank: Option<u32>,
}

impl SiteRankingRow {
    pub fn new(country_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            country_name: country_name.into(),
            url: url.into(),
            rank: None,
        }
    }
}

/// Bijection between distinct URLs and site codes.
///
/// Codes are dense (`0..len`) and follow lexicographic URL order, so the
/// same input always yields the same numbering.
#[derive(Debug, Clone, Default)]
pub struct SiteCodeTable {
    codes: HashMap<String, SiteCode>,
    urls: Vec<String>,
}

impl SiteCodeTable {
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = urls
            .into_iter()
            .map(|url| url.as_ref().to_string())
            .collect();

        let mut table = SiteCodeTable::default();
        for (idx, url) in distinct.into_iter().enumerate() {
            table.codes.insert(url.clone(), SiteCode(idx));
            table.urls.push(url);
        }
        table
    }

    pub fn code(&self, url: &str) -> Option<SiteCode> {
        self.codes.get(url).copied()
    }

    pub fn url(&self, code: SiteCode) -> Option<&str> {
        self.urls.get(code.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Per-country ranked site codes, iterated in country-name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountrySequences {
    sequences: BTreeMap<String, Vec<SiteCode>>,
}

impl CountrySequences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: impl Into<String>, codes: Vec<SiteCode>) {
        self.sequences.insert(country.into(), codes);
    }

    pub fn get(&self, country: &str) -> Option<&[SiteCode]> {
        self.sequences.get(country).map(Vec::as_slice)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SiteCode])> {
        self.sequences
            .iter()
            .map(|(country, codes)| (country.as_str(), codes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<SiteCode>)> for CountrySequences {
    fn from_iter<I: IntoIterator<Item = (S, Vec<SiteCode>)>>(iter: I) -> Self {
        let mut sequences = CountrySequences::new();
        for (country, codes) in iter {
            sequences.insert(country, codes);
        }
        sequences
    }
}

/// The global site-ranking table as read from disk
#[derive(Debug, Clone, Default)]
pub struct RankingTable {
    rows: Vec<SiteRankingRow>,
}

impl RankingTable {
    pub fn new(rows: Vec<SiteRankingRow>) -> Self {
        Self { rows }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_csv(file, &path.display().to_string())
    }

    /// Read a headered CSV containing at least `country_name` and `url`.
    /// Other columns are ignored except `rank`, which is kept when numeric
    /// and later orders each country's sites.
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
        let country_idx = column(COUNTRY_COLUMN)?;
        let url_idx = column(URL_COLUMN)?;
        let rank_idx = headers.iter().position(|h| h == RANK_COLUMN);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(SiteRankingRow {
                country_name: record.get(country_idx).unwrap_or_default().to_string(),
                url: record.get(url_idx).unwrap_or_default().to_string(),
                rank: rank_idx
                    .and_then(|idx| record.get(idx))
                    .and_then(|value| value.parse().ok()),
            });
        }

        debug!("Read {} ranking rows from {}", rows.len(), source_name);
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SiteRankingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Assign every distinct URL a code and group codes by country.
///
/// A country whose rows all carry a rank is ordered by rank (ties keep
/// table order); otherwise its rows stay in table order.
pub fn encode(table: &RankingTable) -> (SiteCodeTable, CountrySequences) {
    let codes = SiteCodeTable::from_urls(table.rows().iter().map(|row| row.url.as_str()));

    let mut ranked: BTreeMap<String, Vec<(Option<u32>, SiteCode)>> = BTreeMap::new();
    for row in table.rows() {
        // every url in the table was registered above
        if let Some(code) = codes.code(&row.url) {
            ranked
                .entry(row.country_name.clone())
                .or_default()
                .push((row.rank, code));
        }
    }

    let grouped: BTreeMap<String, Vec<SiteCode>> = ranked
        .into_iter()
        .map(|(country, mut entries)| {
            if entries.iter().all(|(rank, _)| rank.is_some()) {
                entries.sort_by_key(|(rank, _)| *rank);
            } else if entries.iter().any(|(rank, _)| rank.is_some()) {
                debug!("{} has unranked rows; keeping table order", country);
            }
            let sequence = entries.into_iter().map(|(_, code)| code).collect();
            (country, sequence)
        })
        .collect();

    info!(
        "Encoded {} sites across {} countries",
        codes.len(),
        grouped.len()
    );

    (codes, CountrySequences { sequences: grouped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_codes_are_dense_and_sorted() {
        let table = SiteCodeTable::from_urls(["zeta.com", "alpha.com", "zeta.com", "mid.org"]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.code("alpha.com"), Some(SiteCode(0)));
        assert_eq!(table.code("mid.org"), Some(SiteCode(1)));
        assert_eq!(table.code("zeta.com"), Some(SiteCode(2)));
        assert_eq!(table.url(SiteCode(1)), Some("mid.org"));
        assert_eq!(table.code("missing.net"), None);
    }

    #[test]
    fn test_site_code_indexes_url_list() {
        let urls: Vec<String> = (0..300).map(|i| format!("site{:03}.com", i)).collect();
        let table = SiteCodeTable::from_urls(&urls);

        assert_eq!(table.len(), 300);
        assert_eq!(table.code("site299.com"), Some(SiteCode(299)));
        assert_eq!(table.url(SiteCode(256)), Some("site256.com"));
    }
}
