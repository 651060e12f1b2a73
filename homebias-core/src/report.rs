// Per-country distance summaries and report rendering

use crate::graph::node_order;
use crate::pairwise::PairwiseDistanceRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Distance bounds for one country against every other country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryBounds {
    pub country: String,
    pub nearest: String,
    pub nearest_distance: u64,
    pub farthest: String,
    pub farthest_distance: u64,
    pub mean_distance: f64,
    pub pair_count: usize,
}

/// Summarize each country's distances, in graph node order.
///
/// Ties keep the first neighbour encountered in the table.
pub fn summarize(rows: &[PairwiseDistanceRow]) -> Vec<CountryBounds> {
    node_order(rows)
        .into_iter()
        .filter_map(|country| {
            let neighbours: Vec<(&str, u64)> = rows
                .iter()
                .filter_map(|row| {
                    if row.country1 == country {
                        Some((row.country2.as_str(), row.pairwise_levenshtein))
                    } else if row.country2 == country {
                        Some((row.country1.as_str(), row.pairwise_levenshtein))
                    } else {
                        None
                    }
                })
                .collect();

            let (first, rest) = neighbours.split_first()?;
            let mut nearest = *first;
            let mut farthest = *first;
            for &(other, distance) in rest {
                if distance < nearest.1 {
                    nearest = (other, distance);
                }
                if distance > farthest.1 {
                    farthest = (other, distance);
                }
            }
            let total: u64 = neighbours.iter().map(|(_, d)| d).sum();

            Some(CountryBounds {
                country: country.to_string(),
                nearest: nearest.0.to_string(),
                nearest_distance: nearest.1,
                farthest: farthest.0.to_string(),
                farthest_distance: farthest.1,
                mean_distance: total as f64 / neighbours.len() as f64,
                pair_count: neighbours.len(),
            })
        })
        .collect()
}

pub fn generate_text_report(bounds: &[CountryBounds]) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                         HOMEBIAS DISTANCE SUMMARY\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Countries:    {}\n", bounds.len()));
    if let Some(closest) = bounds.iter().min_by_key(|b| b.nearest_distance) {
        report.push_str(&format!(
            "Closest pair: {} <-> {} ({})\n",
            closest.country, closest.nearest, closest.nearest_distance
        ));
    }
    let widest = bounds.iter().reduce(|best, b| {
        if b.farthest_distance > best.farthest_distance {
            b
        } else {
            best
        }
    });
    if let Some(furthest) = widest {
        report.push_str(&format!(
            "Widest pair:  {} <-> {} ({})\n",
            furthest.country, furthest.farthest, furthest.farthest_distance
        ));
    }
    report.push('\n');

    if bounds.is_empty() {
        report.push_str("  (no pairs)\n\n");
    } else {
        report.push_str(RULE);
        report.push('\n');
        report.push_str("PER COUNTRY\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        let width = bounds.iter().map(|b| b.country.len()).max().unwrap_or(0);
        for b in bounds {
            report.push_str(&format!(
                "  {:<width$}  nearest {} ({})  farthest {} ({})  mean {:.2}\n",
                b.country,
                b.nearest,
                b.nearest_distance,
                b.farthest,
                b.farthest_distance,
                b.mean_distance,
                width = width
            ));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push('\n');
    report.push_str("\nGenerated by Homebias\n");

    report
}

pub fn generate_json_report(bounds: &[CountryBounds]) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Homebias",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "total_countries": bounds.len(),
                "total_pairs": bounds.iter().map(|b| b.pair_count).sum::<usize>() / 2
            },
            "countries": bounds
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
