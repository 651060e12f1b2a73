// Tests for graph assembly and JSON output

use homebias_core::HomeBiasError;
use homebias_core::graph::{
    GraphBuilder, GraphDocument, GraphLink, GraphNode, InfluenceSource, SEEDED_INFLUENCE_RANGE,
    node_order,
};
use homebias_core::pairwise::PairwiseDistanceRow;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn three_country_rows() -> Vec<PairwiseDistanceRow> {
    vec![
        PairwiseDistanceRow::new("A", "B", 2),
        PairwiseDistanceRow::new("A", "C", 1),
        PairwiseDistanceRow::new("B", "C", 2),
    ]
}

// ============================================================================
// Node Ordering Tests
// ============================================================================

#[test]
fn test_node_order_includes_last_country() {
    let rows = three_country_rows();
    assert_eq!(node_order(&rows), vec!["A", "B", "C"]);
}

#[test]
fn test_node_order_single_pair() {
    let rows = vec![PairwiseDistanceRow::new("France", "Germany", 12)];
    assert_eq!(node_order(&rows), vec!["France", "Germany"]);
}

#[test]
fn test_node_order_empty() {
    assert!(node_order(&[]).is_empty());
}

// ============================================================================
// Graph Construction Tests
// ============================================================================

#[test]
fn test_build_single_link_zero_weight() {
    let rows = vec![PairwiseDistanceRow::new("A", "B", 0)];

    let graph = GraphBuilder::new().build(&rows).unwrap();

    assert_eq!(
        graph.nodes,
        vec![
            GraphNode {
                character: "A".to_string(),
                id: 0,
                influence: 1
            },
            GraphNode {
                character: "B".to_string(),
                id: 1,
                influence: 1
            },
        ]
    );
    assert_eq!(
        graph.links,
        vec![GraphLink {
            source: 0,
            target: 1,
            weight: 0
        }]
    );
}

#[test]
fn test_build_three_countries_link_order() {
    let graph = GraphBuilder::new().build(&three_country_rows()).unwrap();

    let pairs: Vec<(usize, usize, u64)> = graph
        .links
        .iter()
        .map(|l| (l.source, l.target, l.weight))
        .collect();
    assert_eq!(pairs, vec![(0, 1, 2), (0, 2, 1), (1, 2, 2)]);
}

#[test]
fn test_every_pair_has_exactly_one_link() {
    let countries = ["A", "B", "C", "D", "E"];
    let mut rows = Vec::new();
    for (i, a) in countries.iter().enumerate() {
        for b in countries.iter().skip(i + 1) {
            rows.push(PairwiseDistanceRow::new(*a, *b, (i * 3) as u64));
        }
    }

    let graph = GraphBuilder::new().build(&rows).unwrap();

    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.links.len(), 10);
    for i in 0..5 {
        for j in (i + 1)..5 {
            let count = graph
                .links
                .iter()
                .filter(|l| l.source == i && l.target == j)
                .count();
            assert_eq!(count, 1, "pair ({}, {})", i, j);
        }
    }
    assert!(graph.links.iter().all(|l| l.source < l.target));
}

#[test]
fn test_build_accepts_reversed_rows() {
    let rows = vec![
        PairwiseDistanceRow::new("A", "B", 4),
        PairwiseDistanceRow::new("C", "A", 5),
        PairwiseDistanceRow::new("B", "C", 6),
    ];

    let graph = GraphBuilder::new().build(&rows).unwrap();

    let a = graph.node("A").unwrap().id;
    let c = graph.node("C").unwrap().id;
    assert_eq!(graph.link(a, c).unwrap().weight, 5);
}

#[test]
fn test_build_missing_pair() {
    let rows = vec![
        PairwiseDistanceRow::new("A", "B", 1),
        PairwiseDistanceRow::new("B", "C", 1),
    ];

    let result = GraphBuilder::new().build(&rows);

    match result {
        Err(HomeBiasError::MissingPair { country1, country2 }) => {
            assert_eq!(country1, "A");
            assert_eq!(country2, "C");
        }
        other => panic!("expected MissingPair, got {:?}", other),
    }
}

#[test]
fn test_build_empty_table() {
    let graph = GraphBuilder::new().build(&[]).unwrap();
    assert_eq!(graph, GraphDocument::default());
}

// ============================================================================
// Influence Tests
// ============================================================================

#[test]
fn test_constant_influence() {
    let graph = GraphBuilder::new()
        .with_influence(InfluenceSource::Constant(42))
        .build(&three_country_rows())
        .unwrap();

    assert!(graph.nodes.iter().all(|n| n.influence == 42));
}

#[test]
fn test_seeded_influence_is_reproducible() {
    let build = |seed| {
        GraphBuilder::new()
            .with_influence(InfluenceSource::Seeded { seed })
            .build(&three_country_rows())
            .unwrap()
    };

    let first = build(7);
    let second = build(7);

    assert_eq!(first, second);
    assert!(
        first
            .nodes
            .iter()
            .all(|n| SEEDED_INFLUENCE_RANGE.contains(&n.influence))
    );
}

#[test]
fn test_table_influence() {
    let values = BTreeMap::from([
        ("A".to_string(), 10),
        ("B".to_string(), 20),
        ("C".to_string(), 30),
    ]);

    let graph = GraphBuilder::new()
        .with_influence(InfluenceSource::Table(values))
        .build(&three_country_rows())
        .unwrap();

    let influence: Vec<u32> = graph.nodes.iter().map(|n| n.influence).collect();
    assert_eq!(influence, vec![10, 20, 30]);
}

#[test]
fn test_table_influence_missing_country() {
    let values = BTreeMap::from([("A".to_string(), 10)]);

    let result = GraphBuilder::new()
        .with_influence(InfluenceSource::Table(values))
        .build(&three_country_rows());

    assert!(matches!(result, Err(HomeBiasError::MissingInfluence(ref c)) if c == "B"));
}

#[test]
fn test_influence_from_csv() {
    let csv = "country,influence\nA,5\nB,15\n";

    let source = InfluenceSource::read_csv(csv.as_bytes(), "inline").unwrap();

    match source {
        InfluenceSource::Table(values) => {
            assert_eq!(values.get("A"), Some(&5));
            assert_eq!(values.get("B"), Some(&15));
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_influence_from_csv_invalid_value() {
    let csv = "country,influence\nA,lots\n";

    let result = InfluenceSource::read_csv(csv.as_bytes(), "inline");

    assert!(matches!(
        result,
        Err(HomeBiasError::InvalidInfluence { ref value, .. }) if value == "lots"
    ));
}

#[test]
fn test_influence_from_csv_missing_column() {
    let csv = "country,size\nA,5\n";

    let result = InfluenceSource::read_csv(csv.as_bytes(), "inline");

    assert!(matches!(result, Err(HomeBiasError::MissingColumn { .. })));
}

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_shape() {
    let graph = GraphBuilder::new()
        .build(&[PairwiseDistanceRow::new("A", "B", 3)])
        .unwrap();

    let json = graph.to_json(false).unwrap();

    assert_eq!(
        json,
        r#"{"nodes":[{"character":"A","id":0,"influence":1},{"character":"B","id":1,"influence":1}],"links":[{"source":0,"target":1,"weight":3}]}"#
    );
}

#[test]
fn test_write_json_overwrites_previous_run() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph_data.json");
    let graph = GraphBuilder::new().build(&three_country_rows()).unwrap();

    graph.write_json(&path, false).unwrap();
    graph.write_json(&path, true).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: GraphDocument = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, graph);
}
