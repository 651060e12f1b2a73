use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::ArgMatches;
use colored::Colorize;
use homebias_core::graph::{GraphBuilder, InfluenceSource};
use homebias_core::pairwise::{
    ExclusionRule, GLOBAL_SENTINEL, PairwiseOptions, compute_pairwise, read_pairwise_csv,
    write_pairwise_csv,
};
use homebias_core::pipeline::{
    GRAPH_FILE_PREFIX, PAIRS_FILE_PREFIX, PipelineOptions, dated_file_name, run_pipeline,
};
use homebias_core::ranking::{RankingTable, encode};
use homebias_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report, summarize,
};
use std::path::PathBuf;
use tracing::Level;

/// Expand `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Use the explicit output path if given, otherwise a date-stamped name
/// in the working directory
pub fn resolve_output(
    explicit: Option<&String>,
    prefix: &str,
    extension: &str,
    date: NaiveDate,
) -> PathBuf {
    match explicit {
        Some(path) => expand_path(path),
        None => PathBuf::from(dated_file_name(prefix, extension, date)),
    }
}

/// Map `--exclude` values onto an exclusion rule. `Global` is always
/// included unless `--no-default-exclude` is given.
pub fn exclusion_from_args(args: &ArgMatches) -> ExclusionRule {
    let mut labels: Vec<String> = args
        .get_many::<String>("exclude")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !args.get_flag("no-default-exclude") {
        labels.push(GLOBAL_SENTINEL.to_string());
    }

    if labels.is_empty() {
        ExclusionRule::none()
    } else {
        ExclusionRule::from_labels(labels)
    }
}

/// Pick the influence source from the mutually exclusive influence flags
pub fn influence_from_args(args: &ArgMatches) -> Result<InfluenceSource> {
    if let Some(path) = args.get_one::<String>("influence-file") {
        let path = expand_path(path);
        return InfluenceSource::from_path(&path)
            .with_context(|| format!("Failed to load influence values from {}", path.display()));
    }
    if let Some(seed) = args.get_one::<u64>("influence-seed") {
        return Ok(InfluenceSource::Seeded { seed: *seed });
    }
    if let Some(value) = args.get_one::<u32>("influence") {
        return Ok(InfluenceSource::Constant(*value));
    }
    Ok(InfluenceSource::default())
}

fn stamp_date(args: &ArgMatches) -> NaiveDate {
    args.get_one::<NaiveDate>("date")
        .copied()
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn required_path(args: &ArgMatches, name: &str) -> Result<PathBuf> {
    match args.get_one::<String>(name) {
        Some(path) => Ok(expand_path(path)),
        None => bail!("Missing required argument <{}>", name),
    }
}

/// Log level implied by the global flags
pub fn log_level(quiet: bool, verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    }
}

pub fn init_logging(quiet: bool, verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(quiet, verbose))
        .with_target(false)
        .init();
}

pub fn handle_pairs(args: &ArgMatches, quiet: bool) -> Result<()> {
    let rankings_path = required_path(args, "RANKINGS")?;
    let output = resolve_output(
        args.get_one::<String>("output"),
        PAIRS_FILE_PREFIX,
        "csv",
        stamp_date(args),
    );

    let table = RankingTable::from_path(&rankings_path)
        .with_context(|| format!("Failed to load rankings from {}", rankings_path.display()))?;
    let (site_codes, sequences) = encode(&table);

    let options = PairwiseOptions {
        exclusion: exclusion_from_args(args),
        show_progress_bar: !quiet,
    };
    let rows = compute_pairwise(&sequences, &options);

    write_pairwise_csv(&rows, &output)
        .with_context(|| format!("Failed to write pairwise table to {}", output.display()))?;

    if !quiet {
        println!(
            "{} {} sites, {} countries, {} pairs",
            "✓".green().bold(),
            site_codes.len().to_string().cyan(),
            sequences.len().to_string().cyan(),
            rows.len().to_string().cyan()
        );
        println!(
            "{} Pairwise table: {}",
            "✓".green().bold(),
            output.display().to_string().bright_white()
        );
    }
    Ok(())
}

pub fn handle_graph(args: &ArgMatches, quiet: bool) -> Result<()> {
    let pairs_path = required_path(args, "PAIRS")?;
    let output = resolve_output(
        args.get_one::<String>("output"),
        GRAPH_FILE_PREFIX,
        "json",
        stamp_date(args),
    );
    let pretty = args.get_flag("pretty");

    let rows = read_pairwise_csv(&pairs_path)
        .with_context(|| format!("Failed to load pairwise table from {}", pairs_path.display()))?;
    let graph = GraphBuilder::new()
        .with_influence(influence_from_args(args)?)
        .build(&rows)
        .context("Failed to assemble graph")?;

    graph
        .write_json(&output, pretty)
        .with_context(|| format!("Failed to write graph to {}", output.display()))?;

    if !quiet {
        println!(
            "{} {} nodes, {} links",
            "✓".green().bold(),
            graph.nodes.len().to_string().cyan(),
            graph.links.len().to_string().cyan()
        );
        println!(
            "{} Graph: {}",
            "✓".green().bold(),
            output.display().to_string().bright_white()
        );
    }
    Ok(())
}

pub fn handle_run(args: &ArgMatches, quiet: bool) -> Result<()> {
    let date = stamp_date(args);
    let options = PipelineOptions {
        ranking_path: required_path(args, "RANKINGS")?,
        pairs_output: args.get_one::<String>("pairs-output").map(|p| expand_path(p)),
        graph_output: resolve_output(
            args.get_one::<String>("output"),
            GRAPH_FILE_PREFIX,
            "json",
            date,
        ),
        pairwise: PairwiseOptions {
            exclusion: exclusion_from_args(args),
            show_progress_bar: !quiet,
        },
        influence: influence_from_args(args)?,
        pretty: args.get_flag("pretty"),
    };

    let outcome = run_pipeline(&options).context("Pipeline failed")?;

    if !quiet {
        println!(
            "{} {} sites, {} pairs, {} nodes, {} links",
            "✓".green().bold(),
            outcome.site_codes.len().to_string().cyan(),
            outcome.pairs.len().to_string().cyan(),
            outcome.graph.nodes.len().to_string().cyan(),
            outcome.graph.links.len().to_string().cyan()
        );
        if let Some(ref pairs_path) = options.pairs_output {
            println!(
                "{} Pairwise table: {}",
                "✓".green().bold(),
                pairs_path.display().to_string().bright_white()
            );
        }
        println!(
            "{} Graph: {}",
            "✓".green().bold(),
            options.graph_output.display().to_string().bright_white()
        );
    }
    Ok(())
}

pub fn handle_summary(args: &ArgMatches) -> Result<()> {
    let pairs_path = required_path(args, "PAIRS")?;
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let Some(format) = ReportFormat::from_str(format_name) else {
        bail!("Unknown report format '{}'", format_name);
    };

    let rows = read_pairwise_csv(&pairs_path)
        .with_context(|| format!("Failed to load pairwise table from {}", pairs_path.display()))?;
    let bounds = summarize(&rows);

    let report = match format {
        ReportFormat::Text => generate_text_report(&bounds),
        ReportFormat::Json => generate_json_report(&bounds).context("Failed to render report")?,
    };

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!(
                "{} Report saved: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}
