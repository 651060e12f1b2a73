use crate::CLAP_STYLING;
use clap::{Arg, ArgAction, arg, command};
use std::path::PathBuf;

fn date_arg() -> Arg {
    arg!(--"date" <DATE>)
        .required(false)
        .help("Date stamp (YYYY-MM-DD) for default output file names (default: today)")
        .value_parser(clap::value_parser!(chrono::NaiveDate))
}

fn exclusion_args() -> [Arg; 2] {
    [
        arg!(-x --"exclude" <LABEL>)
            .required(false)
            .help("Extra country label to leave out of every pair, on top of Global; repeatable")
            .action(ArgAction::Append),
        arg!(--"no-default-exclude")
            .required(false)
            .help("Pair the Global aggregate row like any other country")
            .action(ArgAction::SetTrue),
    ]
}

fn influence_args() -> [Arg; 3] {
    [
        arg!(--"influence" <VALUE>)
            .required(false)
            .help("Constant influence value for every node")
            .value_parser(clap::value_parser!(u32))
            .conflicts_with_all(["influence-seed", "influence-file"]),
        arg!(--"influence-seed" <SEED>)
            .required(false)
            .help("Draw influence values in 1..=100 from a seeded generator")
            .value_parser(clap::value_parser!(u64))
            .conflicts_with("influence-file"),
        arg!(--"influence-file" <PATH>)
            .required(false)
            .help("CSV with columns country,influence")
            .value_parser(clap::value_parser!(String)),
    ]
}

fn pretty_arg() -> Arg {
    arg!(--"pretty")
        .required(false)
        .help("Pretty-print the graph JSON")
        .action(ArgAction::SetTrue)
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("homebias")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("homebias")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress bars and info logging")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("pairs")
                .about(
                    "Compute the Levenshtein distance between every pair of countries' ranked \
                sites and write the pairwise table.",
                )
                .arg(
                    arg!(<RANKINGS>)
                        .help("CSV with at least the columns country_name and url")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Pairwise CSV destination (default: home_bias_<date>.csv)")
                        .value_parser(clap::value_parser!(String)),
                )
                .args(exclusion_args())
                .arg(date_arg()),
        )
        .subcommand(
            command!("graph")
                .about("Turn a pairwise table into a node/link graph JSON document")
                .arg(
                    arg!(<PAIRS>)
                        .help("CSV with the columns country1, country2, pairwise_levenshtein")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Graph JSON destination (default: graph_data_<date>.json)")
                        .value_parser(clap::value_parser!(String)),
                )
                .args(influence_args())
                .arg(pretty_arg())
                .arg(date_arg()),
        )
        .subcommand(
            command!("run")
                .about("Run rankings -> pairwise distances -> graph in a single pass")
                .arg(
                    arg!(<RANKINGS>)
                        .help("CSV with at least the columns country_name and url")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"pairs-output" <PATH>)
                        .required(false)
                        .help("Also write the intermediate pairwise table here")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Graph JSON destination (default: graph_data_<date>.json)")
                        .value_parser(clap::value_parser!(String)),
                )
                .args(exclusion_args())
                .args(influence_args())
                .arg(pretty_arg())
                .arg(date_arg()),
        )
        .subcommand(
            command!("summary")
                .about("Report each country's nearest and farthest neighbours")
                .arg(
                    arg!(<PAIRS>)
                        .help("CSV with the columns country1, country2, pairwise_levenshtein")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}
