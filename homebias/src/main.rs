use homebias::command_argument_builder;
use homebias::handlers::{handle_graph, handle_pairs, handle_run, handle_summary, init_logging};
use homebias_core::print_banner;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_logging(quiet, verbose);

    let outcome = match chosen_command.subcommand() {
        Some(("pairs", primary_command)) => handle_pairs(primary_command, quiet),
        Some(("graph", primary_command)) => handle_graph(primary_command, quiet),
        Some(("run", primary_command)) => handle_run(primary_command, quiet),
        Some(("summary", primary_command)) => handle_summary(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
