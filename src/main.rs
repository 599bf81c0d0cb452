use std::io;
use std::process::ExitCode;

use clap::Parser;

use onepassword_dedupe::cli::Cli;
use onepassword_dedupe::logging::init_tracing;
use onepassword_dedupe::{DedupeResult, Deduplicator, LinePrompt, OpCli, VaultClient};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_level, cli.log_format) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> DedupeResult<()> {
    let client = OpCli::new(&cli.op_bin);
    let mut items = client.list_login_items(&cli.item_filter())?;

    let stats = Deduplicator::new(&client, LinePrompt::stdio(), io::stdout(), cli.dedupe_options())
        .run(&mut items)?;

    tracing::info!(%stats, "Run summary");
    println!("Finished.");
    Ok(())
}
