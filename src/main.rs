use clap::Parser;
use tracing_subscriber::EnvFilter;

use semantic_release::cli::Cli;
use semantic_release::ui;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cli.execute() {
        let rendered = e.to_string();
        ui::display_error(&rendered);

        // Step errors already render their cause inline
        for cause in e.chain().skip(1) {
            let cause = cause.to_string();
            if !rendered.contains(&cause) {
                eprintln!("  Caused by: {}", cause);
            }
        }
        std::process::exit(1);
    }
}
