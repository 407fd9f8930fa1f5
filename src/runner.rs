use std::sync::Arc;

use crate::cli::Cli;
use collection_hunter::config::{FirebaseConfig, RunConfig};
use collection_hunter::output::{print_summary, save_report};
use collection_hunter::probe::FirestoreProbe;
use collection_hunter::{ConsoleProgress, Dispatcher};

fn print_banner() {
    println!("\n=== Collection Hunter ===");
    println!("Firestore collection enumerator");
    println!("Version: v{}\n", env!("CARGO_PKG_VERSION"));
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs share stderr with the progress line and are printed above it; keep
    // HTTP internals quiet.
    use tracing_subscriber::EnvFilter;
    let progress = Arc::new(ConsoleProgress::new());
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "collection_hunter={level},reqwest=info,hyper=info,h2=info",
        level = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(progress.log_writer())
        .with_ansi(true)
        .with_target(false)
        .init();

    print_banner();

    // Everything that can fail fatally happens before the first probe.
    let run_config = RunConfig::new(cli.threads);
    run_config.validate()?;
    let firebase = FirebaseConfig::load(&cli.config)?;
    let candidates = collection_hunter::wordlist::load_wordlist(&cli.wordlist)?;

    let client = collection_hunter::http_client::build_client(cli.timeout, run_config.concurrency)?;
    let probe = FirestoreProbe::new(client, &firebase, &cli.endpoint)?;

    tracing::info!(
        project = %firebase.project_id,
        database = firebase.database(),
        candidates = candidates.len(),
        concurrency = run_config.concurrency,
        "Starting enumeration"
    );
    println!("[>] Project: {}", firebase.project_id);
    println!("[~] Candidates: {} (concurrency: {})\n", candidates.len(), run_config.concurrency);

    let dispatcher =
        Dispatcher::with_concurrency(run_config.concurrency, Arc::new(probe), progress.clone())?;
    let result = dispatcher.run(candidates).await?;

    let saved = match cli.output.as_deref() {
        Some(path) => match save_report(path, &result.found) {
            Ok(()) => Some(path),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "report not written");
                eprintln!("[!] Error saving file: {}", e);
                None
            }
        },
        None => None,
    };
    print_summary(&result, saved);
    Ok(())
}
