use std::path::PathBuf;

use clap::Parser;

use collection_hunter::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use collection_hunter::probe::firestore::DEFAULT_ENDPOINT;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Enumerate publicly readable Firestore collections from a wordlist", long_about = None)]
pub struct Cli {
    /// Firebase web config JSON (as exported from the Firebase console)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: PathBuf,

    /// Collection names dictionary, one per line
    #[arg(short = 'w', long, value_name = "FILE")]
    pub wordlist: PathBuf,

    /// Number of concurrent requests
    #[arg(short = 't', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub threads: usize,

    /// Save results to a JSON file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Firestore REST endpoint (e.g. http://localhost:8080 for the emulator)
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tool() {
        let cli = Cli::try_parse_from(["collection_hunter", "-c", "fb.json", "-w", "words.txt"]).unwrap();
        assert_eq!(cli.threads, 10);
        assert_eq!(cli.timeout, 10);
        assert!(cli.output.is_none());
        assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn config_and_wordlist_are_required() {
        assert!(Cli::try_parse_from(["collection_hunter", "-c", "fb.json"]).is_err());
        assert!(Cli::try_parse_from(["collection_hunter", "-w", "words.txt"]).is_err());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from([
            "collection_hunter", "-c", "fb.json", "-w", "words.txt", "-t", "25", "-o", "out.json",
        ])
        .unwrap();
        assert_eq!(cli.threads, 25);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }
}
