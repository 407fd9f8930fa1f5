use std::fs;
use std::path::Path;

use crate::aggregator::{FoundCollection, RunResult};
use crate::error::HunterError;

/// Write the found collections as a pretty-printed JSON array of
/// `{ "name", "documents" }` objects.
pub fn save_report(path: &Path, found: &[FoundCollection]) -> Result<(), HunterError> {
    let json = serde_json::to_string_pretty(found)?;
    fs::write(path, json).map_err(|source| HunterError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Render the end-of-run summary. `saved_to` is the report path when the
/// report was written.
pub fn format_summary(result: &RunResult, saved_to: Option<&Path>) -> String {
    let mut out = String::new();
    out.push_str("\n[+] Finished.\n");
    out.push_str(&format!(
        "    Probed: {} | Found: {} | Not found: {} | Errors: {}\n\n",
        result.stats.completed, result.stats.found, result.stats.not_found, result.stats.errors
    ));

    if result.is_empty() {
        out.push_str("[-] No public collections found.\n");
    } else {
        out.push_str("[+] Collections found:\n");
        for col in &result.found {
            out.push_str(&format!(" - {}: {} documents\n", col.name, col.documents));
        }
    }
    if let Some(path) = saved_to {
        out.push_str(&format!("\n[=] Results saved to: {}\n", path.display()));
    }
    out
}

pub fn print_summary(result: &RunResult, saved_to: Option<&Path>) {
    print!("{}", format_summary(result, saved_to));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RunStats;

    fn result(found: Vec<FoundCollection>) -> RunResult {
        let n = found.len();
        RunResult {
            found,
            stats: RunStats { total: 3, completed: 3, found: n, not_found: 3 - n, errors: 0 },
        }
    }

    #[test]
    fn summary_lists_collections() {
        let text = format_summary(
            &result(vec![
                FoundCollection { name: "users".into(), documents: 5 },
                FoundCollection { name: "orders".into(), documents: 0 },
            ]),
            None,
        );
        assert!(text.contains("[+] Collections found:"));
        assert!(text.contains(" - users: 5 documents"));
        assert!(text.contains(" - orders: 0 documents"));
        assert!(!text.contains("No public collections"));
        assert!(!text.contains("Results saved to"));
    }

    #[test]
    fn summary_ends_with_report_path() {
        let path = Path::new("out/found.json");
        let text = format_summary(
            &result(vec![FoundCollection { name: "users".into(), documents: 5 }]),
            Some(path),
        );
        let last = text.lines().last().unwrap();
        assert_eq!(last, format!("[=] Results saved to: {}", path.display()));
    }

    #[test]
    fn summary_for_empty_run() {
        let text = format_summary(&result(Vec::new()), None);
        assert!(text.contains("Finished."));
        assert!(text.contains("[-] No public collections found."));
    }
}
