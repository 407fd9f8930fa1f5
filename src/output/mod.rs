pub mod report;

pub use report::{format_summary, print_summary, save_report};
