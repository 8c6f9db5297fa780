//! Rendering of per-policy results.

use std::fmt::Write;

use callsim_core::PolicyReport;

use crate::Error;

const HEADERS: [&str; 8] = [
    "Policy",
    "Total Calls",
    "Successful",
    "Success(%)",
    "Blocked",
    "Blocked(%)",
    "Avg Hops",
    "Avg Delay",
];

const RULE_WIDTH: usize = 121;

/// Renders reports as a tab-separated table with a header and one row per policy. Counts have no
/// decimals, percentages two, and averages four.
pub fn render_table(reports: &[PolicyReport]) -> String {
    let mut s = String::new();
    for h in HEADERS {
        write!(s, "{h:<12}\t").unwrap(); // writing to a String cannot fail
    }
    s.push('\n');
    s.push_str(&"=".repeat(RULE_WIDTH));
    s.push('\n');
    for PolicyReport { policy, summary } in reports {
        writeln!(
            s,
            "{:<12}\t{:<12}\t{:<12}\t{:<12.2}\t{:<12}\t{:<12.2}\t{:<12.4}\t{:<12.4}",
            policy.name(),
            summary.total_calls,
            summary.successful_calls,
            summary.success_pct,
            summary.blocked_calls,
            summary.blocked_pct,
            summary.avg_hops,
            summary.avg_delay,
        )
        .unwrap();
    }
    s
}

/// Renders reports as a pretty-printed JSON array. Non-finite figures become `null`.
pub fn render_json(reports: &[PolicyReport]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(reports)?)
}
