use crate::api::EarningsReport;
use colored::Colorize;
use serde_json::Value;

/// Strings print bare, missing values as `-`, anything else as JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

pub fn banner() -> String {
    let rule = "═══════════════════════════════════════════";
    format!(
        "{}\n{}\n{}",
        rule.cyan(),
        "   harvestrs · continuous harvest agent".bold(),
        rule.cyan()
    )
}

pub fn earnings_lines(index: usize, report: &EarningsReport) -> Vec<String> {
    vec![
        format!("[Account {}]", index + 1).cyan().to_string(),
        format!(
            "{} {} ({})",
            "Username:".cyan(),
            scalar(&report.username).bold(),
            report.current_tier
        ),
        format!(
            "{} {} points ({})",
            "Today's Earnings:".cyan(),
            scalar(&report.todays_earning.tpoints).bold(),
            scalar(&report.todays_earning.date)
        ),
        format!(
            "{} {}",
            "Total Loyalty Points:".cyan(),
            scalar(&report.loyalty_points).bold()
        ),
    ]
}

pub fn print_earnings(index: usize, report: &EarningsReport) {
    println!();
    for line in earnings_lines(index, report) {
        println!("{}", line);
    }
}
