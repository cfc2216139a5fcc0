// Human-readable views. Each function returns the text; callers print it.

use patfolio_profile::{PatentPayload, UploadReport};
use patfolio_recon::PortfolioSummary;

use crate::export::issue_date;

const RULE_WIDTH: usize = 95;
const TITLE_WIDTH: usize = 77;
const WRAP_WIDTH: usize = 75;

/// Number and title, one line each.
pub fn render_list(payloads: &[PatentPayload]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Found {} Patents ===\n\n", payloads.len()));
    out.push_str(&format!("{:<15} {}\n", "Patent Number", "Title"));
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
    for p in payloads {
        out.push_str(&format!("{:<15} {}\n", p.number, clip(&p.title, TITLE_WIDTH)));
    }
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
    out.push_str(&format!("Total: {} patents\n", payloads.len()));
    out
}

/// One section per patent with inventors, URL, wrapped abstract and date.
pub fn render_detail(payloads: &[PatentPayload]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let total = payloads.len();
    out.push_str(&format!("=== Found {} Patents (Detailed View) ===\n\n", total));

    for (i, p) in payloads.iter().enumerate() {
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!("Patent {} of {}\n", i + 1, total));
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!("Title:         {}\n", p.title));
        out.push_str(&format!("Patent Number: US{}\n", p.number));

        let inventors: Vec<&str> = p.inventors.iter().map(|n| n.name.as_str()).collect();
        out.push_str(&format!("Inventors:     {}\n", or_missing(&inventors.join(", "))));
        out.push_str(&format!("URL:           {}\n", or_missing(&p.url)));

        let lines = wrap(&p.summary, WRAP_WIDTH - 15);
        match lines.split_first() {
            Some((first, rest)) => {
                out.push_str(&format!("Abstract:      {first}\n"));
                for line in rest {
                    out.push_str(&format!("               {line}\n"));
                }
            }
            None => out.push_str("Abstract:      Not available\n"),
        }

        out.push_str(&format!("Issue Date:    {}\n", or_missing(&issue_date(p.date))));
        out.push('\n');
    }

    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("Total: {} patents\n", total));
    out
}

pub fn render_summary(summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    out.push_str("Patent Portfolio Summary\n");
    out.push_str(&format!("  Total patents:    {}\n", summary.total));

    if let (Some(first), Some(last), Some(span)) = (summary.first_year, summary.last_year, summary.year_span()) {
        let unit = if span == 1 { "year" } else { "years" };
        out.push_str(&format!("  Timeline:         {first} - {last} ({span} {unit})\n"));
    }
    if let (Some(earliest), Some(latest)) = (&summary.earliest_number, &summary.latest_number) {
        out.push_str(&format!("  Number range:     {earliest} to {latest}\n"));
    }
    if !summary.categories.is_empty() {
        out.push_str("  Technology areas:\n");
        for c in &summary.categories {
            out.push_str(&format!("    - {} ({})\n", c.label, c.count));
        }
    }
    if let Some(rate) = summary.patents_per_year() {
        out.push_str(&format!("  Average rate:     {rate:.1} patents/year\n"));
    }
    out
}

pub fn render_upload(report: &UploadReport) -> String {
    let mut out = String::new();
    for err in &report.failed {
        out.push_str(&format!("failed:  {err}\n"));
    }
    out.push_str(&format!(
        "Upload complete: {} created, {} skipped, {} failed\n",
        report.created.len(),
        report.skipped.len(),
        report.failed.len()
    ));
    out
}

fn or_missing(s: &str) -> &str {
    if s.trim().is_empty() {
        "Not available"
    } else {
        s
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width - 3).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
