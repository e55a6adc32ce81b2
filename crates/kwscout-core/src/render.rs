//! Plain-text report of an analysis.

use std::fmt::Write;

use crate::model::{AnalysisResult, CandidateKeyword};
use crate::text::char_len;

const HEADERS: [&str; 4] = ["Keyword", "Type", "Count", "Intent"];

/// Render `result` as a column-aligned table followed by its auxiliary
/// signals. Column widths are measured in characters.
pub fn render(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let title = format!("Keyword analysis: {}", result.keyword);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(char_len(&title)));

    if result.candidates.is_empty() {
        let _ = writeln!(out, "No results found");
    } else {
        let rows: Vec<[String; 4]> = result.candidates.iter().map(row).collect();
        let mut widths = HEADERS.map(char_len);
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(char_len(cell));
            }
        }

        push_row(&mut out, &HEADERS.map(str::to_string), &widths);
        let rule = widths.map(|w| "-".repeat(w));
        push_row(&mut out, &rule, &widths);
        for cells in &rows {
            push_row(&mut out, cells, &widths);
        }
    }

    if !result.auxiliary.is_empty() {
        let _ = writeln!(out);
        for (name, value) in &result.auxiliary {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let _ = writeln!(out, "{name}: {shown}");
        }
    }
    out
}

fn row(candidate: &CandidateKeyword) -> [String; 4] {
    let intent = match candidate.intent {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    };
    [
        candidate.text.clone(),
        candidate.kind.to_string(),
        candidate.count.to_string(),
        intent.to_string(),
    ]
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(char_len(cell));
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
