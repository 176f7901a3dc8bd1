//! Terminal rendering for search reports.

use haute_core::Candidate;

use crate::search_cmd::SearchReport;

// ---------------------------------------------------------------------------
// ANSI styling
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Color unless `NO_COLOR` is set or the terminal is dumb.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false)
}

fn paint(s: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{s}{RESET}")
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: &'static str,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, align: Align::Left, max_width: None }
    }

    pub fn right(header: &'static str) -> Self {
        Self { header, align: Align::Right, max_width: None }
    }

    pub fn truncate_at(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Render rows under `columns`. Cells wider than a column's limit are cut with
/// an ellipsis.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    fit(cell, col.max_width)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(col.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = line(&columns.iter().map(|c| c.header).collect::<Vec<_>>(), columns, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&rule.iter().map(String::as_str).collect::<Vec<_>>(), columns, &widths));
    for row in &cells {
        out.push_str(&line(&row.iter().map(String::as_str).collect::<Vec<_>>(), columns, &widths));
    }
    out
}

fn line(values: &[&str], columns: &[Column], widths: &[usize]) -> String {
    let padded: Vec<String> = values
        .iter()
        .zip(columns)
        .zip(widths)
        .map(|((v, col), w)| pad(v, *w, &col.align))
        .collect();
    format!("  {}\n", padded.join("  ").trim_end())
}

fn fit(s: &str, max_width: Option<usize>) -> String {
    match max_width {
        Some(max) if s.chars().count() > max && max > 1 => {
            let mut cut: String = s.chars().take(max - 1).collect();
            cut.push('…');
            cut
        }
        _ => s.to_string(),
    }
}

fn pad(s: &str, width: usize, align: &Align) -> String {
    let fill = " ".repeat(width.saturating_sub(s.chars().count()));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

pub fn candidate_table(candidates: &[Candidate]) -> String {
    let columns = [
        Column::right("#"),
        Column::left("Title").truncate_at(32),
        Column::right("Price"),
        Column::left("Store"),
        Column::right("Match"),
    ];
    let rows: Vec<Vec<String>> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.title.clone(),
                c.price.clone(),
                c.store.clone(),
                format!("{}%", c.similarity),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

/// Human-readable report: summary line, terms, then the candidate table.
pub fn render_report(report: &SearchReport, color: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        paint("Searching for:", BOLD, color),
        paint(&report.summary, CYAN, color)
    );
    out.push_str(&paint(&format!("terms: {}\n", report.terms.join(" ")), DIM, color));
    if let Some(region) = report.region {
        out.push_str(&paint(&format!("region: {region}\n"), DIM, color));
    }
    out.push('\n');

    if report.candidates.is_empty() {
        out.push_str(&paint("No matches found. Try again or broaden the description.\n", YELLOW, color));
    } else {
        out.push_str(&paint(
            &format!("{} matches\n", report.candidates.len()),
            GREEN,
            color,
        ));
        out.push_str(&candidate_table(&report.candidates));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use haute_core::SearchMode;
    use uuid::Uuid;

    fn candidate(title: &str) -> Candidate {
        Candidate {
            id: "1".into(),
            title: title.into(),
            price: "$24.99".into(),
            store: "Fashion Store".into(),
            image_ref: String::new(),
            link: "#".into(),
            similarity: 95,
        }
    }

    fn report(candidates: Vec<Candidate>) -> SearchReport {
        SearchReport {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            mode: SearchMode::Text,
            summary: "T-shirt".into(),
            terms: vec!["t-shirt".into()],
            region: None,
            candidates,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = candidate_table(&[candidate("Cotton Basic T-Shirt")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Title"));
        assert!(lines[2].contains("Cotton Basic T-Shirt"));
        assert!(lines[2].ends_with("95%"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "An Extraordinarily Long Product Title For Testing";
        let table = candidate_table(&[candidate(long)]);
        assert!(!table.contains(long));
        assert!(table.contains('…'));
    }

    #[test]
    fn empty_report_suggests_retry() {
        let text = render_report(&report(Vec::new()), false);
        assert!(text.starts_with("Searching for: T-shirt"));
        assert!(text.contains("No matches found"));
    }
}
