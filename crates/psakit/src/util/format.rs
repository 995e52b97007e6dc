//! Human-readable rendering of ICER tables

use std::collections::HashMap;

use clap::ValueEnum;
use psakit_core::{GroupId, IcerRow, Outcome, StrategyId};

/// Insert thousands separators into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn format_non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NA".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "Inf" } else { "-Inf" }.to_string())
    } else {
        None
    }
}

/// Format a currency value rounded to whole units, e.g. `-$12,500`
pub fn format_currency(value: f64) -> String {
    if let Some(s) = format_non_finite(value) {
        return s;
    }
    let units = value.abs().round() as u64;
    let formatted = group_thousands(&units.to_string());
    if value < 0.0 && units > 0 {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

/// Format a plain number with a fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    format_non_finite(value).unwrap_or_else(|| format!("{:.*}", decimals, value))
}

/// Render `"est [lower, upper]"`
pub fn format_interval(
    estimate: f64,
    lower: f64,
    upper: f64,
    fmt: impl Fn(f64) -> String,
) -> String {
    format!("{} [{}, {}]", fmt(estimate), fmt(lower), fmt(upper))
}

/// Display text of one ICER table cell
pub fn format_icer_value(row: &IcerRow) -> String {
    if let Some(label) = row.display_label() {
        return label.to_string();
    }
    let fmt = |v: f64| match row.outcome {
        Outcome::IncrementalEffect => format_number(v, 2),
        Outcome::IncrementalCost | Outcome::IncrementalNmb | Outcome::Icer => format_currency(v),
    };
    match (row.lower, row.upper) {
        (Some(lower), Some(upper)) => format_interval(row.estimate, lower, upper, fmt),
        _ => fmt(row.estimate),
    }
}

/// Which dimension of the ICER table is spread into columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Pivot {
    /// One row per (strategy, group, outcome)
    #[default]
    None,
    /// One column per strategy
    Strategy,
    /// One column per group
    Group,
}

/// Left-aligned plain-text table
struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:<width$}", cell))
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        let mut out = line(&self.header);
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

/// Distinct values in first-seen order
fn distinct<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

/// Render ICER rows as an aligned text table.
///
/// `strategy_key` and `group_key` name the id columns, as carried in the
/// pairwise result's metadata.
pub fn render_icer_table(
    rows: &[IcerRow],
    pivot: Pivot,
    strategy_key: &str,
    group_key: &str,
) -> String {
    let strategies = distinct(rows.iter().map(|r| r.strategy));
    let groups = distinct(rows.iter().map(|r| r.group));
    let cells: HashMap<(StrategyId, GroupId, Outcome), String> = rows
        .iter()
        .map(|r| ((r.strategy, r.group, r.outcome), format_icer_value(r)))
        .collect();
    let cell = |s: StrategyId, g: GroupId, o: Outcome| {
        cells.get(&(s, g, o)).cloned().unwrap_or_default()
    };

    let table = match pivot {
        Pivot::None => TextTable {
            header: vec![
                strategy_key.to_string(),
                group_key.to_string(),
                "outcome".to_string(),
                "value".to_string(),
            ],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.strategy.0.to_string(),
                        r.group.0.to_string(),
                        r.outcome.label().to_string(),
                        format_icer_value(r),
                    ]
                })
                .collect(),
        },
        Pivot::Strategy => {
            let mut header = vec![group_key.to_string(), "outcome".to_string()];
            header.extend(strategies.iter().map(|s| format!("{strategy_key} {}", s.0)));
            let mut body = Vec::new();
            for &g in &groups {
                for outcome in Outcome::ALL {
                    let mut line = vec![g.0.to_string(), outcome.label().to_string()];
                    line.extend(strategies.iter().map(|&s| cell(s, g, outcome)));
                    body.push(line);
                }
            }
            TextTable { header, rows: body }
        }
        Pivot::Group => {
            let mut header = vec![strategy_key.to_string(), "outcome".to_string()];
            header.extend(groups.iter().map(|g| format!("{group_key} {}", g.0)));
            let mut body = Vec::new();
            for &s in &strategies {
                for outcome in Outcome::ALL {
                    let mut line = vec![s.0.to_string(), outcome.label().to_string()];
                    line.extend(groups.iter().map(|&g| cell(s, g, outcome)));
                    body.push(line);
                }
            }
            TextTable { header, rows: body }
        }
    };
    table.render()
}
