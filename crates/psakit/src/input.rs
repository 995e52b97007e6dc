//! Draw tables from CSV files.

use std::io;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail, eyre};
use csv::ReaderBuilder;
use psakit_core::model::DEFAULT_GROUP_KEY;
use psakit_core::{ColumnRoles, RawTable};

/// Parse one CSV field. Empty fields and `NA` read as NaN so they propagate
/// through the summaries instead of failing the load.
fn parse_field(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") {
        return Some(f64::NAN);
    }
    raw.parse().ok()
}

/// Bind the group role to the conventional `grp_id` column when the
/// configuration leaves it unset and the file has one.
pub fn resolve_roles(headers: &[String], roles: &ColumnRoles) -> ColumnRoles {
    let mut roles = roles.clone();
    if roles.group.is_none() && headers.iter().any(|h| h == DEFAULT_GROUP_KEY) {
        roles.group = Some(DEFAULT_GROUP_KEY.to_string());
    }
    roles
}

fn role_names(roles: &ColumnRoles) -> impl Iterator<Item = &str> {
    [
        Some(roles.sample.as_str()),
        Some(roles.strategy.as_str()),
        roles.group.as_deref(),
        Some(roles.effect.as_str()),
        Some(roles.cost.as_str()),
    ]
    .into_iter()
    .flatten()
}

/// Read a headed CSV into the numeric columns the roles refer to.
///
/// Other columns (labels, notes) are skipped without being parsed. Returns
/// the table together with the roles after resolving the default group.
pub fn read_raw_table<R: io::Read>(
    reader: R,
    roles: &ColumnRoles,
) -> color_eyre::Result<(RawTable, ColumnRoles)> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .wrap_err("failed to read csv headers")?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    if headers.is_empty() {
        bail!("csv has no headers");
    }

    let roles = resolve_roles(&headers, roles);
    let wanted: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| role_names(&roles).any(|r| r == name.as_str()))
        .map(|(i, _)| i)
        .collect();
    tracing::debug!(
        kept = wanted.len(),
        skipped = headers.len() - wanted.len(),
        "selected csv columns"
    );

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); wanted.len()];
    for (i, record) in rdr.records().enumerate() {
        let record = record.wrap_err_with(|| format!("failed reading csv row {}", i + 1))?;
        if record.len() != headers.len() {
            bail!(
                "csv row {} has {} fields, expected {}",
                i + 1,
                record.len(),
                headers.len()
            );
        }
        for (column, &at) in columns.iter_mut().zip(&wanted) {
            let field = &record[at];
            let value = parse_field(field).ok_or_else(|| {
                eyre!(
                    "row {}, column {:?}: {field:?} is not a number",
                    i + 1,
                    headers[at]
                )
            })?;
            column.push(value);
        }
    }

    let mut table = RawTable::new();
    for (at, values) in wanted.into_iter().zip(columns) {
        table.push_column(headers[at].clone(), values);
    }
    Ok((table, roles))
}

pub fn read_draws(
    path: &Path,
    roles: &ColumnRoles,
) -> color_eyre::Result<(RawTable, ColumnRoles)> {
    let file = std::fs::File::open(path)
        .wrap_err_with(|| format!("failed to open draws {}", path.display()))?;
    let (table, roles) =
        read_raw_table(file, roles).wrap_err_with(|| format!("in {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        columns = table.names().count(),
        "read draw table"
    );
    Ok((table, roles))
}
