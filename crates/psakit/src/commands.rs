//! Subcommands of the `psakit` binary.

use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::eyre::{WrapErr, eyre};
use psakit_core::stats::DEFAULT_INTERVAL_LEVEL;
use psakit_core::{DrawTable, IcerRow, StrategyId, cea, cea_pw, icer};
use serde::Serialize;

use crate::config::RunConfig;
use crate::input::read_draws;
use crate::util::format::{Pivot, render_icer_table};
use crate::util::io::atomic_write;

/// Inputs shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CSV file of draws, one row per (sample, strategy, group)
    #[arg(short, long)]
    pub draws: PathBuf,

    /// YAML run configuration (column names, thresholds, comparator)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Confidence level of the summary intervals
    #[arg(long)]
    pub interval_level: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct PairwiseArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Comparator strategy id
    #[arg(long)]
    pub comparator: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct IcerArgs {
    #[command(flatten)]
    pub pairwise: PairwiseArgs,

    /// Decision threshold (willingness to pay per unit of effect)
    #[arg(short, long)]
    pub k: Option<f64>,

    /// Confidence level of the ICER table intervals
    #[arg(long)]
    pub conf_level: Option<f64>,

    /// Spread strategies or groups into columns
    #[arg(long, value_enum, default_value_t = Pivot::None)]
    pub pivot: Pivot,
}

/// ICER table as written to JSON
#[derive(Debug, Serialize)]
struct IcerReport<'a> {
    comparator: StrategyId,
    k: f64,
    conf_level: f64,
    rows: &'a [IcerRow],
}

/// Load the run configuration, apply flag overrides and normalize the draws
fn load(input: &InputArgs) -> color_eyre::Result<(DrawTable, RunConfig)> {
    let mut config = match &input.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(level) = input.interval_level {
        config.analysis.interval_level = level;
    }

    let (raw, roles) = read_draws(&input.draws, &config.columns)?;
    let table = DrawTable::from_columns(&raw, &roles)
        .wrap_err_with(|| format!("invalid draw table {}", input.draws.display()))?;
    tracing::info!(
        draws = table.len(),
        strategies = table.strategies().len(),
        groups = table.groups().len(),
        "normalized draws"
    );
    Ok((table, config))
}

fn comparator(args: &PairwiseArgs, config: &RunConfig) -> color_eyre::Result<StrategyId> {
    args.comparator
        .or(config.comparator)
        .map(StrategyId)
        .ok_or_else(|| eyre!("no comparator: pass --comparator or set `comparator` in the config"))
}

/// Serialize `value` as pretty JSON to `output`, or to stdout
fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("failed to serialize result")?;
    match output {
        Some(path) => {
            atomic_write(path, &json)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "wrote result");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_cea(args: &InputArgs) -> color_eyre::Result<()> {
    let (table, config) = load(args)?;
    let result = cea(&table, &config.analysis)?;
    emit_json(&result, args.output.as_deref())
}

pub fn run_pairwise(args: &PairwiseArgs) -> color_eyre::Result<()> {
    let (table, config) = load(&args.input)?;
    let comparator = comparator(args, &config)?;
    let result = cea_pw(&table, comparator, &config.analysis)?;
    emit_json(&result, args.input.output.as_deref())
}

/// Print the formatted ICER table; with `--output` also write it as JSON
pub fn run_icer(args: &IcerArgs) -> color_eyre::Result<()> {
    let (table, config) = load(&args.pairwise.input)?;
    let comparator = comparator(&args.pairwise, &config)?;
    let k = args
        .k
        .or(config.k)
        .ok_or_else(|| eyre!("no decision threshold: pass --k or set `k` in the config"))?;
    let conf_level = args
        .conf_level
        .or(config.conf_level)
        .unwrap_or(DEFAULT_INTERVAL_LEVEL);

    let pairwise = cea_pw(&table, comparator, &config.analysis)?;
    let rows = icer(&pairwise, k, conf_level)?;

    print!(
        "{}",
        render_icer_table(
            &rows,
            args.pivot,
            &pairwise.meta.strategy_key,
            &pairwise.meta.group_key,
        )
    );

    if let Some(path) = &args.pairwise.input.output {
        let report = IcerReport {
            comparator,
            k,
            conf_level,
            rows: &rows,
        };
        emit_json(&report, Some(path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DRAWS: &str = "\
sample,strategy_id,label,effect,cost
1,1,usual care,1,10
1,2,new drug,2,20
2,1,usual care,1,10
2,2,new drug,2,20
3,1,usual care,1,10
3,2,new drug,2,20
";

    fn input(dir: &Path) -> InputArgs {
        let draws = dir.join("draws.csv");
        fs::write(&draws, DRAWS).unwrap();
        let config = dir.join("run.yaml");
        fs::write(&config, "comparator: 1\nanalysis:\n  wtp: [5, 15]\n").unwrap();
        InputArgs {
            draws,
            config: Some(config),
            output: Some(dir.join("out.json")),
            interval_level: None,
        }
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_cea_writes_json() {
        let dir = tempdir().unwrap();
        let args = input(dir.path());
        run_cea(&args).unwrap();

        let json = read_json(&dir.path().join("out.json"));
        assert_eq!(json["meta"]["group_key"], "grp_id");
        assert_eq!(json["evpi"].as_array().unwrap().len(), 2);
        assert_eq!(json["frontier"][1]["best"], 2);
        assert_eq!(json["mce"][0]["prob"], 1.0);
    }

    #[test]
    fn test_pairwise_uses_config_comparator() {
        let dir = tempdir().unwrap();
        let args = PairwiseArgs {
            input: input(dir.path()),
            comparator: None,
        };
        run_pairwise(&args).unwrap();

        let json = read_json(&dir.path().join("out.json"));
        assert_eq!(json["meta"]["comparator"], 1);
        assert_eq!(json["summary"][0]["icer"], 10.0);
        assert_eq!(json["delta"].as_array().unwrap().len(), 3);
        assert_eq!(json["ceac"][1]["prob"], 1.0);
    }

    #[test]
    fn test_icer_report() {
        let dir = tempdir().unwrap();
        let args = IcerArgs {
            pairwise: PairwiseArgs {
                input: input(dir.path()),
                comparator: Some(1),
            },
            k: Some(15.0),
            conf_level: None,
            pivot: Pivot::Strategy,
        };
        run_icer(&args).unwrap();

        let json = read_json(&dir.path().join("out.json"));
        assert_eq!(json["conf_level"], 0.95);
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3]["outcome"], "icer");
        assert_eq!(rows[3]["dominance"], "cost_effective");
    }

    #[test]
    fn test_icer_needs_threshold() {
        let dir = tempdir().unwrap();
        let args = IcerArgs {
            pairwise: PairwiseArgs {
                input: input(dir.path()),
                comparator: None,
            },
            k: None,
            conf_level: None,
            pivot: Pivot::None,
        };
        let err = run_icer(&args).unwrap_err();
        assert!(err.to_string().contains("decision threshold"));
    }

    #[test]
    fn test_unknown_comparator_is_reported() {
        let dir = tempdir().unwrap();
        let args = PairwiseArgs {
            input: input(dir.path()),
            comparator: Some(9),
        };
        let err = run_pairwise(&args).unwrap_err();
        assert!(format!("{err:?}").contains("comparator"));
    }
}
