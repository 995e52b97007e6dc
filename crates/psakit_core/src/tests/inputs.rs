//! Normalization and validation through the public entry points

use crate::cea::cea;
use crate::config::{AnalysisConfig, WtpSpec};
use crate::error::PsaError;
use crate::icer::icer;
use crate::model::{DrawTable, GroupId, SampleId, StrategyId};
use crate::normalize::{ColumnRoles, CostRecord, ModelOutputs, OutcomeRecord, RawTable};
use crate::pairwise::cea_pw;

/// Two strategies, two groups, two samples, in shuffled row order
fn grouped_raw() -> RawTable {
    RawTable::new()
        .with_column("draw", vec![2.0, 1.0, 1.0, 2.0, 1.0, 2.0, 2.0, 1.0])
        .with_column("arm", vec![2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0])
        .with_column("age_band", vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0])
        .with_column("qalys", vec![2.2, 2.0, 1.0, 1.2, 3.0, 3.2, 2.2, 2.0])
        .with_column("costs", vec![220.0, 200.0, 100.0, 120.0, 300.0, 320.0, 220.0, 200.0])
}

fn grouped_roles() -> ColumnRoles {
    ColumnRoles {
        sample: "draw".to_string(),
        strategy: "arm".to_string(),
        group: Some("age_band".to_string()),
        effect: "qalys".to_string(),
        cost: "costs".to_string(),
    }
}

fn config() -> AnalysisConfig {
    AnalysisConfig {
        wtp: WtpSpec::Values(vec![0.0, 50.0, 200.0]),
        ..Default::default()
    }
}

#[test]
fn test_grouped_columns_end_to_end() {
    let table = DrawTable::from_columns(&grouped_raw(), &grouped_roles()).unwrap();
    assert_eq!(table.groups(), &[GroupId(1), GroupId(2)]);

    let result = cea(&table, &config()).unwrap();
    assert_eq!(result.meta.strategy_key, "arm");
    assert_eq!(result.meta.group_key, "age_band");
    // 3 thresholds x 2 groups x 2 strategies
    assert_eq!(result.mce.len(), 12);
    assert_eq!(result.evpi.len(), 6);
    assert_eq!(result.nmb.len(), 12);

    // Arm 2 costs 100 more for 1 more unit of effect in both groups:
    // cheaper arm wins at k = 0 and k = 50, the effective arm at k = 200
    let best: Vec<StrategyId> = result.frontier.iter().map(|r| r.best).collect();
    assert_eq!(
        best,
        vec![
            StrategyId(1),
            StrategyId(1),
            StrategyId(1),
            StrategyId(1),
            StrategyId(2),
            StrategyId(2),
        ]
    );
}

#[test]
fn test_pairwise_by_group() {
    let table = DrawTable::from_columns(&grouped_raw(), &grouped_roles()).unwrap();
    let pw = cea_pw(&table, StrategyId(1), &config()).unwrap();

    assert_eq!(pw.summary.len(), 2);
    for row in &pw.summary {
        assert!((row.icer - 100.0).abs() < 1e-9, "{row:?}");
    }
    assert_eq!(pw.meta.group_key, "age_band");

    let rows = icer(&pw, 200.0, 0.9).unwrap();
    assert_eq!(rows.len(), 2 * 4);
}

#[test]
fn test_model_outputs_select_discount_rate_and_total_cost() {
    let mut outputs = ModelOutputs::default();
    for sample in 1..=2 {
        for strategy in 1..=2 {
            let key = (SampleId(sample), StrategyId(strategy));
            for (rate, scale) in [(0.0, 1.0), (0.03, 0.9)] {
                outputs.effects.push(OutcomeRecord {
                    sample: key.0,
                    strategy: key.1,
                    group: None,
                    discount_rate: rate,
                    value: scale * f64::from(strategy),
                });
                for (category, value) in [("drug", 5.0), ("total", 10.0)] {
                    outputs.costs.push(CostRecord {
                        sample: key.0,
                        strategy: key.1,
                        group: None,
                        discount_rate: rate,
                        category: category.to_string(),
                        value: scale * value * f64::from(strategy),
                    });
                }
            }
        }
    }

    let table = DrawTable::from_model_outputs(&outputs, 0.03, 0.03).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.groups(), &[GroupId::SENTINEL]);
    assert!((table.draws()[1].effect - 1.8).abs() < 1e-12);
    assert!((table.draws()[1].cost - 18.0).abs() < 1e-12);

    let pw = cea_pw(&table, StrategyId(1), &config()).unwrap();
    assert!((pw.summary[0].icer - 10.0).abs() < 1e-9);
}

#[test]
fn test_validation_runs_before_kernels() {
    let table = DrawTable::from_columns(&grouped_raw(), &grouped_roles()).unwrap();

    let bad_level = AnalysisConfig {
        interval_level: 1.5,
        ..config()
    };
    assert_eq!(
        cea(&table, &bad_level),
        Err(PsaError::InvalidConfidenceLevel(1.5))
    );

    let bad_grid = AnalysisConfig {
        wtp: WtpSpec::Values(vec![0.0, -1.0]),
        ..config()
    };
    assert_eq!(
        cea_pw(&table, StrategyId(1), &bad_grid),
        Err(PsaError::InvalidThreshold {
            index: 1,
            value: -1.0
        })
    );

    assert_eq!(
        cea_pw(&table, StrategyId(7), &config()),
        Err(PsaError::UnknownComparator(StrategyId(7)))
    );
}

#[test]
fn test_missing_draw_is_an_imbalance() {
    // Drop arm 2, draw 2 of band 2
    let mut raw = RawTable::new();
    for name in ["draw", "arm", "age_band", "qalys", "costs"] {
        let mut column = grouped_raw().column(name).unwrap().to_vec();
        column.remove(5);
        raw.push_column(name, column);
    }
    let table = DrawTable::from_columns(&raw, &grouped_roles()).unwrap();

    let expected = PsaError::UnbalancedPanel {
        group: GroupId(2),
        strategy: StrategyId(2),
        reference: StrategyId(1),
    };
    assert_eq!(cea(&table, &config()).err(), Some(expected.clone()));
    assert_eq!(cea_pw(&table, StrategyId(1), &config()).err(), Some(expected));
}

#[test]
fn test_groups_must_share_sample_count() {
    // Band 2 has only draw 1 for both arms
    let raw = RawTable::new()
        .with_column("draw", vec![1.0, 2.0, 1.0, 2.0, 1.0, 1.0])
        .with_column("arm", vec![1.0, 1.0, 2.0, 2.0, 1.0, 2.0])
        .with_column("age_band", vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0])
        .with_column("qalys", vec![1.0; 6])
        .with_column("costs", vec![1.0; 6]);
    let table = DrawTable::from_columns(&raw, &grouped_roles()).unwrap();

    assert_eq!(
        cea(&table, &config()),
        Err(PsaError::UnequalSampleCounts {
            group: GroupId(2),
            expected: 2,
            found: 1,
        })
    );
}

#[test]
fn test_nan_propagates_to_its_cells() {
    let mut raw = RawTable::new();
    for name in ["draw", "arm", "age_band", "qalys", "costs"] {
        let mut column = grouped_raw().column(name).unwrap().to_vec();
        if name == "qalys" {
            // Band 2, arm 2, draw 1
            column[4] = f64::NAN;
        }
        raw.push_column(name, column);
    }
    let table = DrawTable::from_columns(&raw, &grouped_roles()).unwrap();
    let result = cea(&table, &config()).unwrap();

    for row in &result.evpi {
        assert_eq!(row.evpi.is_nan(), row.group == GroupId(2), "{row:?}");
    }
    for row in &result.mce {
        assert_eq!(row.prob.is_nan(), row.group == GroupId(2), "{row:?}");
    }
    // The finite strategy stays selectable in the poisoned group
    assert!(
        result
            .frontier
            .iter()
            .filter(|r| r.group == GroupId(2))
            .all(|r| r.best == StrategyId(1))
    );
}
