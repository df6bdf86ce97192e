//! Menopause outcome derivation
//!
//! Three tri-state outputs per record: `cause_flag` (period stopped
//! surgically), `outcome_any` (menopausal by any route), and
//! `outcome_excl_cause` (menopausal excluding surgical cause).
//!
//! `outcome_any` is built from an ordered rule list. Each rule fills only
//! rows that are still unknown, so earlier rules always win over later ones
//! — precedence is a contract here, not an accident of statement order.
//! Rules:
//!
//! 1. months-since-period in the recent band ⇒ false,
//!    in the long-elapsed band ⇒ true, outside both bands ⇒ unchanged
//! 2. amenorrheic = yes, and not currently pregnant ⇒ true
//!
//! Records untouched by every rule stay unknown, as do whole countries whose
//! sources carry none of the indicators.

use surveypool_core::Table;

use crate::fields::raw;
use crate::params::DeriveParams;

/// Derived outcome columns, one value per table row.
pub struct Outcomes {
    pub any: Vec<Option<bool>>,
    pub excl_cause: Vec<Option<bool>>,
    pub cause: Vec<Option<bool>>,
}

/// Apply one derivation rule to the rows still unknown.
///
/// The guard is what makes precedence explicit: a later rule can never
/// overwrite what an earlier rule decided.
fn fill_unknown(target: &mut [Option<bool>], rule: impl Fn(usize) -> Option<bool>) {
    for (row, slot) in target.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = rule(row);
        }
    }
}

pub fn derive_outcomes(table: &Table, params: &DeriveParams) -> Outcomes {
    let n = table.num_rows();
    let yes = params.yes_code;

    // Surgical cause. A present indicator answers yes/no per row; an absent
    // indicator leaves the whole country unknown — absence of the question
    // is not a "no" answer.
    let surgery = table.resolve_i64(raw::PERIOD_REMOVED_SURGERY);
    let cause: Vec<Option<bool>> = if surgery.present {
        surgery.values.iter().map(|v| v.map(|c| c == yes)).collect()
    } else {
        vec![None; n]
    };

    let mut any: Vec<Option<bool>> = vec![None; n];

    // Rule 1 (primary): months since last period. Band edges inclusive;
    // values outside both bands (special codes, implausible values) are left
    // for later rules.
    let months = table.resolve_i64(raw::MONTHS_SINCE_PERIOD);
    if months.present {
        fill_unknown(&mut any, |row| match months.values[row] {
            Some(m) if (0..=params.recent_months_max).contains(&m) => Some(false),
            Some(m) if (params.long_elapsed_min..=params.long_elapsed_max).contains(&m) => {
                Some(true)
            }
            _ => None,
        });
    }

    // Rule 2 (fallback): amenorrheic and not pregnant. Only ever asserts
    // true; a "no" here says nothing about menopause status.
    let amenorrheic = table.resolve_i64(raw::AMENORRHEIC);
    let pregnant = table.resolve_i64(raw::CURRENTLY_PREGNANT);
    if amenorrheic.present {
        fill_unknown(&mut any, |row| {
            let is_amenorrheic = amenorrheic.values[row] == Some(yes);
            let maybe_pregnant = pregnant.present && pregnant.values[row] == Some(yes);
            if is_amenorrheic && !maybe_pregnant {
                Some(true)
            } else {
                None
            }
        });
    }

    // Exclusion: where the period was removed surgically, menopause status
    // net of that cause is unknowable, whatever outcome_any says.
    let mut excl_cause = any.clone();
    for (slot, flag) in excl_cause.iter_mut().zip(&cause) {
        if *flag == Some(true) {
            *slot = None;
        }
    }

    Outcomes {
        any,
        excl_cause,
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveypool_core::Column;

    fn table_with(columns: &[(&str, Column)]) -> Table {
        let n = columns.first().map_or(0, |(_, c)| c.len());
        let mut t = Table::with_rows(n);
        for (name, col) in columns {
            t.set_column(name, col.clone()).unwrap();
        }
        t
    }

    fn ints(values: &[Option<i64>]) -> Column {
        Column::Int64(values.to_vec())
    }

    #[test]
    fn primary_rule_bands() {
        let t = table_with(&[(
            raw::MONTHS_SINCE_PERIOD,
            ints(&[Some(0), Some(11), Some(12), Some(360), Some(361), Some(996), None]),
        )]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(
            o.any,
            vec![
                Some(false), // recent band lower edge
                Some(false), // recent band upper edge
                Some(true),  // long-elapsed lower edge
                Some(true),  // long-elapsed upper edge
                None,        // above the band: implausible/special code
                None,        // special code
                None,        // null cell
            ]
        );
    }

    #[test]
    fn negative_months_stay_unknown() {
        let t = table_with(&[(raw::MONTHS_SINCE_PERIOD, ints(&[Some(-3)]))]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![None]);
    }

    #[test]
    fn fallback_fires_only_where_primary_left_unknown() {
        let t = table_with(&[
            (raw::MONTHS_SINCE_PERIOD, ints(&[Some(5), Some(400)])),
            (raw::AMENORRHEIC, ints(&[Some(1), Some(1)])),
        ]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        // Row 0: primary said false; fallback must not flip it.
        // Row 1: primary out of band; fallback applies.
        assert_eq!(o.any, vec![Some(false), Some(true)]);
    }

    #[test]
    fn primary_wins_even_when_fallback_would_disagree() {
        // Pregnant + amenorrheic: fallback alone would abstain, but the
        // months band already decided. Detects later-rule-wins regressions.
        let t = table_with(&[
            (raw::MONTHS_SINCE_PERIOD, ints(&[Some(24)])),
            (raw::AMENORRHEIC, ints(&[Some(1)])),
            (raw::CURRENTLY_PREGNANT, ints(&[Some(1)])),
        ]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![Some(true)]);
    }

    #[test]
    fn fallback_only_activation_without_months_field() {
        let t = table_with(&[(raw::AMENORRHEIC, ints(&[Some(1), Some(0), None]))]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![Some(true), None, None]);
    }

    #[test]
    fn fallback_blocked_by_pregnancy() {
        let t = table_with(&[
            (raw::AMENORRHEIC, ints(&[Some(1), Some(1)])),
            (raw::CURRENTLY_PREGNANT, ints(&[Some(1), Some(0)])),
        ]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![None, Some(true)]);
    }

    #[test]
    fn fallback_allows_absent_pregnancy_field() {
        let t = table_with(&[(raw::AMENORRHEIC, ints(&[Some(1)]))]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![Some(true)]);
    }

    #[test]
    fn cause_flag_tristate() {
        let t = table_with(&[(
            raw::PERIOD_REMOVED_SURGERY,
            ints(&[Some(1), Some(0), None]),
        )]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.cause, vec![Some(true), Some(false), None]);
    }

    #[test]
    fn absent_cause_indicator_is_unknown_not_false() {
        let t = table_with(&[(raw::MONTHS_SINCE_PERIOD, ints(&[Some(24)]))]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.cause, vec![None]);
    }

    #[test]
    fn cause_exclusion_forces_unknown() {
        let t = table_with(&[
            (raw::MONTHS_SINCE_PERIOD, ints(&[Some(24), Some(24), Some(5)])),
            (raw::PERIOD_REMOVED_SURGERY, ints(&[Some(1), Some(0), Some(1)])),
        ]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![Some(true), Some(true), Some(false)]);
        assert_eq!(o.excl_cause, vec![None, Some(true), None]);
    }

    #[test]
    fn no_indicators_at_all_everything_unknown() {
        let t = table_with(&[("age_years", ints(&[Some(40), Some(45)]))]);
        let o = derive_outcomes(&t, &DeriveParams::default());
        assert_eq!(o.any, vec![None, None]);
        assert_eq!(o.excl_cause, vec![None, None]);
        assert_eq!(o.cause, vec![None, None]);
    }
}
