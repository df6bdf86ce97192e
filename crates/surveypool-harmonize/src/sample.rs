//! Analysis-sample inclusion flag

use surveypool_core::{Column, Table};

use crate::fields::derived;
use crate::params::DeriveParams;

/// `sample_flag` is true iff age falls in the inclusion band (inclusive both
/// ends) and `outcome_excl_cause` is known. Unlike the outcomes this is a
/// plain boolean: a record with unknown age is simply out of the sample.
///
/// Pure function of stored fields — the pooled table can recompute it and
/// get bit-identical results, which the integration tests rely on.
pub fn derive_sample_flag(table: &Table, params: &DeriveParams) -> Vec<Option<bool>> {
    let age = table.resolve_i64(derived::AGE_YEARS);
    // outcome_excl_cause is always boolean after harmonization; anything
    // else counts as unknown and keeps the record out of the sample.
    let outcome_known: Vec<bool> = match table.column(derived::OUTCOME_EXCL_CAUSE) {
        Some(Column::Boolean(v)) => v.iter().map(Option::is_some).collect(),
        _ => vec![false; table.num_rows()],
    };

    (0..table.num_rows())
        .map(|row| {
            let in_band = matches!(
                age.values[row],
                Some(a) if (params.sample_age_min..=params.sample_age_max).contains(&a)
            );
            Some(in_band && outcome_known[row])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveypool_core::Column;

    fn table(ages: Vec<Option<i64>>, outcomes: Vec<Option<bool>>) -> Table {
        let mut t = Table::with_rows(ages.len());
        t.set_column(derived::AGE_YEARS, Column::Int64(ages)).unwrap();
        t.set_column(derived::OUTCOME_EXCL_CAUSE, Column::Boolean(outcomes))
            .unwrap();
        t
    }

    #[test]
    fn age_band_boundaries() {
        let t = table(
            vec![Some(34), Some(35), Some(49), Some(50)],
            vec![Some(true), Some(true), Some(false), Some(true)],
        );
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(false), Some(true), Some(true), Some(false)]
        );
    }

    #[test]
    fn unknown_outcome_excludes() {
        let t = table(vec![Some(40), Some(49)], vec![None, None]);
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(false), Some(false)]
        );
    }

    #[test]
    fn known_false_outcome_still_included() {
        let t = table(vec![Some(40)], vec![Some(false)]);
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(true)]
        );
    }

    #[test]
    fn unknown_age_excludes() {
        let t = table(vec![None], vec![Some(true)]);
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(false)]
        );
    }

    #[test]
    fn non_boolean_outcome_column_treated_as_unknown() {
        let mut t = Table::with_rows(1);
        t.set_column(derived::AGE_YEARS, Column::Int64(vec![Some(40)]))
            .unwrap();
        t.set_column(derived::OUTCOME_EXCL_CAUSE, Column::Int64(vec![Some(1)]))
            .unwrap();
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(false)]
        );
    }

    #[test]
    fn missing_columns_all_false() {
        let mut t = Table::with_rows(2);
        t.set_column("wealth_z", Column::Float64(vec![Some(0.1), Some(0.2)]))
            .unwrap();
        assert_eq!(
            derive_sample_flag(&t, &DeriveParams::default()),
            vec![Some(false), Some(false)]
        );
    }
}
