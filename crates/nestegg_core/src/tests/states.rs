//! Built-in state table checks

use crate::model::{FilingStatus, StateTaxMethod, StateTaxTable};
use crate::state_tax::state_tax;

#[test]
fn test_no_tax_states_owe_nothing() {
    let table = StateTaxTable::us_2024();
    let no_tax: Vec<_> = table
        .iter()
        .filter(|p| matches!(p.method, StateTaxMethod::NoTax))
        .collect();
    assert!(no_tax.len() >= 7, "expected the income-tax-free states");

    for profile in no_tax {
        let result = state_tax(500_000.0, 50_000.0, FilingStatus::Single, profile);
        assert_eq!(result.tax, 0.0, "{} charged tax", profile.name);
    }
}

#[test]
fn test_joint_never_owes_more_than_single_on_same_income() {
    let table = StateTaxTable::us_2024();
    for profile in table.iter() {
        let single = state_tax(90_000.0, 20_000.0, FilingStatus::Single, profile);
        let joint = state_tax(90_000.0, 20_000.0, FilingStatus::Joint, profile);
        assert!(
            joint.tax <= single.tax + 1e-9,
            "{}: joint {} > single {}",
            profile.name,
            joint.tax,
            single.tax
        );
    }
}
