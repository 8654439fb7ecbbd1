//! RMD (Required Minimum Distribution) tests
//!
//! Uniform Lifetime Table lookups, the SECURE 2.0 start ages, and how the
//! RMD floor interacts with planned spending.

use crate::model::{RmdStatus, RmdTable, TERMINAL_DIVISOR};
use crate::rmd::{rmd_start_age, withdrawal_plan};

// ============================================================================
// Divisor lookups
// ============================================================================

#[test]
fn test_factor_zero_before_start_age() {
    let table = RmdTable::irs_uniform_lifetime();
    for age in 0..73 {
        assert_eq!(table.factor(age, 73), 0.0, "age {age} should have no RMD");
    }
}

#[test]
fn test_factor_age_75_start_73() {
    let table = RmdTable::irs_uniform_lifetime();
    assert_eq!(table.factor(75, 73), 24.6, "Age 75 divisor should be 24.6");
}

#[test]
fn test_factor_exact_hits_across_table() {
    let table = RmdTable::irs_uniform_lifetime();
    for age in 72u32..=120 {
        let expected = table.divisor_for_age(age as u8);
        assert!(expected.is_some(), "table missing age {age}");
        assert_eq!(Some(table.factor(age, 72)), expected);
    }
    assert_eq!(table.factor(120, 72), 2.0);
}

#[test]
fn test_factor_beyond_table() {
    let table = RmdTable::irs_uniform_lifetime();
    assert_eq!(table.factor(121, 73), TERMINAL_DIVISOR);
    assert_eq!(table.factor(135, 73), TERMINAL_DIVISOR);
}

#[test]
fn test_divisors_decrease_with_age() {
    let table = RmdTable::irs_uniform_lifetime();
    for pair in table.entries.windows(2) {
        assert!(
            pair[1].divisor <= pair[0].divisor,
            "divisor rose from age {} to {}",
            pair[0].age,
            pair[1].age
        );
    }
}

#[test]
fn test_sparse_table_does_not_interpolate() {
    let mut table = RmdTable::irs_uniform_lifetime();
    table.entries.retain(|e| e.age != 80);
    assert_eq!(table.factor(80, 73), 0.0);
    assert_eq!(table.factor(81, 73), 19.4);
}

// ============================================================================
// Plans
// ============================================================================

#[test]
fn test_plan_uses_birth_year_start_age() {
    let table = RmdTable::irs_uniform_lifetime();
    // Born 1952: RMDs start at 73, so a 72-year-old has none
    let start = rmd_start_age(1952);
    let plan = withdrawal_plan(20_000.0, 2_000_000.0, 72, start, &table);
    assert_eq!(plan.rmd_status(), RmdStatus::NotRequired);

    // Born 1950: RMDs started at 72
    let start = rmd_start_age(1950);
    let plan = withdrawal_plan(20_000.0, 2_000_000.0, 72, start, &table);
    assert!((plan.rmd_amount - 2_000_000.0 / 27.4).abs() < 1e-6);
    assert_eq!(plan.rmd_status(), RmdStatus::Increased);
}

#[test]
fn test_plan_never_below_planned_spend() {
    let table = RmdTable::irs_uniform_lifetime();
    for age in 60..=110 {
        let plan = withdrawal_plan(50_000.0, 750_000.0, age, 73, &table);
        assert!(plan.ira_withdrawal >= 50_000.0);
        assert!(plan.ira_withdrawal >= plan.rmd_amount);
    }
}
