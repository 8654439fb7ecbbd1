//! Age-based cash buffer
//!
//! The buffer holds several years of withdrawals in cash so a down market
//! never forces stock sales. It grows from 3 to 5 years as the retiree ages.

/// Years of withdrawals the cash buffer should cover at `age`
pub fn buffer_years(age: u32) -> u32 {
    if age < 75 {
        3
    } else if age < 85 {
        4
    } else {
        5
    }
}

/// Sum of the next [`buffer_years`] withdrawals, each grown by inflation
pub fn target_cash_buffer(annual_withdrawal: f64, age: u32, inflation_rate: f64) -> f64 {
    let mut total = 0.0;
    let mut yearly = annual_withdrawal;
    for _ in 0..buffer_years(age) {
        total += yearly;
        yearly *= 1.0 + inflation_rate;
    }
    total
}
