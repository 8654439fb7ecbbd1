//! Monte Carlo portfolio survival
//!
//! Each trajectory replays the historical return series from a random start
//! year, drawing the year's withdrawal from cash first and refilling the cash
//! buffer from stocks only after an up year. A trajectory is a pure function
//! of its inputs and seed; trajectory seeds come from per-batch generators
//! seeded off the master seed, so parallel and sequential runs agree.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use crate::config::{EngineConfig, SimulationParams};
use crate::error::{ConfigError, SimulationError};
use crate::glide_path::target_cash_buffer;
use crate::model::{HistoricalReturnSeries, RmdTable, SurvivalForecast};
use crate::rmd::required_amount;

const MAX_BATCH_SIZE: usize = 100;

/// Starting point of every trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInputs {
    pub age: u32,
    pub rmd_start_age: u32,
    pub cash_balance: f64,
    pub stock_balance: f64,
    /// First-year spending before any RMD floor
    pub annual_withdrawal: f64,
    /// Yield split out of the total return and paid to cash
    pub dividend_yield: f64,
}

/// Ages at which survival is reported: every multiple of 5 strictly above
/// `age`, up to `terminal_age` inclusive.
pub fn milestone_ages(age: u32, terminal_age: u32) -> Vec<u32> {
    let first = (age / 5 + 1) * 5;
    (first..=terminal_age).step_by(5).collect()
}

/// Tables a trajectory reads
#[derive(Clone, Copy)]
struct Market<'a> {
    returns: &'a HistoricalReturnSeries,
    rmd_table: &'a RmdTable,
    params: &'a SimulationParams,
}

/// Balances carried from one simulated year to the next
#[derive(Debug, Clone, Copy, PartialEq)]
struct YearState {
    stocks: f64,
    cash: f64,
    /// Planned spending for the year, before the RMD floor
    withdrawal: f64,
}

/// Historical returns for `years` consecutive years starting at `start`
fn yearly_returns(
    series: &HistoricalReturnSeries,
    start: usize,
    years: usize,
) -> impl Iterator<Item = f64> + '_ {
    (0..years).map(move |k| series.at(start + k))
}

/// Play one year at `age`: withdraw from cash first, then apply the market
/// and top up the cash buffer after an up year.
///
/// Returns the amount withdrawn, or `None` once the portfolio is exhausted.
fn step_year(
    state: &mut YearState,
    age: u32,
    total_return: f64,
    inputs: &SimulationInputs,
    market: Market<'_>,
) -> Option<f64> {
    let factor = market.rmd_table.factor(age, inputs.rmd_start_age);
    let this_year = state
        .withdrawal
        .max(required_amount(state.stocks + state.cash, factor));
    let target = target_cash_buffer(this_year, age, market.params.inflation_rate);

    let from_cash = this_year.min(state.cash);
    state.cash -= from_cash;
    state.stocks -= this_year - from_cash;
    if state.stocks + state.cash <= 0.0 {
        return None;
    }

    let dividend_yield = inputs.dividend_yield;
    state.stocks *= 1.0 + total_return - dividend_yield;
    state.cash += state.stocks * dividend_yield;

    // Never sell stocks into a loss
    if total_return > 0.0 && state.cash < target {
        let refill = state.stocks.min(target - state.cash);
        state.stocks -= refill;
        state.cash += refill;
    }
    Some(this_year)
}

/// Run one trajectory, returning whether it was still funded at each milestone
fn simulate_trajectory(
    inputs: &SimulationInputs,
    market: Market<'_>,
    milestones: &[u32],
    seed: u64,
) -> Vec<bool> {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
    let start = rng.random_range(0..market.returns.len());
    let terminal_age = market.params.terminal_age;
    let years = terminal_age.saturating_sub(inputs.age) as usize + 1;

    let mut state = YearState {
        stocks: inputs.stock_balance,
        cash: inputs.cash_balance,
        withdrawal: inputs.annual_withdrawal,
    };
    let mut survived = vec![false; milestones.len()];

    let ages = inputs.age..=terminal_age;
    for (age, total_return) in ages.zip(yearly_returns(market.returns, start, years)) {
        if step_year(&mut state, age, total_return, inputs, market).is_none() {
            break;
        }
        if let Ok(slot) = milestones.binary_search(&age) {
            survived[slot] = true;
        }
        state.withdrawal *= 1.0 + market.params.inflation_rate;
    }

    survived
}

/// Survival counts per milestone for one batch of trajectories
fn simulate_batch(
    inputs: &SimulationInputs,
    market: Market<'_>,
    milestones: &[u32],
    batch: usize,
    batch_size: usize,
) -> Vec<usize> {
    let mut rng =
        rand::rngs::SmallRng::seed_from_u64(market.params.seed.wrapping_add(batch as u64));
    let mut counts = vec![0usize; milestones.len()];

    for _ in 0..batch_size {
        let seed = rng.next_u64();
        let survived = simulate_trajectory(inputs, market, milestones, seed);
        for (count, alive) in counts.iter_mut().zip(survived) {
            *count += usize::from(alive);
        }
    }
    counts
}

fn sum_counts(mut a: Vec<usize>, b: Vec<usize>) -> Vec<usize> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

fn batch_size(batch: usize, num_batches: usize, trajectories: usize) -> usize {
    if batch == num_batches - 1 {
        trajectories - batch * MAX_BATCH_SIZE
    } else {
        MAX_BATCH_SIZE
    }
}

fn check_config(config: &EngineConfig) -> Result<(), SimulationError> {
    if config.simulation.trajectories == 0 {
        return Err(SimulationError::NoTrajectories);
    }
    if config.returns.is_empty() {
        return Err(ConfigError::EmptyHistoricalData.into());
    }
    Ok(())
}

fn into_forecast(
    milestones: Vec<u32>,
    counts: Vec<usize>,
    trajectories: usize,
) -> SurvivalForecast {
    let by_age = milestones
        .into_iter()
        .zip(counts)
        .map(|(age, alive)| (age, alive as f64 / trajectories as f64 * 100.0))
        .collect();
    SurvivalForecast {
        trajectories,
        by_age,
    }
}

/// Survival forecast using the configured number of trajectories.
///
/// With the `parallel` feature batches run on the rayon pool; the result is
/// identical to [`monte_carlo_sequential`] for the same seed.
pub fn monte_carlo(
    inputs: &SimulationInputs,
    config: &EngineConfig,
) -> Result<SurvivalForecast, SimulationError> {
    #[cfg(feature = "parallel")]
    {
        check_config(config)?;
        let trajectories = config.simulation.trajectories;
        let milestones = milestone_ages(inputs.age, config.simulation.terminal_age);
        let market = Market {
            returns: &config.returns,
            rmd_table: &config.rmd_table,
            params: &config.simulation,
        };
        let num_batches = trajectories.div_ceil(MAX_BATCH_SIZE);

        let counts = (0..num_batches)
            .into_par_iter()
            .map(|batch| {
                let size = batch_size(batch, num_batches, trajectories);
                simulate_batch(inputs, market, &milestones, batch, size)
            })
            .reduce(|| vec![0; milestones.len()], sum_counts);

        let forecast = into_forecast(milestones, counts, trajectories);
        debug!(
            trajectories,
            terminal_survival = forecast.terminal_survival(),
            "monte carlo complete"
        );
        Ok(forecast)
    }

    #[cfg(not(feature = "parallel"))]
    monte_carlo_sequential(inputs, config)
}

/// Single-threaded evaluation of the same batches [`monte_carlo`] runs
pub fn monte_carlo_sequential(
    inputs: &SimulationInputs,
    config: &EngineConfig,
) -> Result<SurvivalForecast, SimulationError> {
    check_config(config)?;
    let trajectories = config.simulation.trajectories;
    let milestones = milestone_ages(inputs.age, config.simulation.terminal_age);
    let market = Market {
        returns: &config.returns,
        rmd_table: &config.rmd_table,
        params: &config.simulation,
    };
    let num_batches = trajectories.div_ceil(MAX_BATCH_SIZE);

    let counts = (0..num_batches)
        .map(|batch| {
            let size = batch_size(batch, num_batches, trajectories);
            simulate_batch(inputs, market, &milestones, batch, size)
        })
        .fold(vec![0; milestones.len()], sum_counts);

    let forecast = into_forecast(milestones, counts, trajectories);
    debug!(
        trajectories,
        terminal_survival = forecast.terminal_survival(),
        "monte carlo complete"
    );
    Ok(forecast)
}
