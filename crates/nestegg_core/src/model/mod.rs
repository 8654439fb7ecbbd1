mod market;
mod profile;
mod results;
mod rmd;
mod state_profile;
mod state_table;
mod tax;

pub use market::{
    FALLBACK_DIVIDEND_YIELD, HistoricalReturnSeries, MAX_PLAUSIBLE_DIVIDEND_YIELD, ManualQuote,
    MarketSnapshot, QuoteCache, QuoteSource, SP_500_ANNUAL_RETURNS, cached_quote,
    effective_dividend_yield,
};
pub use profile::{CustomStateInput, RetirementProfile, RetirementProfileInput};
pub use results::{
    AnalysisReport, AnnualWithdrawalPlan, PlausibilityWarning, RecommendedAction, RmdStatus,
    SurvivalForecast,
};
pub use rmd::{RmdTable, RmdTableEntry, TERMINAL_DIVISOR};
pub use state_profile::{RetirementExclusion, StateTaxMethod, StateTaxProfile};
pub use state_table::StateTaxTable;
pub use tax::{FederalTaxBreakdown, FilingStatus, StateTaxBreakdown, TaxBracket, TaxResult};
