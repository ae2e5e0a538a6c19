pub mod gbm;
pub mod risk;
pub mod twap;

pub use gbm::GbmEstimate;
pub use gbm::GbmEstimator;
pub use risk::{quantile_from_decimal, value_at_risk, value_at_risk_grid, DEFAULT_HORIZONS, DEFAULT_QUANTILES};
pub use twap::{log_twaps_from_tick_cumulatives, twaps_from_cumulatives};
pub use twap::{Observation, PriceDirection, TickObservation};
