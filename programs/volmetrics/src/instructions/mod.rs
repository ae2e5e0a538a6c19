pub mod initialize_market;
pub mod modify_params;
pub mod update_metrics;
pub mod quote_risk;

pub use initialize_market::*;
pub use modify_params::*;
pub use update_metrics::*;
pub use quote_risk::*;
