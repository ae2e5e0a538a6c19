pub mod market;

pub use market::Market;
