pub mod bits;
pub mod math;
pub mod fixedpoint;
pub mod logexpmath;
pub mod i256;

pub use fixedpoint::FixedPoint;
pub use i256::I256;
pub use logexpmath::{LogExpMath, FIXED_1, FIXED_2, OPT_EXP_MAX_VAL};
pub use math::Math;
