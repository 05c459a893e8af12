//! Curve and fixed-point math.
//!
//! All reserve and fee computations route through [`fixed_point`] so that
//! rounding is uniform: floor unless a function is explicitly rounding up.

pub mod constant_price;
pub mod constant_product;
pub mod fixed_point;

pub use fixed_point::{mul_div, mul_div_ceil};
