//! Square of Nine reference levels
//!
//! A level sits at `(sqrt(base) + angle / 360)^2`: one full revolution (360°)
//! moves the square root of the price up by exactly one.

use crate::core::types::ReferenceLevel;

pub const FULL_REVOLUTION: f64 = 360.0;

/// Price of the level `angle` degrees around the square from `base_price`.
pub fn level_price(base_price: f64, angle: f64) -> f64 {
    (base_price.sqrt() + angle / FULL_REVOLUTION).powi(2)
}

/// Levels for every multiple of `angle_step` from 0° through 360° inclusive,
/// in ascending price order.
pub fn reference_levels(base_price: f64, angle_step: f64) -> Vec<ReferenceLevel> {
    if base_price <= 0.0 || angle_step <= 0.0 {
        return Vec::new();
    }

    let steps = (FULL_REVOLUTION / angle_step).round() as usize;
    (0..=steps)
        .map(|i| {
            let angle = i as f64 * angle_step;
            ReferenceLevel {
                angle,
                price: level_price(base_price, angle),
            }
        })
        .collect()
}
