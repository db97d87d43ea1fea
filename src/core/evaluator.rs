// Signal evaluation: Square of Nine crossings confirmed by volume, filtered by spread

use crate::config::SignalConfig;
use crate::core::gann::reference_levels;
use crate::core::types::{Direction, PriceSample, Quote, ReferenceLevel, Signal};

/// Why a tick did or did not produce a signal
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    Signal(Signal),
    InsufficientData { needed: usize, available: usize },
    MalformedSample { index: usize },
    NoCrossing,
    VolumeNotConfirmed { direction: Direction, level: ReferenceLevel, volume_ratio: f64 },
    SpreadTooWide { direction: Direction, level: ReferenceLevel, spread: f64 },
}

impl Assessment {
    pub fn signal(&self) -> Option<Signal> {
        match self {
            Assessment::Signal(signal) => Some(*signal),
            _ => None,
        }
    }

    /// Data-quality failures, as opposed to a market that simply gave no setup
    pub fn is_data_failure(&self) -> bool {
        matches!(
            self,
            Assessment::InsufficientData { .. } | Assessment::MalformedSample { .. }
        )
    }
}

/// Stateless evaluator; every call depends only on its arguments and config.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    config: SignalConfig,
}

impl SignalEvaluator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Samples needed: the latest bar plus the volume lookback before it.
    pub fn required_samples(&self) -> usize {
        self.config.volume_lookback.max(1) + 1
    }

    pub fn evaluate(&self, window: &[PriceSample], quote: &Quote, base_price: f64) -> Option<Signal> {
        self.assess(window, quote, base_price).signal()
    }

    pub fn assess(&self, window: &[PriceSample], quote: &Quote, base_price: f64) -> Assessment {
        let needed = self.required_samples();
        if window.len() < needed {
            return Assessment::InsufficientData {
                needed,
                available: window.len(),
            };
        }

        if let Some(index) = window
            .iter()
            .position(|s| !s.close.is_finite() || !s.volume.is_finite() || s.volume < 0.0)
        {
            return Assessment::MalformedSample { index };
        }

        let latest = &window[window.len() - 1];
        let previous = &window[window.len() - 2];
        let levels = reference_levels(base_price, self.config.angle_step);

        let (direction, level) = match find_crossing(&levels, previous.close, latest.close) {
            Some(crossing) => crossing,
            None => return Assessment::NoCrossing,
        };

        let volume_ratio = volume_ratio(window, self.config.volume_lookback).unwrap_or(0.0);
        if volume_ratio <= self.config.volume_ratio_threshold {
            return Assessment::VolumeNotConfirmed {
                direction,
                level,
                volume_ratio,
            };
        }

        let spread = quote.spread_points(self.config.point_size);
        if spread > self.config.spread_limit {
            return Assessment::SpreadTooWide {
                direction,
                level,
                spread,
            };
        }

        Assessment::Signal(Signal {
            direction,
            level,
            volume_ratio,
            spread,
        })
    }
}

/// Level crossed between two consecutive closes. A level equal to `previous`
/// is already reached and one equal to `latest` is only touched, so neither
/// counts. On a multi-level move the level nearest `latest` wins.
pub fn find_crossing(
    levels: &[ReferenceLevel],
    previous: f64,
    latest: f64,
) -> Option<(Direction, ReferenceLevel)> {
    if latest > previous {
        levels
            .iter()
            .filter(|l| l.price > previous && l.price < latest)
            .max_by(|a, b| a.price.total_cmp(&b.price))
            .map(|l| (Direction::Up, *l))
    } else if latest < previous {
        levels
            .iter()
            .filter(|l| l.price < previous && l.price > latest)
            .min_by(|a, b| a.price.total_cmp(&b.price))
            .map(|l| (Direction::Down, *l))
    } else {
        None
    }
}

/// Latest volume over the mean of the `lookback` samples before it.
/// `None` when the window is too short or the mean is zero.
pub fn volume_ratio(window: &[PriceSample], lookback: usize) -> Option<f64> {
    if lookback == 0 || window.len() < lookback + 1 {
        return None;
    }

    let latest = window[window.len() - 1].volume;
    let preceding = &window[window.len() - 1 - lookback..window.len() - 1];
    let mean = preceding.iter().map(|s| s.volume).sum::<f64>() / lookback as f64;

    if mean > 0.0 {
        Some(latest / mean)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample(i: i64, close: f64, volume: f64) -> PriceSample {
        PriceSample {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap() + Duration::minutes(i),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn window(closes: &[f64], volumes: &[f64]) -> Vec<PriceSample> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| sample(i as i64, c, v))
            .collect()
    }

    fn quote(spread: f64) -> Quote {
        Quote {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 10, 6, 0).unwrap(),
            bid: 147.0,
            ask: 147.0 + spread,
        }
    }

    fn evaluator() -> SignalEvaluator {
        SignalEvaluator::new(SignalConfig {
            point_size: 1.0,
            ..SignalConfig::default()
        })
    }

    #[test]
    fn test_up_crossing_with_volume_and_tight_spread() {
        let w = window(&[145.0, 145.5, 145.8, 146.0, 146.2, 147.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 250.0]);
        let signal = evaluator().evaluate(&w, &quote(1.0), 144.0).expect("signal");

        assert_eq!(signal.direction, Direction::Up);
        assert_eq!(signal.level.angle, 45.0);
        assert!((signal.level.price - 146.890625).abs() < 1e-9);
        assert!((signal.volume_ratio - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_wide_spread_suppresses_signal() {
        let w = window(&[145.0, 145.5, 145.8, 146.0, 146.2, 147.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 250.0]);
        let assessment = evaluator().assess(&w, &quote(2.5), 144.0);

        assert!(matches!(assessment, Assessment::SpreadTooWide { direction: Direction::Up, .. }));
        assert!(assessment.signal().is_none());
    }

    #[test]
    fn test_volume_ratio_at_threshold_does_not_confirm() {
        let w = window(&[145.0, 145.5, 145.8, 146.0, 146.2, 147.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 200.0]);
        let assessment = evaluator().assess(&w, &quote(1.0), 144.0);
        assert!(matches!(assessment, Assessment::VolumeNotConfirmed { .. }));
    }

    #[test]
    fn test_down_crossing() {
        let w = window(&[151.0, 151.0, 151.0, 151.0, 151.0, 148.0], &[100.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
        let signal = evaluator().evaluate(&w, &quote(1.0), 144.0).expect("signal");

        assert_eq!(signal.direction, Direction::Down);
        assert_eq!(signal.level.angle, 90.0);
    }

    #[test]
    fn test_multi_level_move_picks_level_nearest_latest_close() {
        // 145 -> 151 crosses 146.89 (45°) and 150.06 (90°)
        let w = window(&[145.0, 145.0, 145.0, 145.0, 145.0, 151.0], &[100.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
        let signal = evaluator().evaluate(&w, &quote(1.0), 144.0).expect("signal");
        assert_eq!(signal.level.angle, 90.0);
    }

    #[test]
    fn test_no_crossing_inside_band() {
        let w = window(&[145.0, 145.0, 145.0, 145.0, 145.0, 146.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
        assert_eq!(evaluator().assess(&w, &quote(1.0), 144.0), Assessment::NoCrossing);
    }

    #[test]
    fn test_leaving_a_level_is_not_a_crossing() {
        // Previous close sits exactly on the 0° level
        let w = window(&[144.0, 144.0, 144.0, 144.0, 144.0, 144.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
        assert_eq!(evaluator().assess(&w, &quote(1.0), 144.0), Assessment::NoCrossing);
    }

    #[test]
    fn test_short_window_is_data_failure() {
        let w = window(&[145.0, 147.5], &[100.0, 300.0]);
        let assessment = evaluator().assess(&w, &quote(1.0), 144.0);

        assert_eq!(assessment, Assessment::InsufficientData { needed: 6, available: 2 });
        assert!(assessment.is_data_failure());
    }

    #[test]
    fn test_nan_close_is_data_failure() {
        let w = window(&[145.0, f64::NAN, 145.8, 146.0, 146.2, 147.5], &[100.0; 6]);
        assert_eq!(evaluator().assess(&w, &quote(1.0), 144.0), Assessment::MalformedSample { index: 1 });
    }

    #[test]
    fn test_volume_ratio_ignores_older_samples() {
        let w = window(&[1.0; 7], &[10_000.0, 100.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
        assert!((volume_ratio(&w, 5).unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mean_volume_has_no_ratio() {
        let w = window(&[1.0; 6], &[0.0, 0.0, 0.0, 0.0, 0.0, 50.0]);
        assert_eq!(volume_ratio(&w, 5), None);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let w = window(&[145.0, 145.5, 145.8, 146.0, 146.2, 147.5], &[100.0, 100.0, 100.0, 100.0, 100.0, 250.0]);
        let e = evaluator();
        assert_eq!(e.assess(&w, &quote(1.0), 144.0), e.assess(&w, &quote(1.0), 144.0));
    }
}
