//! Synthetic data used whenever the backend cannot be reached, so the
//! dashboard always has something to draw.

use chrono::{DateTime, TimeDelta, TimeZone};
use rand::Rng;
use std::fmt::Display;

use crate::api::{HistoryPoint, Period, StatsSample};

pub const SIMULATED_DISK: f64 = 55.0;

/// A plausible current-stats reading stamped with `timestamp`.
pub fn stats_sample<R: Rng + ?Sized>(rng: &mut R, timestamp: f64) -> StatsSample {
    StatsSample {
        cpu: f64::from(rng.random_range(30_i32..70)),
        ram: f64::from(rng.random_range(40_i32..60)),
        disk: SIMULATED_DISK,
        timestamp,
    }
}

/// A bucketed series for `period` ending at `now`, oldest bucket first.
pub fn history<Tz, R>(period: Period, now: &DateTime<Tz>, rng: &mut R) -> Vec<HistoryPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    R: Rng + ?Sized,
{
    let count = period.bucket_count();
    (0..count)
        .map(|i| {
            let age = (count - 1 - i) as i64;
            match period {
                Period::Day => {
                    let at = now.clone() - TimeDelta::hours(age);
                    HistoryPoint {
                        time: at.format("%I:%M %p").to_string(),
                        cpu: f64::from(rng.random_range(20_i32..80)),
                        ram: f64::from(rng.random_range(40_i32..70)),
                        disk: 50.0 + i as f64 * 0.5,
                    }
                }
                Period::Week => {
                    let at = now.clone() - TimeDelta::days(age);
                    HistoryPoint {
                        time: at.format("%a").to_string(),
                        cpu: f64::from(rng.random_range(30_i32..80)),
                        ram: f64::from(rng.random_range(40_i32..60)),
                        disk: 50.0 + f64::from(rng.random_range(0_i32..10)),
                    }
                }
            }
        })
        .collect()
}
