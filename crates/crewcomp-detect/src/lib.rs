//! Entitlement detectors: pure, total functions from one completed trip to
//! zero or more candidate claims.

pub mod calendar;
mod detectors;

pub use detectors::{
    detect_all, detect_extended_duty, detect_holiday_premium, detect_international_override,
    detect_per_diem, duty_period_hours,
};
