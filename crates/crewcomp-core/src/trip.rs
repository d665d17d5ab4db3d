//! Completed-trip operational records consumed by the detection pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One completed duty period (flight/pairing), as exported by the
/// operations system.
///
/// Immutable input to the pipeline: detectors and validators read it,
/// nothing in this workspace writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub trip_date: NaiveDate,
    /// IATA station code the duty period starts from.
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub block_hours: f64,
    pub flight_time_hours: f64,
    pub credit_hours: f64,
    pub is_international: bool,
    pub crew_id: String,
    /// Only completed trips are eligible for entitlement detection.
    pub completed: bool,
}

impl Trip {
    /// Scheduled gate-to-gate interval in hours, before check-in/check-out
    /// offsets are applied. Negative when the pairing wraps past midnight
    /// with a naive arrival clock.
    pub fn scheduled_interval_hours(&self) -> f64 {
        let delta = self.scheduled_arrival - self.scheduled_departure;
        delta.num_seconds() as f64 / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trip(dep: (u32, u32), arr: (u32, u32)) -> Trip {
        Trip {
            trip_id: "T100".into(),
            trip_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            origin: "DEN".into(),
            destination: "ORD".into(),
            scheduled_departure: Utc.with_ymd_and_hms(2025, 6, 10, dep.0, dep.1, 0).unwrap(),
            scheduled_arrival: Utc.with_ymd_and_hms(2025, 6, 10, arr.0, arr.1, 0).unwrap(),
            actual_departure: None,
            actual_arrival: None,
            block_hours: 3.5,
            flight_time_hours: 3.2,
            credit_hours: 3.5,
            is_international: false,
            crew_id: "C42".into(),
            completed: true,
        }
    }

    #[test]
    fn interval_hours_forward() {
        let t = trip((8, 0), (12, 30));
        assert!((t.scheduled_interval_hours() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn interval_hours_negative_when_arrival_precedes_departure() {
        let t = trip((22, 0), (2, 0));
        assert!(t.scheduled_interval_hours() < 0.0);
    }

    #[test]
    fn trip_json_roundtrip() {
        let t = trip((8, 0), (12, 30));
        let json = serde_json::to_string(&t).unwrap();
        let parsed: Trip = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.trip_id, "T100");
        assert_eq!(parsed.trip_date, t.trip_date);
        assert!(parsed.completed);
    }
}
