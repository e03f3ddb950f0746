//! Measurement assembly: one matched timing record + power telemetry → one row.

use serde::{Deserialize, Serialize};

use crate::power::PowerTelemetry;
use crate::timing::TimingRecord;

const MICROS_PER_SECOND: f64 = 1_000_000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Column names of the serialized dataset, in order.
pub const COLUMNS: [&str; 9] = [
    "current_list",
    "voltage_list",
    "filename",
    "date_time",
    "avg_power",
    "iterations",
    "usperinf",
    "totaltimesec",
    "energy",
];

/// One fully joined run.
///
/// Field order matches [`COLUMNS`]; serde emits keys in declaration order.
/// `current_series[i]` and `voltage_series[i]` come from the same sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Current samples in mA (negative = discharge).
    #[serde(rename = "current_list")]
    pub current_series: Vec<i64>,
    /// Voltage samples in mV.
    #[serde(rename = "voltage_list")]
    pub voltage_series: Vec<i64>,
    #[serde(rename = "filename")]
    pub model_identity: String,
    #[serde(rename = "date_time")]
    pub timestamp: String,
    #[serde(rename = "avg_power")]
    pub average_power_watts: f64,
    #[serde(rename = "iterations")]
    pub iteration_count: u64,
    #[serde(rename = "usperinf")]
    pub microseconds_per_inference: f64,
    #[serde(rename = "totaltimesec")]
    pub total_duration_seconds: f64,
    #[serde(rename = "energy")]
    pub energy_per_inference_watt_hours: f64,
}

impl MeasurementRecord {
    /// Join a timing record with its power telemetry.
    pub fn assemble(timing: TimingRecord, power: PowerTelemetry) -> Self {
        let energy_per_inference_watt_hours =
            energy_per_inference(power.average_power_watts, timing.microseconds_per_inference);
        let (current_series, voltage_series): (Vec<i64>, Vec<i64>) = power
            .samples
            .iter()
            .map(|s| (s.current_milliamps, s.voltage_millivolts))
            .unzip();

        Self {
            current_series,
            voltage_series,
            model_identity: timing.model_identity,
            timestamp: timing.timestamp,
            average_power_watts: power.average_power_watts,
            iteration_count: timing.iteration_count,
            microseconds_per_inference: timing.microseconds_per_inference,
            total_duration_seconds: timing.total_duration_seconds,
            energy_per_inference_watt_hours,
        }
    }

    /// Number of (voltage, current) samples.
    pub fn sample_count(&self) -> usize {
        self.current_series.len()
    }

    /// Whether the two series have the same length.
    pub fn is_aligned(&self) -> bool {
        self.current_series.len() == self.voltage_series.len()
    }
}

/// Watt-hours spent on a single inference: W × (µs → s) → h.
pub fn energy_per_inference(average_power_watts: f64, microseconds_per_inference: f64) -> f64 {
    average_power_watts * (microseconds_per_inference / MICROS_PER_SECOND) / SECONDS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::{PowerSample, derive_telemetry};

    fn timing(us: f64) -> TimingRecord {
        TimingRecord {
            model_identity: "conv_w128_h128_cin1_cout1_zi_t.onnx".into(),
            timestamp: "20250101_120000".into(),
            iteration_count: 1000,
            microseconds_per_inference: us,
            total_duration_seconds: 10.0,
        }
    }

    #[test]
    fn test_assemble_copies_series_in_order() {
        let power = derive_telemetry(
            vec![
                PowerSample {
                    voltage_millivolts: 4000,
                    current_milliamps: 100,
                },
                PowerSample {
                    voltage_millivolts: 4000,
                    current_milliamps: 200,
                },
                PowerSample {
                    voltage_millivolts: 3900,
                    current_milliamps: 50,
                },
            ],
            10.0,
        )
        .unwrap();

        let rec = MeasurementRecord::assemble(timing(500.0), power);
        assert_eq!(rec.current_series, vec![100, 200, 50]);
        assert_eq!(rec.voltage_series, vec![4000, 4000, 3900]);
        assert!(rec.is_aligned());
        assert_eq!(rec.sample_count(), 3);
        assert_eq!(rec.model_identity, "conv_w128_h128_cin1_cout1_zi_t.onnx");
        assert_eq!(rec.timestamp, "20250101_120000");
        assert_eq!(rec.iteration_count, 1000);
    }

    #[test]
    fn test_energy_per_inference_units() {
        // 3.6 W for 1 s = 1 mWh.
        let e = energy_per_inference(3.6, 1_000_000.0);
        assert!((e - 0.001).abs() < 1e-15);
        assert_eq!(energy_per_inference(0.0, 1234.0), 0.0);
    }

    #[test]
    fn test_energy_monotonic_in_power_and_time() {
        let powers = [0.0, 0.5, 1.0, 2.5, 10.0];
        let times = [1.0, 10.0, 833.5, 1e6];
        for &us in &times {
            for w in powers.windows(2) {
                let lo = energy_per_inference(w[0], us);
                let hi = energy_per_inference(w[1], us);
                assert!(lo >= 0.0);
                assert!(hi > lo);
            }
        }
        for &p in &powers[1..] {
            for t in times.windows(2) {
                assert!(energy_per_inference(p, t[1]) > energy_per_inference(p, t[0]));
            }
        }
    }

    #[test]
    fn test_serialized_key_order_matches_columns() {
        let power = derive_telemetry(
            vec![PowerSample {
                voltage_millivolts: 4000,
                current_milliamps: -10,
            }],
            1.0,
        )
        .unwrap();
        let rec = MeasurementRecord::assemble(timing(1.0), power);
        let json = serde_json::to_string(&rec).unwrap();

        let positions: Vec<usize> = COLUMNS
            .iter()
            .map(|c| json.find(&format!("\"{c}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }
}
