//! Power-log reconstruction.
//!
//! Battery logs are free text. A line may carry a `volt=<mV>` token, a
//! `current=<mA>` token, both, or neither. Voltage is reported far less often
//! than current, so each current reading is paired with the most recent
//! voltage seen at or before its line (carry-forward join). Current readings
//! that arrive before any voltage are dropped.
//!
//! Only the first occurrence of each token on a line is read.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::VoltageLines;
use crate::error::{PipelineError, Result};

static VOLT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"volt=(\d+)").expect("static regex"));
static CURRENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"current=(-?\d+)").expect("static regex"));

/// mV × mA → W.
const MILLI_SQUARED: f64 = 1_000_000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// One synchronized reading. Negative current means discharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSample {
    pub voltage_millivolts: i64,
    pub current_milliamps: i64,
}

impl PowerSample {
    /// Instantaneous power in watts. Current direction is ignored.
    pub fn watts(&self) -> f64 {
        self.voltage_millivolts as f64 * self.current_milliamps.unsigned_abs() as f64 / MILLI_SQUARED
    }
}

/// Reconstructed series plus derived power and run energy.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTelemetry {
    pub samples: Vec<PowerSample>,
    pub average_power_watts: f64,
    pub total_energy_watt_hours: f64,
}

/// Read a power log and derive telemetry for a run of `total_duration_seconds`.
pub fn parse_power_log(
    path: &Path,
    total_duration_seconds: f64,
    voltage_lines: VoltageLines,
) -> Result<PowerTelemetry> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    let samples = reconstruct_samples(text.lines(), voltage_lines);
    log::debug!("{}: {} samples reconstructed", path.display(), samples.len());

    derive_telemetry(samples, total_duration_seconds)
        .ok_or_else(|| PipelineError::NoPowerSamples(path.to_path_buf()))
}

/// Carry-forward join over log lines, preserving line order.
pub fn reconstruct_samples<'a, I>(lines: I, voltage_lines: VoltageLines) -> Vec<PowerSample>
where
    I: IntoIterator<Item = &'a str>,
{
    let (_, samples) = lines
        .into_iter()
        .filter(|line| voltage_lines == VoltageLines::All || line.contains("current="))
        .fold(
            (None, Vec::new()),
            |(last_voltage, mut samples): (Option<i64>, Vec<PowerSample>), line| {
                let voltage = token(&VOLT_TOKEN, line).or(last_voltage);
                if let (Some(voltage_millivolts), Some(current_milliamps)) =
                    (voltage, token(&CURRENT_TOKEN, line))
                {
                    samples.push(PowerSample {
                        voltage_millivolts,
                        current_milliamps,
                    });
                }
                (voltage, samples)
            },
        );
    samples
}

/// Average power and total energy. `None` when there are no samples.
pub fn derive_telemetry(
    samples: Vec<PowerSample>,
    total_duration_seconds: f64,
) -> Option<PowerTelemetry> {
    if samples.is_empty() {
        return None;
    }
    let average_power_watts =
        samples.iter().map(PowerSample::watts).sum::<f64>() / samples.len() as f64;
    let total_energy_watt_hours = run_energy_watt_hours(average_power_watts, total_duration_seconds);

    Some(PowerTelemetry {
        samples,
        average_power_watts,
        total_energy_watt_hours,
    })
}

/// Energy over the whole run. Zero for a non-positive duration.
pub fn run_energy_watt_hours(average_power_watts: f64, total_duration_seconds: f64) -> f64 {
    if total_duration_seconds > 0.0 {
        average_power_watts * total_duration_seconds / SECONDS_PER_HOUR
    } else {
        0.0
    }
}

fn token(re: &Regex, line: &str) -> Option<i64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}
