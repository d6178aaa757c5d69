//! Simulation time formatting utilities.
//!
//! This module renders benchmark times (expressed in the configuration's
//! time base) into the string forms the engine understands, e.g. `"1 s"`
//! for link latencies and `"10s"` for statistic cut-off times.

/// Time unit used for every delay and stop time in a PHOLD configuration
pub const TIMEBASE: &str = "s";

/// Collection rate meaning "report only at the end of the simulation"
pub const REPORT_AT_END: &str = "0ns";

/// Format a link latency as `"<value> <unit>"`
///
/// # Examples
/// ```
/// use pholdsim::utils::duration::format_latency;
///
/// assert_eq!(format_latency(1.0, "s"), "1 s");
/// assert_eq!(format_latency(0.5, "s"), "0.5 s");
/// ```
pub fn format_latency(value: f64, unit: &str) -> String {
    format!("{} {}", value, unit)
}

/// Format a point in simulated time as `"<value><unit>"`
///
/// # Examples
/// ```
/// use pholdsim::utils::duration::format_time;
///
/// assert_eq!(format_time(10.0, "s"), "10s");
/// assert_eq!(format_time(2.5, "s"), "2.5s");
/// ```
pub fn format_time(value: f64, unit: &str) -> String {
    format!("{}{}", value, unit)
}
