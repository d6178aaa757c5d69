use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::duration::TIMEBASE;

/// Target number of events each LP should see per synchronization window
pub const MIN_EVENTS_PER_WINDOW: f64 = 10.0;

/// Unvalidated benchmark parameters, as read from the command line or a YAML file.
///
/// Every numeric field is floating point, including the LP and event counts,
/// which are truncated during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBenchmarkArgs {
    /// Fraction of events scheduled for other LPs
    pub remote: f64,
    /// Minimum inter-event delay
    pub minimum: f64,
    /// Average additional (exponential) inter-event delay
    pub average: f64,
    /// Total simulation time
    pub stop: f64,
    /// Total number of LPs
    pub number: f64,
    /// Number of initial events per LP
    pub events: f64,
    /// Whether to collect the delay histogram
    pub delays: bool,
    /// Phold component verbosity
    pub pverbose: u8,
    /// Script verbosity
    #[serde(rename = "pyVerbose", alias = "py_verbose")]
    pub py_verbose: u8,
}

impl Default for RawBenchmarkArgs {
    fn default() -> Self {
        Self {
            remote: 0.9,
            minimum: 1.0,
            average: 9.0,
            stop: 10.0,
            number: 2.0,
            events: 1.0,
            delays: false,
            pverbose: 0,
            py_verbose: 0,
        }
    }
}

/// A validated PHOLD benchmark configuration.
///
/// The only way to obtain one is through
/// [`validate`](crate::utils::validation::validate), so every value of this
/// type satisfies all parameter bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkConfig {
    pub(crate) remote: f64,
    pub(crate) minimum: f64,
    pub(crate) average: f64,
    pub(crate) stop: f64,
    pub(crate) number: u64,
    pub(crate) events: u64,
    pub(crate) delays: bool,
    pub(crate) pverbose: u8,
    pub(crate) py_verbose: u8,
}

/// A single value in the flat parameter mapping handed to each LP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(u64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl BenchmarkConfig {
    pub fn remote(&self) -> f64 {
        self.remote
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Number of LPs, always at least 2
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Initial events per LP, always at least 1
    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn delays(&self) -> bool {
        self.delays
    }

    pub fn pverbose(&self) -> u8 {
        self.pverbose
    }

    pub fn py_verbose(&self) -> u8 {
        self.py_verbose
    }

    pub fn timebase(&self) -> &'static str {
        TIMEBASE
    }

    /// Mean total inter-event delay
    pub fn delay_mean(&self) -> f64 {
        self.minimum + self.average
    }

    /// Synchronization duty factor: window size divided by total expected delay
    pub fn duty_factor(&self) -> f64 {
        self.minimum / self.delay_mean()
    }

    /// Expected number of events at each LP per window
    pub fn events_per_window(&self) -> f64 {
        self.events as f64 * self.duty_factor()
    }

    /// Suggested `--events` value when the events per window fall below target.
    /// Rounds half to even.
    pub fn suggested_events(&self) -> Option<u64> {
        if self.events_per_window() < MIN_EVENTS_PER_WINDOW {
            Some((MIN_EVENTS_PER_WINDOW / self.duty_factor()).round_ties_even() as u64)
        } else {
            None
        }
    }

    /// Flat key/value mapping attached to every LP component.
    ///
    /// Key names match the parameters the Phold component reads.
    pub fn engine_params(&self) -> BTreeMap<String, ParamValue> {
        let mut params = BTreeMap::new();
        params.insert("remote".to_string(), ParamValue::Float(self.remote));
        params.insert("minimum".to_string(), ParamValue::Float(self.minimum));
        params.insert("average".to_string(), ParamValue::Float(self.average));
        params.insert("stop".to_string(), ParamValue::Float(self.stop));
        params.insert("number".to_string(), ParamValue::Int(self.number));
        params.insert("events".to_string(), ParamValue::Int(self.events));
        params.insert("delays".to_string(), ParamValue::Bool(self.delays));
        params.insert("pverbose".to_string(), ParamValue::Int(self.pverbose as u64));
        params.insert("pyVerbose".to_string(), ParamValue::Int(self.py_verbose as u64));
        params.insert("TIMEBASE".to_string(), ParamValue::Str(TIMEBASE.to_string()));
        params
    }

    /// Multi-line human readable summary of the configuration
    pub fn report(&self) -> String {
        let tb = TIMEBASE;
        let mut lines = vec![
            format!("    Remote LP fraction:                   {}", self.remote),
            format!("    Minimum inter-event delay:            {} {}", self.minimum, tb),
            format!("    Additional exponential average delay: {} {}", self.average, tb),
            format!("    Stop time:                            {} {}", self.stop, tb),
            format!("    Number of LPs:                        {}", self.number),
            format!("    Number of initial events per LP:      {}", self.events),
            format!("    Average events per window:            {:.2}", self.events_per_window()),
        ];
        if let Some(events) = self.suggested_events() {
            lines.push(format!("      (Too low!  Suggest setting '--events={}')", events));
        }
        lines.push(format!("    Output delay histogram:               {}", self.delays));
        lines.push(format!("    Verbosity level:                      {}", self.pverbose));
        lines.push(format!("    Script verbosity level:               {}", self.py_verbose));
        lines.join("\n")
    }
}

impl fmt::Display for BenchmarkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "remote: {}, min: {}, avg: {}, stop: {}, nodes: {}, events: {}, delays: {}, verbose: {}, pyVerbose: {}",
            self.remote,
            self.minimum,
            self.average,
            self.stop,
            self.number,
            self.events,
            self.delays,
            self.pverbose,
            self.py_verbose
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate;

    fn default_config() -> BenchmarkConfig {
        validate(&RawBenchmarkArgs::default()).unwrap()
    }

    #[test]
    fn test_raw_defaults() {
        let raw = RawBenchmarkArgs::default();
        assert_eq!(raw.remote, 0.9);
        assert_eq!(raw.minimum, 1.0);
        assert_eq!(raw.average, 9.0);
        assert_eq!(raw.stop, 10.0);
        assert_eq!(raw.number, 2.0);
        assert_eq!(raw.events, 1.0);
        assert!(!raw.delays);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
remote: 0.5
number: 16
delays: true
pyVerbose: 2
"#;
        let raw: RawBenchmarkArgs = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.remote, 0.5);
        assert_eq!(raw.number, 16.0);
        assert!(raw.delays);
        assert_eq!(raw.py_verbose, 2);
        // Unspecified fields keep their defaults
        assert_eq!(raw.minimum, 1.0);
        assert_eq!(raw.events, 1.0);
    }

    #[test]
    fn test_derived_window_metrics() {
        let config = default_config();
        assert_eq!(config.delay_mean(), 10.0);
        assert!((config.duty_factor() - 0.1).abs() < 1e-12);
        assert!((config.events_per_window() - 0.1).abs() < 1e-12);
        assert_eq!(config.suggested_events(), Some(100));
    }

    #[test]
    fn test_suggestion_rounds_half_to_even() {
        // 10 / (2 / 12.5) = 62.5
        let raw = RawBenchmarkArgs { minimum: 2.0, average: 10.5, ..Default::default() };
        let config = validate(&raw).unwrap();
        assert_eq!(config.suggested_events(), Some(62));
        assert!(config.report().contains("Suggest setting '--events=62'"));
    }

    #[test]
    fn test_no_suggestion_when_enough_events() {
        let raw = RawBenchmarkArgs { events: 200.0, ..Default::default() };
        let config = validate(&raw).unwrap();
        assert_eq!(config.suggested_events(), None);
        assert!(!config.report().contains("Too low"));
    }

    #[test]
    fn test_engine_params() {
        let params = default_config().engine_params();
        assert_eq!(params.len(), 10);
        assert_eq!(params["remote"], ParamValue::Float(0.9));
        assert_eq!(params["number"], ParamValue::Int(2));
        assert_eq!(params["events"], ParamValue::Int(1));
        assert_eq!(params["delays"], ParamValue::Bool(false));
        assert_eq!(params["TIMEBASE"], ParamValue::Str("s".to_string()));
    }

    #[test]
    fn test_report_and_display() {
        let config = default_config();
        let report = config.report();
        assert!(report.contains("Minimum inter-event delay:            1 s"));
        assert!(report.contains("Suggest setting '--events=100'"));
        assert_eq!(
            config.to_string(),
            "remote: 0.9, min: 1, avg: 9, stop: 10, nodes: 2, events: 1, delays: false, verbose: 0, pyVerbose: 0"
        );
    }
}
