//! Statistic collection plan.
//!
//! Derives which engine counters to enable for a benchmark run and how they
//! are collected.

use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::BenchmarkConfig;
use crate::utils::duration::{format_time, REPORT_AT_END};

/// Engine component type of every LP
pub const PHOLD_COMPONENT: &str = "phold.Phold";
/// Engine statistic output writing to the console
pub const CONSOLE_OUTPUT: &str = "sst.statOutputConsole";
/// Engine statistic type for histograms
pub const HISTOGRAM_TYPE: &str = "sst.HistogramStatistic";

pub const SEND_COUNT: &str = "SendCount";
pub const RECV_COUNT: &str = "RecvCount";
pub const DELAYS: &str = "Delays";

/// Fixed number of bins in the delay histogram
pub const DELAY_HISTOGRAM_BINS: u64 = 50;

/// Histogram binning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramShape {
    pub min_value: u64,
    pub bin_width: u64,
    pub num_bins: u64,
}

/// Collection parameters for one counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterConfig {
    /// Collection rate; `"0ns"` reports only at the end
    pub rate: String,
    /// Stop collecting at this simulated time
    pub stop_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramShape>,
}

impl CounterConfig {
    /// Engine parameter mapping for this counter
    pub fn engine_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("rate".to_string(), self.rate.clone());
        params.insert("stopat".to_string(), self.stop_at.clone());
        if let Some(h) = &self.histogram {
            params.insert("type".to_string(), HISTOGRAM_TYPE.to_string());
            params.insert("minvalue".to_string(), h.min_value.to_string());
            params.insert("binwidth".to_string(), h.bin_width.to_string());
            params.insert("numbins".to_string(), h.num_bins.to_string());
        }
        params
    }
}

/// Measurement configuration for one experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatConfig {
    /// Engine-wide statistic load level
    pub load_level: u8,
    /// Engine statistic output
    pub output: String,
    /// Component type the counters are enabled on
    pub component_type: String,
    /// Counter name to collection parameters
    pub counters: BTreeMap<String, CounterConfig>,
}

/// Delay histogram bin width: `round(5 * mean / bins)`, ties to even.
///
/// Assumes the delay distribution is concentrated below five times its mean.
pub fn delay_bin_width(delay_mean: f64, num_bins: u64) -> u64 {
    (5.0 * delay_mean / num_bins as f64).round_ties_even() as u64
}

/// Derive the statistic configuration for a validated benchmark
pub fn derive(config: &BenchmarkConfig) -> StatConfig {
    let base = CounterConfig {
        rate: REPORT_AT_END.to_string(),
        stop_at: format_time(config.stop(), config.timebase()),
        histogram: None,
    };

    let mut counters = BTreeMap::new();
    counters.insert(SEND_COUNT.to_string(), base.clone());
    counters.insert(RECV_COUNT.to_string(), base.clone());

    if config.delays() {
        let bin_width = delay_bin_width(config.delay_mean(), DELAY_HISTOGRAM_BINS);
        if bin_width == 0 {
            warn!(
                "Delay histogram bin width rounds to 0 for mean delay {} {}",
                config.delay_mean(),
                config.timebase()
            );
        }
        counters.insert(
            DELAYS.to_string(),
            CounterConfig {
                histogram: Some(HistogramShape {
                    min_value: 0,
                    bin_width,
                    num_bins: DELAY_HISTOGRAM_BINS,
                }),
                ..base
            },
        );
    }

    StatConfig {
        load_level: 1 + config.delays() as u8,
        output: CONSOLE_OUTPUT.to_string(),
        component_type: PHOLD_COMPONENT.to_string(),
        counters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawBenchmarkArgs;
    use crate::utils::validation::validate;

    fn config_with(f: impl FnOnce(&mut RawBenchmarkArgs)) -> BenchmarkConfig {
        let mut raw = RawBenchmarkArgs::default();
        f(&mut raw);
        validate(&raw).unwrap()
    }

    #[test]
    fn test_counters_without_histogram() {
        let stats = derive(&config_with(|_| {}));
        assert_eq!(stats.load_level, 1);
        assert_eq!(stats.output, "sst.statOutputConsole");
        assert_eq!(stats.component_type, "phold.Phold");
        assert_eq!(stats.counters.len(), 2);

        let send = &stats.counters["SendCount"];
        assert_eq!(send.rate, "0ns");
        assert_eq!(send.stop_at, "10s");
        assert!(send.histogram.is_none());
        assert_eq!(send, &stats.counters["RecvCount"]);
    }

    #[test]
    fn test_delay_histogram() {
        let stats = derive(&config_with(|r| r.delays = true));
        assert_eq!(stats.load_level, 2);
        let delays = &stats.counters["Delays"];
        assert_eq!(delays.stop_at, "10s");
        assert_eq!(
            delays.histogram,
            Some(HistogramShape { min_value: 0, bin_width: 1, num_bins: 50 })
        );

        let params = delays.engine_params();
        assert_eq!(params["type"], "sst.HistogramStatistic");
        assert_eq!(params["minvalue"], "0");
        assert_eq!(params["binwidth"], "1");
        assert_eq!(params["numbins"], "50");
        assert_eq!(params["rate"], "0ns");
    }

    #[test]
    fn test_bin_width_scales_with_mean() {
        let stats = derive(&config_with(|r| {
            r.delays = true;
            r.minimum = 10.0;
            r.average = 90.0;
        }));
        assert_eq!(stats.counters["Delays"].histogram.as_ref().unwrap().bin_width, 10);
    }

    #[test]
    fn test_bin_width_rounding() {
        assert_eq!(delay_bin_width(10.0, 50), 1);
        assert_eq!(delay_bin_width(13.0, 50), 1);
        // 1.5 and 2.5 round to the even neighbour
        assert_eq!(delay_bin_width(15.0, 50), 2);
        assert_eq!(delay_bin_width(25.0, 50), 2);
        // Small means give a zero width
        assert_eq!(delay_bin_width(1.0, 50), 0);
    }

    #[test]
    fn test_plain_counter_params() {
        let stats = derive(&config_with(|r| r.stop = 2.5));
        let params = stats.counters["SendCount"].engine_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["stopat"], "2.5s");
    }
}
