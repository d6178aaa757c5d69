//! Cartesian-product sweep generation.
//!
//! A sweep is an ordered list of axes; the generator enumerates every
//! combination of axis values with the first axis varying slowest and tags
//! each combination with a dense, zero-based run index.

use serde::Serialize;

use crate::sweep::SweepError;

/// First exponent of the event-count axis (2^7 = 128 events)
pub const EVENT_EXP_BASE: u32 = 7;

/// One independently varying experiment dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepAxis {
    pub name: String,
    /// Column label for the workflow tool, e.g. `"N.%%"`
    pub label: String,
    pub values: Vec<u64>,
}

impl SweepAxis {
    /// Create an axis labeled by the first letter of its name
    pub fn new(name: &str, values: Vec<u64>) -> Self {
        let initial = name.chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or('X');
        Self {
            name: name.to_string(),
            label: format!("{}.%%", initial),
            values,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Axis over `start, start+step, ...` up to but excluding `end`
    pub fn range(name: &str, start: u64, end: u64, step: u64) -> Result<Self, SweepError> {
        if step == 0 {
            return Err(SweepError::InvalidValue {
                name: name.to_string(),
                value: "step 0".to_string(),
            });
        }
        let values = (start..end).step_by(step as usize).collect();
        Ok(Self::new(name, values))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `2^k` for `k` in `[first, last)`; empty when `last <= first`
fn powers_of_two(name: &str, first: i64, last: i64) -> Result<Vec<u64>, SweepError> {
    (first.max(0)..last)
        .map(|k| {
            u32::try_from(k)
                .ok()
                .and_then(|k| 1u64.checked_shl(k))
                .ok_or_else(|| SweepError::ExponentOverflow {
                    name: name.to_string(),
                    exponent: k,
                })
        })
        .collect()
}

/// LP-count axis: `2^k` for `k` in `1..count_exp`
///
/// # Examples
/// ```
/// use pholdsim::sweep::exp_count_axis;
///
/// assert_eq!(exp_count_axis("NUMBER", 3).unwrap().values, vec![2, 4]);
/// assert!(exp_count_axis("NUMBER", 1).unwrap().values.is_empty());
/// ```
pub fn exp_count_axis(name: &str, count_exp: i64) -> Result<SweepAxis, SweepError> {
    Ok(SweepAxis::new(name, powers_of_two(name, 1, count_exp)?))
}

/// Event-count axis: `events_exp` values `2^k` starting at `2^7`
///
/// # Examples
/// ```
/// use pholdsim::sweep::exp_event_axis;
///
/// assert_eq!(exp_event_axis("EVENTS", 2).unwrap().values, vec![128, 256]);
/// ```
pub fn exp_event_axis(name: &str, events_exp: i64) -> Result<SweepAxis, SweepError> {
    let first = EVENT_EXP_BASE as i64;
    let last = first.saturating_add(events_exp);
    Ok(SweepAxis::new(name, powers_of_two(name, first, last)?))
}

/// One point of a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepInstance {
    pub run: usize,
    /// `(axis name, value)`, in axis order
    pub values: Vec<(String, u64)>,
}

impl SweepInstance {
    /// Value of the named axis
    pub fn get(&self, name: &str) -> Option<u64> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Render as command line flags: axis `NUMBER` becomes `--number=<value>`
    pub fn to_args(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|(name, value)| format!("--{}={}", name.to_lowercase(), value))
            .collect()
    }
}

/// Number of instances `generate` produces for `axes`
pub fn instance_count(axes: &[SweepAxis]) -> usize {
    axes.iter().map(SweepAxis::len).product()
}

/// Generate the cartesian product of all axes
///
/// The first axis varies slowest. No axes produce one empty instance; any
/// empty axis produces no instances.
pub fn generate(axes: &[SweepAxis]) -> Vec<SweepInstance> {
    let mut combos: Vec<Vec<u64>> = vec![Vec::new()];
    for axis in axes {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                axis.values.iter().map(move |v| {
                    let mut combo = prefix.clone();
                    combo.push(*v);
                    combo
                })
            })
            .collect();
    }

    combos
        .into_iter()
        .enumerate()
        .map(|(run, combo)| SweepInstance {
            run,
            values: axes.iter().map(|a| a.name.clone()).zip(combo).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_count_axis() {
        assert_eq!(exp_count_axis("NUMBER", 3).unwrap().values, vec![2, 4]);
        assert_eq!(exp_count_axis("NUMBER", 6).unwrap().values, vec![2, 4, 8, 16, 32]);
        assert!(exp_count_axis("NUMBER", 0).unwrap().is_empty());
        assert!(exp_count_axis("NUMBER", -4).unwrap().is_empty());
    }

    #[test]
    fn test_exp_event_axis() {
        let axis = exp_event_axis("EVENTS", 14).unwrap();
        assert_eq!(axis.len(), 14);
        assert_eq!(axis.values.first(), Some(&128));
        assert_eq!(axis.values.last(), Some(&(1u64 << 20)));
        assert!(axis.values.windows(2).all(|w| w[1] == 2 * w[0]));
        assert!(exp_event_axis("EVENTS", 0).unwrap().is_empty());
    }

    #[test]
    fn test_exponent_overflow() {
        assert!(exp_count_axis("NUMBER", 64).is_ok());
        assert!(matches!(
            exp_count_axis("NUMBER", 65),
            Err(SweepError::ExponentOverflow { exponent: 64, .. })
        ));
        assert!(exp_event_axis("EVENTS", 60).is_err());
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(SweepAxis::new("NUMBER", vec![]).label, "N.%%");
        assert_eq!(SweepAxis::new("events", vec![]).label, "E.%%");
        assert_eq!(SweepAxis::new("NUMBER", vec![]).with_label("LP.%%").label, "LP.%%");
    }

    #[test]
    fn test_range_axis() {
        assert_eq!(SweepAxis::range("STOP", 10, 40, 10).unwrap().values, vec![10, 20, 30]);
        assert!(SweepAxis::range("STOP", 10, 10, 1).unwrap().is_empty());
        assert!(SweepAxis::range("STOP", 0, 10, 0).is_err());
    }

    #[test]
    fn test_generate_cartesian_order() {
        let axes = vec![
            SweepAxis::new("NUMBER", vec![2, 4]),
            SweepAxis::new("EVENTS", vec![128, 256]),
        ];
        let instances = generate(&axes);
        assert_eq!(instances.len(), 4);

        let rows: Vec<(usize, u64, u64)> = instances
            .iter()
            .map(|i| (i.run, i.get("NUMBER").unwrap(), i.get("EVENTS").unwrap()))
            .collect();
        assert_eq!(rows, vec![(0, 2, 128), (1, 2, 256), (2, 4, 128), (3, 4, 256)]);
    }

    #[test]
    fn test_generate_count_is_product() {
        let axes = vec![
            SweepAxis::new("A", vec![1, 2, 3]),
            SweepAxis::new("B", vec![1, 2]),
            SweepAxis::new("C", vec![5, 6, 7, 8]),
        ];
        let instances = generate(&axes);
        assert_eq!(instances.len(), 24);
        assert_eq!(instances.len(), instance_count(&axes));
        for (i, instance) in instances.iter().enumerate() {
            assert_eq!(instance.run, i);
        }
        // Last axis varies fastest
        assert_eq!(instances[1].values, vec![("A".to_string(), 1), ("B".to_string(), 1), ("C".to_string(), 6)]);
    }

    #[test]
    fn test_generate_degenerate_axes() {
        let instances = generate(&[]);
        assert_eq!(instances.len(), 1);
        assert!(instances[0].values.is_empty());

        let axes = vec![SweepAxis::new("A", vec![1, 2]), SweepAxis::new("B", vec![])];
        assert!(generate(&axes).is_empty());
        assert_eq!(instance_count(&axes), 0);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let axes = vec![exp_count_axis("NUMBER", 4).unwrap(), exp_event_axis("EVENTS", 3).unwrap()];
        assert_eq!(generate(&axes), generate(&axes));
    }

    #[test]
    fn test_instance_to_args() {
        let instance = SweepInstance {
            run: 0,
            values: vec![("NUMBER".into(), 4), ("EVENTS".into(), 256)],
        };
        assert_eq!(instance.to_args(), vec!["--number=4", "--events=256"]);
        assert_eq!(instance.get("STOP"), None);
    }
}
