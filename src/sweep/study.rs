//! Study parameter generation for batch workflow tools.
//!
//! A study environment supplies default values (`NUMBER_EXP`, `EVENTS_EXP`),
//! keyword overrides given as `NAME:value` take precedence, and the result is
//! a column-oriented [`ParameterSet`] with `RUN`, `NUMBER` and `EVENTS`
//! columns.
//!
//! ```yaml
//! env:
//!   variables:
//!     NUMBER_EXP: 3
//!     EVENTS_EXP: 14
//! ```

use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::LazyLock;

use crate::sweep::generator::{exp_count_axis, exp_event_axis, generate, SweepAxis, SweepInstance};
use crate::sweep::SweepError;

pub const NUMBER_EXP: &str = "NUMBER_EXP";
pub const EVENTS_EXP: &str = "EVENTS_EXP";

pub const RUN: &str = "RUN";
pub const NUMBER: &str = "NUMBER";
pub const EVENTS: &str = "EVENTS";

/// Default values used when no study file is given
pub const DEFAULT_NUMBER_EXP: i64 = 3;
pub const DEFAULT_EVENTS_EXP: i64 = 14;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyFile {
    #[serde(default)]
    pub env: StudyEnvironment,
}

/// Named study variables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyEnvironment {
    #[serde(default)]
    pub variables: BTreeMap<String, serde_yaml::Value>,
}

impl StudyEnvironment {
    /// Environment holding the historical defaults
    pub fn with_defaults() -> Self {
        let mut env = Self::default();
        env.add(NUMBER_EXP, DEFAULT_NUMBER_EXP);
        env.add(EVENTS_EXP, DEFAULT_EVENTS_EXP);
        env
    }

    pub fn add(&mut self, name: &str, value: i64) {
        self.variables.insert(name.to_string(), serde_yaml::Value::from(value));
    }

    pub fn find(&self, name: &str) -> Option<&serde_yaml::Value> {
        self.variables.get(name)
    }
}

/// Load a study environment from a YAML file
pub fn load_study(path: &Path) -> Result<StudyEnvironment, SweepError> {
    info!("Loading study environment from: {:?}", path);
    let file = File::open(path).map_err(|e| SweepError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let study: StudyFile = serde_yaml::from_reader(file)?;
    Ok(study.env)
}

static OVERRIDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(\S+)\s*$").expect("Invalid override regex")
});

/// Parse `NAME:value` override strings into a map; later entries win
pub fn parse_overrides<S: AsRef<str>>(args: &[S]) -> Result<BTreeMap<String, String>, SweepError> {
    let mut overrides = BTreeMap::new();
    for arg in args {
        let arg = arg.as_ref();
        let caps = OVERRIDE_PATTERN
            .captures(arg)
            .ok_or_else(|| SweepError::MalformedOverride(arg.to_string()))?;
        overrides.insert(caps[1].to_string(), caps[2].to_string());
    }
    Ok(overrides)
}

fn parse_int(name: &str, text: &str) -> Result<i64, SweepError> {
    text.trim().parse::<i64>().map_err(|_| SweepError::InvalidValue {
        name: name.to_string(),
        value: text.to_string(),
    })
}

/// Resolve an integer variable, overrides first, then the environment
fn lookup(
    env: &StudyEnvironment,
    overrides: &BTreeMap<String, String>,
    name: &str,
) -> Result<i64, SweepError> {
    if let Some(text) = overrides.get(name) {
        return parse_int(name, text);
    }
    match env.find(name) {
        Some(serde_yaml::Value::Number(n)) => n.as_i64().ok_or_else(|| SweepError::InvalidValue {
            name: name.to_string(),
            value: n.to_string(),
        }),
        Some(serde_yaml::Value::String(s)) => parse_int(name, s),
        Some(other) => Err(SweepError::InvalidValue {
            name: name.to_string(),
            value: format!("{:?}", other),
        }),
        None => Err(SweepError::MissingVariable(name.to_string())),
    }
}

/// One labeled column of a parameter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterColumn {
    pub label: String,
    pub values: Vec<u64>,
}

/// Column-oriented sweep, as consumed by a batch workflow tool.
///
/// Every column has one value per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    /// Column names in insertion order, `RUN` first
    pub order: Vec<String>,
    pub columns: BTreeMap<String, ParameterColumn>,
}

impl ParameterSet {
    /// Build the parameter set for the given axes and their instances
    pub fn from_instances(axes: &[SweepAxis], instances: &[SweepInstance]) -> Self {
        let mut order = vec![RUN.to_string()];
        let mut columns = BTreeMap::new();
        columns.insert(
            RUN.to_string(),
            ParameterColumn {
                label: "R.%%".to_string(),
                values: instances.iter().map(|i| i.run as u64).collect(),
            },
        );
        for (index, axis) in axes.iter().enumerate() {
            order.push(axis.name.clone());
            columns.insert(
                axis.name.clone(),
                ParameterColumn {
                    label: axis.label.clone(),
                    values: instances.iter().map(|i| i.values[index].1).collect(),
                },
            );
        }
        Self { order, columns }
    }

    pub fn column(&self, name: &str) -> Option<&[u64]> {
        self.columns.get(name).map(|c| c.values.as_slice())
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.column(RUN).map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows of values, in column order
    pub fn rows(&self) -> Vec<Vec<u64>> {
        (0..self.len())
            .map(|row| {
                self.order
                    .iter()
                    .map(|name| self.columns[name].values[row])
                    .collect()
            })
            .collect()
    }

    /// Tab separated table with a header line
    pub fn to_table(&self) -> String {
        let header: Vec<String> = self.order.iter().map(|name| title_case(name)).collect();
        let mut lines = vec![header.join("\t")];
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            lines.push(cells.join("\t"));
        }
        lines.join("\n")
    }
}

fn title_case(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Axes of the standard PHOLD study: LP count, then initial events
pub fn study_axes(
    env: &StudyEnvironment,
    overrides: &BTreeMap<String, String>,
) -> Result<Vec<SweepAxis>, SweepError> {
    let number_exp = lookup(env, overrides, NUMBER_EXP)?;
    let events_exp = lookup(env, overrides, EVENTS_EXP)?;

    let number = exp_count_axis(NUMBER, number_exp)?;
    let events = exp_event_axis(EVENTS, events_exp)?;
    info!("Number exp: {}: {:?}", number_exp, number.values);
    info!("Events exp: {}: {:?}", events_exp, events.values);

    Ok(vec![number, events])
}

/// Build the parameter set for a PHOLD study
///
/// # Arguments
/// * `env` - Study environment with the default `NUMBER_EXP` and `EVENTS_EXP`
/// * `overrides` - `NAME:value` overrides, taking precedence over `env`
///
/// # Returns
/// A parameter set with `RUN`, `NUMBER` and `EVENTS` columns whose length is
/// the size of the cartesian product of both axes
pub fn get_custom_generator<S: AsRef<str>>(
    env: &StudyEnvironment,
    overrides: &[S],
) -> Result<ParameterSet, SweepError> {
    let overrides = parse_overrides(overrides)?;
    let axes = study_axes(env, &overrides)?;
    let instances = generate(&axes);
    let params = ParameterSet::from_instances(&axes, &instances);

    info!("Number of runs: {}", params.len());
    debug!("Run\tNumber\tEvents");
    for row in params.rows() {
        debug!("{}\t{}\t{}", row[0], row[1], row[2]);
    }

    Ok(params)
}
