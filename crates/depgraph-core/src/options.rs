//! Render options: documented defaults, caller overrides, typed result.
//!
//! Callers hand over flat string maps (macro arguments, config files, CLI
//! `key=value` pairs). [`Options::resolve`] lays them over [`DEFAULTS`] and
//! coerces each field once; the resulting value is never mutated.
//!
//! # Coercion rules
//!
//! - Flags are on only when the value is exactly `"1"`.
//! - `fontsize` and `word_wrap_char_limit` must parse as positive integers.
//! - `milestone` is a `|`-separated, case-insensitive filter; empty means
//!   every milestone matches.
//! - Unknown keys are ignored.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::trace;

use crate::error::{DepGraphError, Result};

/// Raw option values keyed by option name.
pub type OptionMap = HashMap<String, String>;

/// Documented defaults. `label` and `graph_name` are derived from the render
/// time and therefore absent here.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("unblocked_color", "#4ECDC4"),
    ("unblocked_linkcolor", "blue"),
    ("blocked_color", "black"),
    ("blocked_linkcolor", "blue"),
    ("closed_color", "#556270"),
    ("closed_linkcolor", "#4ECDC4"),
    ("critical_color", "#C7F464"),
    ("critical_linkcolor", "blue"),
    ("fontsize", "12"),
    ("show_ticket_number", "1"),
    ("milestone", ""),
    ("group_by_milestone", "1"),
    ("debug", "0"),
    ("word_wrap_char_limit", "30"),
];

// ---------------------------------------------------------------------------
// Typed pieces
// ---------------------------------------------------------------------------

/// Fill color and text color for one ticket classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleColors {
    pub color: String,
    pub linkcolor: String,
}

/// Case-insensitive milestone filter. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MilestoneFilter(BTreeSet<String>);

impl MilestoneFilter {
    /// Parse a `|`-separated list, dropping empty fragments.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('|')
                .filter(|m| !m.is_empty())
                .map(str::to_lowercase)
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn matches(&self, milestone: &str) -> bool {
        self.0.is_empty() || self.0.contains(&milestone.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Fully resolved render options. Built once per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    pub unblocked: StyleColors,
    pub blocked: StyleColors,
    pub closed: StyleColors,
    pub critical: StyleColors,
    pub fontsize: u32,
    pub show_ticket_number: bool,
    pub milestone: MilestoneFilter,
    pub group_by_milestone: bool,
    pub debug: bool,
    pub word_wrap_char_limit: usize,
    pub label: String,
    pub graph_name: String,
}

impl Options {
    /// Lay `overrides` over the defaults and coerce every field.
    ///
    /// `now` supplies the default `label` (`as of <asctime>`) and
    /// `graph_name` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`DepGraphError::Configuration`] when a numeric option is not
    /// a positive integer.
    pub fn resolve<Tz>(overrides: &OptionMap, now: &DateTime<Tz>) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let label = format!("as of {}", now.format("%a %b %e %H:%M:%S %Y"));
        let graph_name = now.timestamp().to_string();
        let mut merged: HashMap<&str, &str> = DEFAULTS.iter().copied().collect();
        merged.insert("label", &label);
        merged.insert("graph_name", &graph_name);

        for (key, value) in overrides {
            if !merged.contains_key(key.as_str()) {
                trace!(key = %key, "ignoring unknown option");
            }
            merged.insert(key.as_str(), value.as_str());
        }

        let get = |key: &str| merged.get(key).copied().unwrap_or_default();
        let colors = |name: &str| StyleColors {
            color: get(&format!("{name}_color")).to_string(),
            linkcolor: get(&format!("{name}_linkcolor")).to_string(),
        };

        Ok(Self {
            unblocked: colors("unblocked"),
            blocked: colors("blocked"),
            closed: colors("closed"),
            critical: colors("critical"),
            fontsize: positive_int("fontsize", get("fontsize"))?,
            show_ticket_number: flag(get("show_ticket_number")),
            milestone: MilestoneFilter::parse(get("milestone")),
            group_by_milestone: flag(get("group_by_milestone")),
            debug: flag(get("debug")),
            word_wrap_char_limit: positive_int("word_wrap_char_limit", get("word_wrap_char_limit"))?,
            label: get("label").to_string(),
            graph_name: get("graph_name").to_string(),
        })
    }

    /// Resolve a macro call: `base` (e.g. a config file) first, then the
    /// options parsed out of `content`, then the pre-parsed `args`.
    ///
    /// # Errors
    ///
    /// See [`Options::resolve`].
    pub fn resolve_call<Tz>(
        base: Option<&OptionMap>,
        content: Option<&str>,
        args: Option<&OptionMap>,
        now: &DateTime<Tz>,
    ) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut merged = base.cloned().unwrap_or_default();
        if let Some(content) = content {
            merged.extend(parse_macro_args(content));
        }
        if let Some(args) = args {
            merged.extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self::resolve(&merged, now)
    }
}

fn flag(value: &str) -> bool {
    value == "1"
}

fn positive_int<T>(key: &'static str, value: &str) -> Result<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let reason = "expected a positive integer";
    match value.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(DepGraphError::Configuration {
            key,
            value: value.to_string(),
            reason,
        }),
    }
}

// ---------------------------------------------------------------------------
// Macro argument parsing
// ---------------------------------------------------------------------------

/// Parse macro call text (`key=value, other=value`) into an [`OptionMap`].
///
/// A backslash escapes a literal comma. Fragments without `=` are positional
/// arguments, which this macro does not take, and are dropped.
#[must_use]
pub fn parse_macro_args(content: &str) -> OptionMap {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => fragments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fragments.push(current);

    fragments
        .iter()
        .filter_map(|fragment| {
            let (key, value) = fragment.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
