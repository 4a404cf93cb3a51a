//! User configuration: a flat TOML table of option defaults.
//!
//! ```toml
//! fontsize = 10
//! show_ticket_number = false
//! closed_color = "#888888"
//! ```
//!
//! Integers and floats become their decimal text, booleans become `1`/`0`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use depgraph_core::OptionMap;
use tracing::debug;

/// Location of the user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("depgraph/config.toml"))
}

/// Load option defaults from `explicit`, or from the user config file when
/// it exists. An explicit path that does not exist is an error.
pub fn load(explicit: Option<&Path>) -> Result<OptionMap> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match user_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(OptionMap::new()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let options =
        parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), keys = options.len(), "loaded config");
    Ok(options)
}

/// Convert TOML text into an option map.
pub fn parse(content: &str) -> Result<OptionMap> {
    let table: toml::Table = toml::from_str(content)?;
    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(n) => n.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => String::from(if b { "1" } else { "0" }),
                other => bail!(
                    "option `{key}` must be a string, number or boolean, not {}",
                    other.type_str()
                ),
            };
            Ok((key, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_become_option_text() {
        let options = parse(
            "fontsize = 10\nshow_ticket_number = false\ndebug = true\nmilestone = \"1.0|2.0\"\n",
        )
        .expect("parse");
        assert_eq!(options["fontsize"], "10");
        assert_eq!(options["show_ticket_number"], "0");
        assert_eq!(options["debug"], "1");
        assert_eq!(options["milestone"], "1.0|2.0");
    }

    #[test]
    fn nested_tables_are_rejected() {
        let err = parse("[colors]\nclosed = \"red\"\n").expect_err("should reject");
        assert!(err.to_string().contains("`colors`"), "{err}");
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("depgraph.toml");
        std::fs::write(&path, "closed_color = \"gray\"\n").expect("write config");

        let options = load(Some(&path)).expect("load");
        assert_eq!(options.get("closed_color").map(String::as_str), Some("gray"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
