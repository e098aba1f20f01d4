// src/config/mod.rs
//! Run settings.
//!
//! The primary format is a flat `KEY = value` file (`#` lines are comments).
//! A `.toml` file holding the same keys at top level is accepted as well.
//!
//! Lookup order for [`Settings::load_default`]:
//! 1) $PROFILER_CONFIG_PATH
//! 2) ./config.info
//! 3) ./config/profiler.toml
//! 4) built-in defaults

use crate::error::ProfilerError;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "PROFILER_CONFIG_PATH";
const FALLBACK_PATHS: [&str; 2] = ["config.info", "config/profiler.toml"];

pub const KEY_SECONDARY_JUNK: &str = "MTYPE_SECONDARY_JUNK";
pub const KEY_PRIMARY_JUNK: &str = "MTYPE_PRIMARY_JUNK";
pub const KEY_TOP_SECONDARY: &str = "NTOP_SEC_MTYPES_INTO_FEATURES";
pub const KEY_NO_SEGMENT: &str = "HANDLE_CUSTOMERS_WITH_NO_MOSAIC_GROUP";
pub const KEY_GENDER: &str = "HANDLE_CUSTOMERS_WITH_NO_GENDER";
pub const KEY_PROFILE_FILE: &str = "CUST_PROF_FILE";
pub const KEY_TABLE_FILE: &str = "TABLE_FILE";
pub const KEY_ROW_LIMIT: &str = "GET_NROWS";
pub const KEY_UNKNOWN_TOKEN: &str = "UNKNOWN_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub secondary_junk: Vec<String>,
    pub primary_junk: Vec<String>,
    /// How many secondary codes become features.
    pub top_secondary: usize,
    /// `false` drops rows without a segment code before aggregation.
    pub keep_customers_without_segment: bool,
    pub gender_features: bool,
    pub profile_path: PathBuf,
    pub table_path: PathBuf,
    /// `None` reads the whole table.
    pub max_rows: Option<usize>,
    pub unknown_token: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secondary_junk: Vec::new(),
            primary_junk: Vec::new(),
            top_secondary: 20,
            keep_customers_without_segment: true,
            gender_features: true,
            profile_path: PathBuf::from("customer_profile.json"),
            table_path: PathBuf::from("transactions.csv"),
            max_rows: None,
            unknown_token: "UNK".to_string(),
        }
    }
}

impl Settings {
    /// Build from a parsed key/value map. Missing keys take defaults; unknown
    /// keys are ignored (the same file may configure the data extract).
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ProfilerError> {
        let mut s = Settings::default();

        if let Some(v) = map.get(KEY_SECONDARY_JUNK) {
            s.secondary_junk = split_tokens(v);
        }
        if let Some(v) = map.get(KEY_PRIMARY_JUNK) {
            s.primary_junk = split_tokens(v);
        }
        if let Some(v) = map.get(KEY_TOP_SECONDARY) {
            s.top_secondary = parse_count(KEY_TOP_SECONDARY, v)?;
        }
        if let Some(v) = map.get(KEY_NO_SEGMENT) {
            s.keep_customers_without_segment = parse_flag(v);
        }
        if let Some(v) = map.get(KEY_GENDER) {
            s.gender_features = parse_flag(v);
        }
        if let Some(v) = map.get(KEY_PROFILE_FILE).filter(|v| !v.is_empty()) {
            s.profile_path = PathBuf::from(v);
        }
        if let Some(v) = map.get(KEY_TABLE_FILE).filter(|v| !v.is_empty()) {
            s.table_path = PathBuf::from(v);
        }
        if let Some(v) = map.get(KEY_ROW_LIMIT) {
            s.max_rows = match v.as_str() {
                "" | "*" => None,
                n => Some(parse_count(KEY_ROW_LIMIT, n)?),
            };
        }
        if let Some(v) = map.get(KEY_UNKNOWN_TOKEN).filter(|v| !v.is_empty()) {
            s.unknown_token = v.clone();
        }

        Ok(s)
    }

    /// Load from an explicit path. `.toml` is parsed as TOML, anything else as
    /// flat key=value.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let map = if ext == "toml" {
            parse_toml(&content)?
        } else {
            parse_key_values(&content)
        };
        Settings::from_map(&map).with_context(|| format!("settings in {}", path.display()))
    }

    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Settings::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        for p in FALLBACK_PATHS {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Settings::load_from(&pb);
            }
        }
        Ok(Settings::default())
    }
}

/// Parse `KEY = value` lines. Blank lines, `#` comments and lines without `=`
/// are skipped; only the first `=` splits.
pub fn parse_key_values(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

fn parse_toml(s: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(s).context("parsing settings TOML")?;
    let mut map = HashMap::with_capacity(table.len());
    for (k, v) in table {
        let flat = match v {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Boolean(b) => String::from(if b { "1" } else { "0" }),
            toml::Value::Array(items) => items
                .iter()
                .filter_map(|i| i.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            other => return Err(anyhow!("unsupported value for {k}: {other}")),
        };
        map.insert(k, flat);
    }
    Ok(map)
}

fn split_tokens(v: &str) -> Vec<String> {
    v.split_whitespace().map(str::to_string).collect()
}

fn parse_flag(v: &str) -> bool {
    !matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no"
    )
}

fn parse_count(key: &str, v: &str) -> Result<usize, ProfilerError> {
    v.trim().parse().map_err(|_| ProfilerError::Setting {
        key: key.to_string(),
        value: v.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const SAMPLE: &str = "
# profiler settings
MTYPE_SECONDARY_JUNK = MISC  NA   TBA
MTYPE_PRIMARY_JUNK=UNKNOWN
NTOP_SEC_MTYPES_INTO_FEATURES = 5
HANDLE_CUSTOMERS_WITH_NO_MOSAIC_GROUP = 0
HANDLE_CUSTOMERS_WITH_NO_GENDER = 1
CUST_PROF_FILE = out/profile.json
GET_NROWS = *
DSN = tickets=prod
";

    #[test]
    fn key_values_are_trimmed_and_split_once() {
        let m = parse_key_values(SAMPLE);
        assert_eq!(m.get("MTYPE_PRIMARY_JUNK").map(String::as_str), Some("UNKNOWN"));
        assert_eq!(m.get("DSN").map(String::as_str), Some("tickets=prod"));
        assert!(!m.keys().any(|k| k.starts_with('#')));
    }

    #[test]
    fn settings_from_flat_file() {
        let s = Settings::from_map(&parse_key_values(SAMPLE)).unwrap();
        assert_eq!(s.secondary_junk, ["MISC", "NA", "TBA"]);
        assert_eq!(s.primary_junk, ["UNKNOWN"]);
        assert_eq!(s.top_secondary, 5);
        assert!(!s.keep_customers_without_segment);
        assert!(s.gender_features);
        assert_eq!(s.profile_path, PathBuf::from("out/profile.json"));
        assert_eq!(s.max_rows, None);
        assert_eq!(s.unknown_token, "UNK");
    }

    #[test]
    fn bad_count_is_a_setting_error() {
        let mut m = HashMap::new();
        m.insert(KEY_TOP_SECONDARY.to_string(), "twenty".to_string());
        let err = Settings::from_map(&m).unwrap_err();
        assert!(matches!(err, ProfilerError::Setting { ref key, .. } if key == KEY_TOP_SECONDARY));
    }

    #[test]
    fn row_limit_parses() {
        let mut m = HashMap::new();
        m.insert(KEY_ROW_LIMIT.to_string(), "1000".to_string());
        assert_eq!(Settings::from_map(&m).unwrap().max_rows, Some(1000));
    }

    #[test]
    fn toml_values_are_flattened() {
        let m = parse_toml(
            r#"
MTYPE_SECONDARY_JUNK = ["MISC", "NA"]
NTOP_SEC_MTYPES_INTO_FEATURES = 3
HANDLE_CUSTOMERS_WITH_NO_GENDER = false
"#,
        )
        .unwrap();
        let s = Settings::from_map(&m).unwrap();
        assert_eq!(s.secondary_junk, ["MISC", "NA"]);
        assert_eq!(s.top_secondary, 3);
        assert!(!s.gender_features);
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        // nothing on disk: defaults
        assert_eq!(Settings::load_default().unwrap(), Settings::default());

        // ./config.info
        fs::write(tmp.path().join("config.info"), "NTOP_SEC_MTYPES_INTO_FEATURES = 7\n").unwrap();
        assert_eq!(Settings::load_default().unwrap().top_secondary, 7);

        // env wins
        let p = tmp.path().join("other.info");
        fs::write(&p, "NTOP_SEC_MTYPES_INTO_FEATURES = 9\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        assert_eq!(Settings::load_default().unwrap().top_secondary, 9);

        // env pointing nowhere is an error
        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.info").display().to_string());
        assert!(Settings::load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
