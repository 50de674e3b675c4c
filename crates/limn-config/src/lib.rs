use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressSetting {
    Auto,
    Silent,
    Verbose,
}

/// `limn.json` in the working directory (or an explicit `--config` path).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub service_url: Option<String>,
    pub lang: Option<String>,
    pub auto_detect: Option<bool>,
    pub verbose: Option<bool>,
    pub progress: Option<ProgressSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    pub service_url: Option<String>,
    pub lang: Option<String>,
    pub auto_detect: Option<bool>,
    pub verbose: Option<bool>,
    pub progress: Option<ProgressSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    pub service_url: Option<String>,
    pub lang: Option<String>,
    pub auto_detect: Option<bool>,
    pub verbose: Option<bool>,
    pub no_progress: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDefaults {
    pub service_url: String,
    pub lang: Option<String>,
    pub auto_detect: bool,
    pub verbose: bool,
    pub progress: ProgressSetting,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".to_string(),
            lang: None,
            auto_detect: true,
            verbose: false,
            progress: ProgressSetting::Auto,
        }
    }
}

pub fn load_file_config(explicit_path: Option<&Path>, cwd: &Path) -> Result<Option<FileConfig>> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join("limn.json");
            if !candidate.exists() {
                return Ok(None);
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let parsed: FileConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    Ok(Some(parsed))
}

impl EnvConfig {
    pub fn from_current_env() -> Self {
        Self {
            service_url: env::var("LIMN_SERVICE_URL").ok(),
            lang: env::var("LIMN_LANG").ok(),
            auto_detect: env::var("LIMN_AUTO_DETECT")
                .ok()
                .and_then(|v| parse_bool(&v)),
            verbose: env::var("LIMN_VERBOSE").ok().and_then(|v| parse_bool(&v)),
            progress: env::var("LIMN_PROGRESS")
                .ok()
                .and_then(|v| parse_progress(&v)),
        }
    }
}

/// CLI wins over env, env over file, file over baked-in defaults.
pub fn resolve_run_defaults(
    cli: &CliOverrides,
    env_cfg: &EnvConfig,
    file_cfg: Option<&FileConfig>,
) -> RunDefaults {
    let base = RunDefaults::default();

    let service_url = cli
        .service_url
        .clone()
        .or_else(|| env_cfg.service_url.clone())
        .or_else(|| file_cfg.and_then(|c| c.service_url.clone()))
        .unwrap_or(base.service_url);

    let lang = cli
        .lang
        .clone()
        .or_else(|| env_cfg.lang.clone())
        .or_else(|| file_cfg.and_then(|c| c.lang.clone()))
        .or(base.lang);

    let auto_detect = cli
        .auto_detect
        .or(env_cfg.auto_detect)
        .or(file_cfg.and_then(|c| c.auto_detect))
        .unwrap_or(base.auto_detect);

    let verbose = cli
        .verbose
        .or(env_cfg.verbose)
        .or(file_cfg.and_then(|c| c.verbose))
        .unwrap_or(base.verbose);

    let mut progress = env_cfg
        .progress
        .or(file_cfg.and_then(|c| c.progress))
        .unwrap_or(base.progress);

    if cli.no_progress == Some(true) {
        progress = ProgressSetting::Silent;
    }

    RunDefaults {
        service_url,
        lang,
        auto_detect,
        verbose,
        progress,
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_progress(input: &str) -> Option<ProgressSetting> {
    match input.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(ProgressSetting::Auto),
        "silent" => Some(ProgressSetting::Silent),
        "verbose" => Some(ProgressSetting::Verbose),
        _ => None,
    }
}
