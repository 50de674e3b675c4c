use anyhow::{Result, anyhow};
use limn_config::{CliOverrides, EnvConfig, ProgressSetting, RunDefaults, load_file_config, resolve_run_defaults};
use limn_exec::{ProgressMode, RunOptions};
use limn_lang::Language;
use limn_remote::HttpCompileService;
use std::path::{Path, PathBuf};

pub(crate) fn resolve_config(
    config: Option<PathBuf>,
    cli_overrides: &CliOverrides,
) -> Result<RunDefaults> {
    let cwd = std::env::current_dir()?;
    let file_cfg = load_file_config(config.as_deref(), &cwd)?;
    let env_cfg = EnvConfig::from_current_env();
    Ok(resolve_run_defaults(cli_overrides, &env_cfg, file_cfg.as_ref()))
}

fn resolved_progress_mode(progress: ProgressSetting, verbose: bool) -> ProgressMode {
    match progress {
        ProgressSetting::Silent => ProgressMode::Silent,
        ProgressSetting::Verbose => ProgressMode::Verbose,
        ProgressSetting::Auto => {
            if verbose {
                ProgressMode::Verbose
            } else {
                ProgressMode::Minimal
            }
        }
    }
}

pub(crate) fn build_run_options(resolved: &RunDefaults) -> RunOptions {
    RunOptions {
        auto_detect: resolved.auto_detect,
        progress_mode: resolved_progress_mode(resolved.progress, resolved.verbose),
    }
}

pub(crate) fn build_service(resolved: &RunDefaults) -> HttpCompileService {
    HttpCompileService::new(resolved.service_url.clone())
}

pub(crate) fn parse_language(hint: &str) -> Result<Language> {
    Language::from_hint(hint).ok_or_else(|| {
        anyhow!("unknown language '{hint}'. Supported: python, java, sql, r, javascript, c, cpp, go, php, typescript")
    })
}

fn language_from_path(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    Language::from_hint(ext)
}

/// Pick the language tag for a run: explicit flag, then configured default,
/// then the file extension, then a content fingerprint, then python.
pub(crate) fn resolve_language(
    explicit: Option<&str>,
    configured: Option<&str>,
    path: Option<&Path>,
    source: &str,
) -> Result<Language> {
    if let Some(hint) = explicit {
        return parse_language(hint);
    }
    if let Some(hint) = configured {
        return parse_language(hint);
    }
    if let Some(lang) = path.and_then(language_from_path) {
        return Ok(lang);
    }
    Ok(limn_lang::detect(source).unwrap_or(Language::Python))
}
