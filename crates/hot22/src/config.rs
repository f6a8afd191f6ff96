//! CLI configuration: thin wrapper around `hot22_config`.
//!
//! Adds the flag layer (`--api-url`, `--timeout`, `--dev`, `--profile`,
//! `--config`) on top of the file and environment layers.

use std::path::PathBuf;

use hot22_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use hot22_config::{Config, Profile};

/// The config file this invocation reads and writes.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(hot22_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(hot22_config::load_config_from(&config_file(global))?)
}

/// Resolve the active profile and apply flag overrides.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<DashboardConfig, CliError> {
    let (name, mut profile) = cfg
        .resolve_profile(global.profile.as_deref())
        .map_err(|e| match e {
            hot22_config::ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            },
            other => other.into(),
        })?;

    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile.dev_mode |= global.dev;

    tracing::debug!(profile = %name, api_url = %profile.api_url, "resolved profile");
    Ok(hot22_config::profile_to_dashboard_config(
        &profile,
        &cfg.defaults,
    )?)
}

pub fn available_profiles(cfg: &Config) -> String {
    let names = cfg.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["hot22"];
        argv.extend_from_slice(args);
        argv.push("health");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_the_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                api_url: "http://staging:3000".into(),
                timeout: Some(60),
                ..Profile::default()
            },
        );
        let opts = global(&[
            "--profile",
            "staging",
            "--api-url",
            "http://override:4000",
            "--timeout",
            "5",
            "--dev",
        ]);

        let resolved = resolve(&opts, &cfg).unwrap();
        assert_eq!(resolved.base_url.as_str(), "http://override:4000/");
        assert_eq!(resolved.timeout.as_secs(), 5);
        assert!(resolved.dev_mode);
    }

    #[test]
    fn unknown_profile_lists_the_known_ones() {
        let mut cfg = Config::default();
        cfg.profiles.insert("prod".into(), Profile::default());
        let err = resolve(&global(&["--profile", "nope"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "nope");
                assert_eq!(available, "prod");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn implicit_default_profile_points_at_localhost() {
        let resolved = resolve(&global(&[]), &Config::default()).unwrap();
        assert_eq!(resolved.base_url.as_str(), "http://localhost:3000/");
    }
}
