//! Config subcommand handlers. None of these touch the API.

use std::path::Path;

use dialoguer::Input;

use hot22_config::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn save(cfg: &Config, path: &Path) -> Result<(), CliError> {
    hot22_config::save_config_to(cfg, path)?;
    Ok(())
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Reject a profile the dashboard could not be built from.
fn check_profile(name: &str, profile: &Profile, cfg: &Config) -> Result<(), CliError> {
    hot22_config::profile_to_dashboard_config(profile, &cfg.defaults).map_err(|e| match e {
        hot22_config::ConfigError::Validation { field, reason } => CliError::Validation {
            field: format!("profiles.{name}.{field}"),
            reason,
        },
        other => other.into(),
    })?;
    Ok(())
}

fn to_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Internal {
        message: format!("TOML serialization failed: {e}"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);
    match args.command {
        ConfigCommand::Init => {
            eprintln!("HOT22 dashboard configuration");
            eprintln!("   Config path: {}\n", path.display());

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(DEFAULT_API_URL.into())
                .validate_with(|s: &String| {
                    s.parse::<url::Url>()
                        .map(|_| ())
                        .map_err(|e| format!("not a URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let page_size: u32 = Input::new()
                .with_prompt("Rows per page")
                .default(50)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load(global)?;
            let profile = Profile {
                api_url,
                page_size: Some(page_size),
                ..Profile::default()
            };
            check_profile(&name, &profile, &cfg)?;
            cfg.profiles.insert(name.clone(), profile);
            cfg.default_profile = Some(name.clone());
            save(&cfg, &path)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {name}");
            eprintln!("\n  Test it: hot22 health");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = match global.output {
                OutputFormat::Table => to_toml(&cfg)?,
                format => output::render_single(format, &cfg, |_| String::new(), |c| {
                    c.default_profile.clone().unwrap_or_else(|| "default".into())
                })?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: hot22 config init");
                return Ok(());
            }
            let lines: Vec<String> = cfg
                .profiles
                .iter()
                .map(|(name, p)| {
                    let marker = if name == default { " *" } else { "" };
                    match global.output {
                        OutputFormat::Plain => name.clone(),
                        _ => format!("{name}{marker}  {}", p.api_url),
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            api_url,
            timeout,
            page_size,
            realtime_interval,
            download_dir,
            default,
        } => {
            let mut cfg = config::load(global)?;
            let dev_mode = cfg.profiles.get(&name).is_some_and(|p| p.dev_mode);
            let profile = Profile {
                api_url,
                dev_mode,
                timeout,
                page_size,
                realtime_interval,
                download_dir,
            };
            check_profile(&name, &profile, &cfg)?;
            cfg.profiles.insert(name.clone(), profile);
            // A default that names no written profile is replaced.
            let dangling = cfg
                .default_profile
                .as_ref()
                .is_none_or(|d| !cfg.profiles.contains_key(d));
            if default || dangling {
                cfg.default_profile = Some(name.clone());
            }
            save(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Saved profile '{name}' to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            save(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
