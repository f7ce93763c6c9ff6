//! CLI-side configuration resolution.
//!
//! Profiles come from `usersync-config`; this module layers the global
//! flags on top and produces the `ClientConfig` the store is built from.

use usersync_config::{Config, Profile, profile_to_client_config};
use usersync_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use usersync_config::{config_path, load_config, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build the `ClientConfig` for this invocation.
///
/// Precedence: flag (or its env var) > profile > defaults. An explicitly
/// requested profile must exist; without one, a missing default profile
/// falls back to the built-in defaults.
pub fn resolve_client_config(global: &GlobalOpts, config: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let base = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => Profile::new(ClientConfig::default().base_url.as_str()),
    };

    let profile = Profile {
        base_url: global.base_url.clone().unwrap_or(base.base_url),
        timeout: global
            .timeout
            .or(base.timeout)
            .or(Some(config.defaults.timeout)),
        ..base
    };

    Ok(profile_to_client_config(&profile, &profile_name)?)
}

/// Comma-separated profile names, sorted, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
