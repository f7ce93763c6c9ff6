//! Config subcommand handlers.

use usersync_config::{Config, Profile, profile_to_client_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(global.output, &cfg, show_detail, |c| {
                c.default_profile_name().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            resource,
            paged_list,
            set_default,
        } => {
            let base_url = global.base_url.clone().ok_or_else(|| CliError::Validation {
                field: "base-url".into(),
                reason: "config init needs --base-url (e.g. http://localhost:8080/api)".into(),
            })?;

            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = Profile {
                resource,
                paged_list,
                timeout: global.timeout,
                ..Profile::new(base_url)
            };
            // Validate before writing.
            profile_to_client_config(&profile, &profile_name)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            if set_default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            let path = config::save_config(&cfg)?;
            output::print_status(
                &format!("Profile '{profile_name}' written to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn show_detail(cfg: &Config) -> String {
    let mut profiles: Vec<(&String, &Profile)> = cfg.profiles.iter().collect();
    profiles.sort_unstable_by_key(|(name, _)| *name);

    let mut lines = vec![
        format!("Default profile: {}", cfg.default_profile_name()),
        format!("Output:          {}", cfg.defaults.output),
        format!("Timeout:         {}s", cfg.defaults.timeout),
    ];
    for (name, profile) in profiles {
        let paths = profile.resource_paths();
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  Base URL:   {}", profile.base_url));
        lines.push(format!("  Resource:   {}", paths.collection));
        lines.push(format!("  Paged list: {}", paths.paged_list));
        if let Some(timeout) = profile.timeout {
            lines.push(format!("  Timeout:    {timeout}s"));
        }
    }
    lines.join("\n")
}
