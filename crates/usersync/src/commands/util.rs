//! Shared helpers for command handlers.

use std::io::IsTerminal;

use usersync_core::UserStore;

use crate::error::CliError;

/// Turn whatever failure the last read action left in the store into an
/// error, so read commands exit non-zero.
pub fn check_store(store: &UserStore) -> Result<(), CliError> {
    let state = store.state();
    match state.error {
        Some(message) => Err(CliError::from_store(
            message,
            state.error_kind,
            store.service().client().base_url().as_str(),
        )),
        None => Ok(()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, refuses instead of guessing.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
