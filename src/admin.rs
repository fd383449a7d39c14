//! Admin console gate
//!
//! The original design is a single shared secret compared locally, with
//! no remote call. It is kept isolated here so a real auth mechanism can
//! replace it without touching the sync engine.

use crate::model::SiteSettings;

/// Check a login attempt against the configured admin password.
///
/// Falls back to the default secret when settings carry none. The caller
/// is expected to flash a transient error on `false` and clear it after a
/// fixed delay; no state is kept here.
pub fn verify_password(settings: &SiteSettings, input: &str) -> bool {
    let fallback = SiteSettings::default().admin_password;
    let expected = settings
        .admin_password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or(fallback);

    match expected {
        Some(expected) => input == expected,
        None => false,
    }
}
