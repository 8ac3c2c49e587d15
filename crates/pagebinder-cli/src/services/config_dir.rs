// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config directory resolution.

use std::path::PathBuf;

/// File name of the per-user options file inside the config directory.
pub const OPTIONS_FILE: &str = "options.json";

/// Return the Pagebinder config directory, if a base can be determined.
///
/// Nothing is created; the directory only matters when the user has put an
/// options file there.
pub fn config_dir() -> Option<PathBuf> {
    config_base(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .map(|base| base.join("pagebinder"))
}

/// Path of the per-user options file (`<config dir>/options.json`).
pub fn default_options_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(OPTIONS_FILE))
}

fn config_base(xdg: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    // Try XDG config dir, then fallback to home
    xdg.filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let base = config_base(Some("/xdg".into()), Some("/home/me".into()));
        assert_eq!(base, Some(PathBuf::from("/xdg")));
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let base = config_base(Some("relative".into()), Some("/home/me".into()));
        assert_eq!(base, Some(PathBuf::from("/home/me/.config")));
    }

    #[test]
    fn no_base_without_env() {
        assert_eq!(config_base(None, None), None);
    }
}
