//! Locating a Chrome/Chromium executable for the dynamic strategy.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Result, ScrapeConfig, ScrapeError};

/// Environment variable naming an explicit Chrome executable.
pub const CHROME_ENV: &str = "CHROME";

#[cfg(target_os = "macos")]
const KNOWN_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
];

#[cfg(all(unix, not(target_os = "macos")))]
const KNOWN_PATHS: &[&str] = &[
    "/opt/google/chrome/chrome",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(windows)]
const KNOWN_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(unix, windows)))]
const KNOWN_PATHS: &[&str] = &[];

/// Command names looked up in `PATH`.
const KNOWN_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Finds an installed Chrome/Chromium.
///
/// Checks, in order: the `CHROME` environment variable, well-known command
/// names in `PATH`, then well-known install locations.
pub fn detect_chrome() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CHROME_ENV).map(PathBuf::from) {
        if path.exists() {
            debug!("Chrome found via {}: {}", CHROME_ENV, path.display());
            return Some(path);
        }
    }

    for cmd in KNOWN_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            debug!("Chrome found in PATH: {}", path.display());
            return Some(path);
        }
    }

    KNOWN_PATHS
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(|path| {
            debug!("Chrome found at known path: {}", path.display());
            path.to_path_buf()
        })
}

/// Resolves the executable to launch for `config`.
///
/// An explicit `chrome_path` wins but must exist; otherwise detection runs.
pub fn resolve_chrome(config: &ScrapeConfig) -> Result<PathBuf> {
    if let Some(path) = &config.chrome_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(ScrapeError::Launch(format!(
            "configured chrome_path {} does not exist",
            path.display()
        )));
    }

    detect_chrome().ok_or_else(|| {
        ScrapeError::Launch(format!(
            "no Chrome/Chromium found; install one, set {} or chrome_path",
            CHROME_ENV
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands_not_empty() {
        assert!(!KNOWN_COMMANDS.is_empty());
    }

    #[test]
    fn test_detect_chrome_returns_option() {
        // Result depends on the machine; it must not panic.
        let _ = detect_chrome();
    }

    #[test]
    fn test_resolve_missing_configured_path() {
        let config = ScrapeConfig {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome-for-shelfscan")),
            ..Default::default()
        };
        let err = resolve_chrome(&config).unwrap_err();
        assert!(matches!(err, ScrapeError::Launch(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_existing_configured_path() {
        let exe = std::env::current_exe().unwrap();
        let config = ScrapeConfig {
            chrome_path: Some(exe.clone()),
            ..Default::default()
        };
        assert_eq!(resolve_chrome(&config).unwrap(), exe);
    }
}
