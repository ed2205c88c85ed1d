//! Opening GitHub pages in the system browser.

use anyhow::{Context, Result};
use std::io;
use std::process::{Command, Stdio};
use std::thread;

/// Program and leading arguments used to open a URL.
///
/// # Arguments
/// * `browser_env` - Value of `$BROWSER`, if set
///
/// # Details
/// `$BROWSER` wins when set. Otherwise uses `open` on macOS, `cmd /C start` on
/// Windows and `xdg-open` everywhere else.
pub fn browser_command(browser_env: Option<String>) -> (String, Vec<String>) {
    if let Some(browser) = browser_env.filter(|b| !b.trim().is_empty()) {
        return (browser, Vec::new());
    }

    if cfg!(target_os = "macos") {
        ("open".to_string(), Vec::new())
    } else if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec!["/C".to_string(), "start".to_string(), String::new()],
        )
    } else {
        ("xdg-open".to_string(), Vec::new())
    }
}

/// Open `url` in the browser without waiting for it.
///
/// # Details
/// The child's output is discarded so it cannot draw over the TUI.
pub fn open_in_browser(url: &str) -> Result<()> {
    let (program, args) = browser_command(std::env::var("BROWSER").ok());
    tracing::debug!("Opening {} with {}", url, program);

    let mut command = Command::new(&program);
    command.args(&args).arg(url);
    spawn_detached(command)
        .with_context(|| format!("Failed to open {} with {}", url, program))?;

    Ok(())
}

/// Spawn `command` with null stdio and reap it on a background thread.
fn spawn_detached(mut command: Command) -> io::Result<thread::JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!("Failed to wait for browser process: {}", e);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_env_wins() {
        let (program, args) = browser_command(Some("firefox".to_string()));
        assert_eq!(program, "firefox");
        assert!(args.is_empty());
    }

    #[test]
    fn test_blank_browser_env_is_ignored() {
        let (program, _) = browser_command(Some("  ".to_string()));
        assert_ne!(program.trim(), "");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_default() {
        assert_eq!(browser_command(None).0, "xdg-open");
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached_reaps_child() {
        let handle = spawn_detached(Command::new("true")).unwrap();
        // The reaper thread returns once the child has exited and been waited on
        handle.join().unwrap();
    }

    #[test]
    fn test_spawn_detached_reports_missing_program() {
        assert!(spawn_detached(Command::new("gh-activity-no-such-browser")).is_err());
    }
}
