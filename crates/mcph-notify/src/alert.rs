//! Alert delivery.

use std::io;
use std::process::Stdio;

use tokio::process::Command;

use crate::tracker::TransitionEvent;

/// A user-facing notification for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl From<&TransitionEvent> for Alert {
    fn from(event: &TransitionEvent) -> Self {
        if event.went_up {
            Alert {
                title: "✓ MCP Server Recovered".to_string(),
                message: format!("{} is now connected", event.server_name),
            }
        } else {
            let message = match &event.error_message {
                Some(err) => format!("{} is offline: {err}", event.server_name),
                None => format!("{} is offline", event.server_name),
            };
            Alert {
                title: "✗ MCP Server Down".to_string(),
                message,
            }
        }
    }
}

/// Somewhere alerts can be delivered.
pub trait AlertSink: Send + Sync {
    fn send(&self, alert: &Alert) -> io::Result<()>;
}

/// Native desktop notifications via the platform's command-line helper.
///
/// The helper runs detached; only a failure to start it is reported.
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopAlert;

impl AlertSink for DesktopAlert {
    fn send(&self, alert: &Alert) -> io::Result<()> {
        spawn_detached(platform_command(alert))
    }
}

/// Start `cmd` and forget it. The runtime's orphan queue reaps the child
/// once it exits.
fn spawn_detached(mut cmd: Command) -> io::Result<()> {
    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false)
        .spawn()?;
    drop(child);
    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_command(alert: &Alert) -> Command {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        applescript_escape(&alert.message),
        applescript_escape(&alert.title)
    );
    let mut cmd = Command::new("osascript");
    cmd.args(["-e", &script]);
    cmd
}

#[cfg(target_os = "windows")]
fn platform_command(alert: &Alert) -> Command {
    let template = format!(
        "<toast><visual><binding template=\"ToastText02\"><text id=\"1\">{}</text><text id=\"2\">{}</text></binding></visual></toast>",
        xml_escape(&alert.title),
        xml_escape(&alert.message)
    );
    let script = format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; \
         [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime] | Out-Null; \
         $xml = New-Object Windows.Data.Xml.Dom.XmlDocument; \
         $xml.LoadXml('{}'); \
         $toast = [Windows.UI.Notifications.ToastNotification]::new($xml); \
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('MCP Health').Show($toast)",
        powershell_single_quote(&template)
    );
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-Command", &script]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_command(alert: &Alert) -> Command {
    let mut cmd = Command::new("notify-send");
    cmd.args([alert.title.as_str(), alert.message.as_str()]);
    cmd
}

/// Escape text for a double-quoted AppleScript string literal.
#[cfg_attr(not(any(target_os = "macos", test)), allow(dead_code))]
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg_attr(not(any(target_os = "windows", test)), allow(dead_code))]
fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape text for a single-quoted PowerShell string literal.
#[cfg_attr(not(any(target_os = "windows", test)), allow(dead_code))]
fn powershell_single_quote(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(went_up: bool, error: Option<&str>) -> TransitionEvent {
        TransitionEvent {
            server_name: "github".to_string(),
            went_up,
            error_message: error.map(str::to_string),
        }
    }

    #[test]
    fn recovery_alert() {
        let alert = Alert::from(&event(true, None));
        assert_eq!(alert.title, "✓ MCP Server Recovered");
        assert_eq!(alert.message, "github is now connected");
    }

    #[test]
    fn down_alert_includes_error() {
        let alert = Alert::from(&event(false, Some("Timed out after 3000ms")));
        assert_eq!(alert.title, "✗ MCP Server Down");
        assert_eq!(alert.message, "github is offline: Timed out after 3000ms");
    }

    #[test]
    fn down_alert_without_error() {
        let alert = Alert::from(&event(false, None));
        assert_eq!(alert.message, "github is offline");
    }

    #[tokio::test]
    async fn detached_spawn_reports_missing_helper() {
        let err = spawn_detached(Command::new("mcph-definitely-not-installed-notifier")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn detached_spawn_returns_without_waiting() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = std::time::Instant::now();
        spawn_detached(cmd).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn applescript_quotes_are_escaped() {
        assert_eq!(applescript_escape(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
    }

    #[test]
    fn powershell_quotes_are_doubled() {
        assert_eq!(powershell_single_quote("it's"), "it''s");
    }

    #[test]
    fn xml_specials_are_escaped() {
        assert_eq!(xml_escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
