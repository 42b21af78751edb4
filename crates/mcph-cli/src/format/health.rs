use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde_json::json;

use mcph_core::{HealthCheckResult, HealthStatus};

use super::{render_table, Cell, FormatOptions, OutputFormat, GREEN, RED, YELLOW};

pub fn format_health_result(result: &HealthCheckResult, opts: &FormatOptions) -> String {
    match opts.format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Plain => format_plain(result),
        OutputFormat::Table => format_table(result, opts),
    }
}

fn format_table(result: &HealthCheckResult, opts: &FormatOptions) -> String {
    let rows: Vec<Vec<Cell>> = result.servers.iter().map(server_row).collect();
    let table = render_table(&["Server", "Status", "Latency", "Last Checked"], &rows, opts.use_colors);

    let total = result.servers.len();
    let count = format!("{}/{total}", result.success_count);
    let count = opts.paint(&count, if result.success_count == total { GREEN } else { YELLOW });
    let secs = result.total_time_ms as f64 / 1000.0;

    format!("{table}\nTotal: {count} servers connected ({secs:.1}s)")
}

fn server_row(server: &HealthStatus) -> Vec<Cell> {
    let status = if server.is_connected {
        Cell::colored("Connected", GREEN)
    } else {
        Cell::colored("Failed", RED)
    };
    vec![
        Cell::new(server.name.as_str()),
        status,
        Cell::new(latency_or(server.latency_ms, "-")),
        Cell::new(local_time(server.checked_at)),
    ]
}

fn format_json(result: &HealthCheckResult) -> String {
    let servers: Vec<_> = result
        .servers
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "connected": s.is_connected,
                "latencyMs": s.latency_ms,
                "lastChecked": iso(s.checked_at),
                "error": s.error_message,
            })
        })
        .collect();

    let output = json!({
        "servers": servers,
        "summary": {
            "total": result.servers.len(),
            "connected": result.success_count,
            "failed": result.failure_count,
            "totalTimeMs": result.total_time_ms,
            "checkedAt": iso(result.checked_at),
        },
    });
    format!("{output:#}")
}

fn format_plain(result: &HealthCheckResult) -> String {
    let mut out = String::new();
    out.push_str("MCP Server Health Status\n");
    out.push_str("========================\n\n");

    for server in &result.servers {
        let status = if server.is_connected { "[OK]" } else { "[FAIL]" };
        out.push_str(&format!(
            "{status} {} - {}\n",
            server.name,
            latency_or(server.latency_ms, "N/A")
        ));
        if let Some(err) = &server.error_message {
            out.push_str(&format!("     Error: {err}\n"));
        }
    }

    out.push_str(&format!("\nConnected: {}/{}\n", result.success_count, result.servers.len()));
    out.push_str(&format!("Total time: {}ms", result.total_time_ms));
    out
}

fn latency_or(latency_ms: Option<u64>, missing: &str) -> String {
    latency_ms.map_or_else(|| missing.to_string(), |ms| format!("{ms}ms"))
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub(crate) fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
