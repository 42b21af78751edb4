use serde_json::json;

use mcph_history::UptimeStats;

use super::health::iso;
use super::{render_table, Cell, FormatOptions, OutputFormat, GREEN, RED, YELLOW};

pub const NO_HISTORY: &str = "No history data available. Run health checks to collect data.";

/// Render uptime statistics. JSON output stays a document even when
/// there is no history.
pub fn format_uptime_stats(stats: &[UptimeStats], opts: &FormatOptions) -> String {
    if stats.is_empty() && !opts.is_json() {
        return opts.paint(NO_HISTORY, YELLOW);
    }

    match opts.format {
        OutputFormat::Json => format_json(stats),
        OutputFormat::Plain => format_plain(stats),
        OutputFormat::Table => format_table(stats, opts),
    }
}

fn uptime_color(percentage: f64) -> &'static str {
    if percentage >= 99.0 {
        GREEN
    } else if percentage >= 95.0 {
        YELLOW
    } else {
        RED
    }
}

fn average_uptime(stats: &[UptimeStats]) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    stats.iter().map(|s| s.uptime_percentage).sum::<f64>() / stats.len() as f64
}

fn format_table(stats: &[UptimeStats], opts: &FormatOptions) -> String {
    let rows: Vec<Vec<Cell>> = stats
        .iter()
        .map(|s| {
            vec![
                Cell::new(s.server_name.as_str()),
                Cell::colored(format!("{:.1}%", s.uptime_percentage), uptime_color(s.uptime_percentage)),
                Cell::new(format!("{}/{}", s.successful_checks, s.total_checks)),
                Cell::new(s.average_latency_ms.map_or_else(|| "-".to_string(), |ms| format!("{ms}ms"))),
                if s.last_status {
                    Cell::colored("Up", GREEN)
                } else {
                    Cell::colored("Down", RED)
                },
            ]
        })
        .collect();
    let table = render_table(&["Server", "Uptime", "Checks", "Avg Latency", "Status"], &rows, opts.use_colors);

    let avg = average_uptime(stats);
    let avg_text = opts.paint(&format!("{avg:.1}%"), uptime_color(avg));
    format!("{table}\nAverage uptime: {avg_text} across {} servers", stats.len())
}

fn format_json(stats: &[UptimeStats]) -> String {
    let servers: Vec<_> = stats
        .iter()
        .map(|s| {
            json!({
                "name": s.server_name,
                "uptimePercentage": s.uptime_percentage,
                "totalChecks": s.total_checks,
                "successfulChecks": s.successful_checks,
                "averageLatencyMs": s.average_latency_ms,
                "currentStatus": if s.last_status { "up" } else { "down" },
                "lastChecked": iso(s.last_checked),
            })
        })
        .collect();

    let output = json!({
        "servers": servers,
        "summary": {
            "serverCount": stats.len(),
            "averageUptime": average_uptime(stats),
        },
    });
    format!("{output:#}")
}

fn format_plain(stats: &[UptimeStats]) -> String {
    let mut out = String::new();
    out.push_str("MCP Server Uptime Statistics\n");
    out.push_str("============================\n\n");

    for s in stats {
        let status = if s.last_status { "[UP]" } else { "[DOWN]" };
        let latency = match s.average_latency_ms {
            Some(ms) => format!("avg {ms}ms"),
            None => "no latency data".to_string(),
        };
        out.push_str(&format!("{status} {}\n", s.server_name));
        out.push_str(&format!(
            "     Uptime: {:.1}% ({}/{} checks)\n",
            s.uptime_percentage, s.successful_checks, s.total_checks
        ));
        out.push_str(&format!("     Latency: {latency}\n"));
    }

    out.push_str(&format!("\nAverage uptime: {:.1}%", average_uptime(stats)));
    out
}
