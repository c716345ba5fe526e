use owo_colors::OwoColorize;
use renderdot_core::{DepGraph, GraphSummary};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "renderdot".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract renderDot dependency graphs from HTML\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

fn print_field(label: &str, value: impl std::fmt::Display) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.to_string().bright_white());
}

/// Print what the parser kept and skipped
pub fn print_parse_details(graph: &DepGraph) {
    let record = graph.record();
    if let Some(name) = record.name().filter(|name| !name.is_empty()) {
        print_field("Graph", name);
    }
    print_field("Strict", record.is_strict());
    print_field("Statements", graph.report().statements);

    for skipped in &graph.report().skipped {
        eprintln!(
            "  {} #{} {} {}",
            "Skipped".dimmed(),
            skipped.index,
            skipped.reason.bright_yellow(),
            skipped.text.dimmed()
        );
    }
}

/// Print the graph summary
pub fn print_summary(summary: &GraphSummary) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Graph Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    print_field("Nodes", summary.node_count);
    if summary.distinct_node_count != summary.node_count {
        print_field("Distinct nodes", summary.distinct_node_count);
    }
    print_field("Edges", summary.edge_count);
    print_field("Node info", summary.node_info_count);
    if summary.skipped_statements > 0 {
        print_field("Skipped statements", summary.skipped_statements);
    }

    for (style, count) in &summary.edge_styles {
        print_field(&format!("  {}", style), count);
    }

    if !summary.node_shapes.is_empty() {
        eprintln!("  {}", "Shapes:".dimmed());
        for (shape, count) in &summary.node_shapes {
            print_field(&format!("  {}", shape), count);
        }
    }

    if !summary.top_in_degree.is_empty() {
        eprintln!("  {}", "Most depended upon:".dimmed());
        for entry in &summary.top_in_degree {
            eprintln!("    {:>4}  {}", entry.degree.to_string().bright_white(), entry.id);
        }
    }

    if !summary.top_out_degree.is_empty() {
        eprintln!("  {}", "Most dependencies:".dimmed());
        for entry in &summary.top_out_degree {
            eprintln!("    {:>4}  {}", entry.degree.to_string().bright_white(), entry.id);
        }
    }

    warn_list("duplicate node ids", &summary.duplicate_nodes);
    warn_list("edge endpoints without a node statement", &summary.undeclared_endpoints);
    warn_list("isolated nodes", &summary.isolated_nodes);
    warn_list("node_info entries without a node", &summary.unmatched_node_info);

    let parallel: Vec<String> = summary
        .parallel_edges
        .iter()
        .map(|edge| format!("{} (x{})", edge.id, edge.count))
        .collect();
    warn_list("parallel edges", &parallel);
    eprintln!();
}

fn warn_list(what: &str, ids: &[String]) {
    const SHOWN: usize = 5;

    if ids.is_empty() {
        return;
    }

    let mut listed = ids.iter().take(SHOWN).cloned().collect::<Vec<_>>().join(", ");
    if ids.len() > SHOWN {
        listed.push_str(&format!(", ... ({} more)", ids.len() - SHOWN));
    }
    print_warning(&format!("{} {}: {}", ids.len(), what, listed));
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
