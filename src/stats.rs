//! Annotation statistics.
//!
//! Prints the same counts the sidebar overview shows: one row per annotation
//! type plus the total. Unknown types are not counted, and the number
//! dropped is reported separately so a snapshot with stray types does not
//! look silently short. Used by `msb stats`.

use anyhow::Result;
use memory_sidebar_core::{aggregate_stats, classify, Annotation, AnnotationType, Stats};

/// Run the stats command over a loaded snapshot.
pub fn run_stats(annotations: &[Annotation], json: bool) -> Result<()> {
    let classification = classify(annotations);
    let stats = aggregate_stats(&classification);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print!("{}", format_stats(&stats, classification.dropped()));
    Ok(())
}

/// Render the text table printed by `msb stats`.
pub fn format_stats(stats: &Stats, dropped: usize) -> String {
    let mut out = String::new();
    out.push_str("Memory Sidebar — Annotation Stats\n");
    out.push_str("=================================\n\n");
    out.push_str(&format!("  {:<18} {:>6}   {}\n", "TYPE", "COUNT", "SHARE"));
    out.push_str(&format!("  {}\n", "-".repeat(36)));

    for kind in AnnotationType::ALL {
        let count = stats.count(kind);
        out.push_str(&format!(
            "  {:<18} {:>6}   {}\n",
            kind.info().label,
            count,
            format_share(count, stats.total)
        ));
    }

    out.push_str(&format!("  {}\n", "-".repeat(36)));
    out.push_str(&format!("  {:<18} {:>6}\n", "Total", stats.total));
    if dropped > 0 {
        out.push_str(&format!(
            "\n  {} annotation{} of unknown type not shown\n",
            dropped,
            if dropped == 1 { "" } else { "s" }
        ));
    }
    out
}

fn format_share(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{}%", (count * 100) / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_type_in_order() {
        let anns = vec![
            Annotation::new("a", "hook", 0.9),
            Annotation::new("b", "hook", 0.1),
            Annotation::new("c", "character_event", 0.5),
            Annotation::new("d", "scene", 0.5),
        ];
        let c = classify(&anns);
        let text = format_stats(&aggregate_stats(&c), c.dropped());

        let hook = text.find("Hook").unwrap();
        let fore = text.find("Foreshadow").unwrap();
        let plot = text.find("Plot point").unwrap();
        let chr = text.find("Character event").unwrap();
        assert!(hook < fore && fore < plot && plot < chr);

        assert!(text.contains("66%"));
        assert!(text.contains("1 annotation of unknown type not shown"));
        let total_line = text.lines().find(|l| l.trim_start().starts_with("Total")).unwrap();
        assert!(total_line.ends_with(" 3"));
    }

    #[test]
    fn empty_snapshot_has_no_shares() {
        let text = format_stats(&Stats::default(), 0);
        assert!(text.lines().filter(|l| l.ends_with("   -")).count() == 4);
        assert!(!text.contains("unknown type"));
    }
}
