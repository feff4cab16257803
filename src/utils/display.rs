use crate::domain::model::BatchResult;

/// Fixed-width results table for terminal output.
pub fn results_table(result: &BatchResult) -> String {
    let mut lines = vec![format!(
        "{:<16} {:>12} {:>12} {:>12} {:>14}",
        "SampleID", "Sample (µL)", "Water (µL)", "Total (µL)", "Final (ng/µL)"
    )];

    for row in &result.results {
        lines.push(format!(
            "{:<16} {:>12.1} {:>12.1} {:>12.1} {:>14.2}",
            row.sample_id,
            row.sample_volume,
            row.water_volume,
            row.total_volume,
            row.final_concentration
        ));
    }

    let summary = result.summary();
    lines.push(String::new());
    lines.push(format!(
        "📊 {} samples processed, {} off target",
        summary.processed,
        summary.off_target()
    ));

    lines.join("\n")
}
