//! Human-readable report formatting.

use loadcast_core::{GroupComparison, GroupSummary, ProjectionResult};

pub fn format_projection(result: &ProjectionResult) -> String {
    let mut out = String::new();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  Scalability Projection                  ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Group:  {:<31} ║\n", result.group));
    out.push_str(&format!("║  Model:  {:<31} ║\n", result.model));
    out.push_str(&format!(
        "║  Target: {:<31} ║\n",
        format!("{} virtual users", result.target_load)
    ));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    let availability = (1.0 - result.projected_failure_rate) * 100.0;
    out.push_str(&format!("Projected at {} virtual users:\n", result.target_load));
    out.push_str(&format!(
        "  • Duration (p95): {:.0}ms\n",
        result.projected_duration_ms
    ));
    out.push_str(&format!(
        "  • Failure rate:   {:.2}%\n",
        result.projected_failure_rate * 100.0
    ));
    out.push_str(&format!("  • Availability:   {availability:.2}%\n"));
    out.push_str(&format!(
        "  • Confidence:     {:.0}%\n\n",
        result.confidence * 100.0
    ));

    if !result.verdicts.is_empty() {
        out.push_str("Requirements:\n");
        for verdict in &result.verdicts {
            let symbol = if verdict.satisfied { "✅" } else { "❌" };
            out.push_str(&format!(
                "  {symbol} {}: {:.4} vs limit {:.4}\n",
                verdict.requirement, verdict.projected, verdict.limit
            ));
        }
        out.push('\n');
    }

    if result.meets_requirements {
        out.push_str("✅ MEETS REQUIREMENTS at the target load\n");
    } else {
        out.push_str("❌ DOES NOT MEET REQUIREMENTS at the target load\n");
    }

    out
}

pub fn format_comparison(comparison: &GroupComparison) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n🌎 {} vs {}\n",
        comparison.left, comparison.right
    ));
    out.push_str(&format!(
        "  • Duration divergence: {:.2}% (threshold {:.0}%)\n",
        comparison.duration_divergence_pct, comparison.threshold_pct
    ));
    out.push_str(&format!(
        "  • Failure divergence:  {:.2}%\n",
        comparison.failure_divergence_pct
    ));
    out.push_str(&format!("  • Verdict: {}\n", comparison.verdict.label()));

    out
}

pub fn format_summary(summary: &GroupSummary) -> String {
    let p99 = match summary.p99_ms {
        Some(ms) => format!("{ms:.1}ms"),
        None => "-".to_string(),
    };
    format!(
        "  {}: {} samples @ {} VUs, mean {:.1}ms, p95 {:.1}ms, p99 {p99}, failures {:.2}%\n",
        summary.group,
        summary.count,
        summary.observed_load,
        summary.mean_ms,
        summary.p95_ms,
        summary.failure_rate * 100.0
    )
}

/// One line per group, sorted by tag.
pub fn format_summaries<'a>(summaries: impl IntoIterator<Item = &'a GroupSummary>) -> String {
    let mut rows: Vec<&GroupSummary> = summaries.into_iter().collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group));

    let mut out = String::from("Group summaries:\n");
    for summary in rows {
        out.push_str(&format_summary(summary));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcast_core::{Equivalence, RequirementVerdict};

    fn sample_result() -> ProjectionResult {
        ProjectionResult {
            group: "participante".to_string(),
            target_load: 215_000,
            projected_duration_ms: 790.0,
            projected_failure_rate: 0.0,
            confidence: 0.70,
            verdicts: vec![
                RequirementVerdict {
                    requirement: "max_duration_ms".to_string(),
                    limit: 5000.0,
                    projected: 790.0,
                    satisfied: true,
                },
                RequirementVerdict {
                    requirement: "max_failure_rate".to_string(),
                    limit: 0.02,
                    projected: 0.0,
                    satisfied: true,
                },
            ],
            meets_requirements: true,
            model: "log-growth/single-point".to_string(),
        }
    }

    #[test]
    fn projection_report_restates_all_fields() {
        let text = format_projection(&sample_result());
        assert!(text.contains("215000"));
        assert!(text.contains("790ms"));
        assert!(text.contains("0.00%"));
        assert!(text.contains("70%"));
        assert!(text.contains("max_duration_ms"));
        assert!(text.contains("max_failure_rate"));
        assert!(text.contains("log-growth/single-point"));
        assert!(text.contains("MEETS REQUIREMENTS"));
    }

    #[test]
    fn failing_projection_says_so() {
        let mut result = sample_result();
        result.meets_requirements = false;
        result.verdicts[0].satisfied = false;

        let text = format_projection(&result);
        assert!(text.contains("DOES NOT MEET REQUIREMENTS"));
        assert!(text.contains("❌"));
    }

    #[test]
    fn comparison_report() {
        let comparison = GroupComparison {
            left: "nordeste".to_string(),
            right: "sudeste".to_string(),
            duration_divergence_pct: 3.25,
            failure_divergence_pct: 0.0,
            threshold_pct: 10.0,
            verdict: Equivalence::Equivalent,
        };

        let text = format_comparison(&comparison);
        assert!(text.contains("nordeste vs sudeste"));
        assert!(text.contains("3.25%"));
        assert!(text.contains("EQUIVALENT"));
    }

    #[test]
    fn summaries_sorted_by_tag() {
        let summaries = vec![
            GroupSummary::empty("zulu", 100),
            GroupSummary::empty("alpha", 100),
        ];
        let text = format_summaries(&summaries);
        let alpha = text.find("alpha").unwrap();
        let zulu = text.find("zulu").unwrap();
        assert!(alpha < zulu);
    }
}
