use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use loadcast_core::{GroupComparison, GroupSummary, LoadcastConfig};
use loadcast_project::{ProjectionConfig, report};

pub fn compare(input: &str, config_path: &str, observed: bool, format: &str) -> anyhow::Result<()> {
    let config = LoadcastConfig::from_file(Path::new(config_path))?;
    let content = std::fs::read_to_string(Path::new(input))?;
    let summaries: Vec<GroupSummary> = serde_json::from_str(&content)?;
    let threshold = config.divergence_threshold_pct();

    let comparisons = if observed {
        compare_observed(summaries, threshold)
    } else {
        compare_projected(summaries, &config, threshold)
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&comparisons)?),
        _ => {
            for comparison in &comparisons {
                println!("{}", report::format_comparison(comparison));
            }
        }
    }

    Ok(())
}

/// Pairwise comparison of the highest-load observed summary per group.
fn compare_observed(summaries: Vec<GroupSummary>, threshold: f64) -> Vec<GroupComparison> {
    let mut best: BTreeMap<String, GroupSummary> = BTreeMap::new();
    for summary in summaries {
        match best.get(&summary.group) {
            Some(current) if current.observed_load >= summary.observed_load => {}
            _ => {
                best.insert(summary.group.clone(), summary);
            }
        }
    }

    let groups: Vec<GroupSummary> = best.into_values().collect();
    let mut comparisons = Vec::new();
    for (i, left) in groups.iter().enumerate() {
        for right in &groups[i + 1..] {
            comparisons.push(loadcast_project::compare_summaries(left, right, threshold));
        }
    }
    comparisons
}

/// Pairwise comparison of projected figures at the configured target load.
fn compare_projected(
    summaries: Vec<GroupSummary>,
    config: &LoadcastConfig,
    threshold: f64,
) -> Vec<GroupComparison> {
    let mut groups: HashMap<String, Vec<GroupSummary>> = HashMap::new();
    for summary in summaries {
        groups.entry(summary.group.clone()).or_default().push(summary);
    }

    let projection_config = ProjectionConfig {
        thresholds: config.requirement_thresholds(),
        model: config.model_params(),
        confidence: config.confidence_params(),
    };

    let results = loadcast_project::project_all(&groups, config.target.load, &projection_config);
    let projected: Vec<_> = results
        .into_iter()
        .filter_map(|(_, r)| r.ok())
        .collect();

    loadcast_project::compare_all(&projected, threshold)
}
