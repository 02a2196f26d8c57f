use std::collections::HashMap;
use std::path::Path;

use loadcast_core::{GroupSummary, LoadcastConfig, ProjectionResult};
use loadcast_project::{ProjectionConfig, report};

pub fn project(
    input: &str,
    config_path: &str,
    group: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let config = LoadcastConfig::from_file(Path::new(config_path))?;
    let content = std::fs::read_to_string(Path::new(input))?;
    let summaries: Vec<GroupSummary> = serde_json::from_str(&content)?;

    let mut groups: HashMap<String, Vec<GroupSummary>> = HashMap::new();
    for summary in summaries {
        if let Some(wanted) = group
            && summary.group != wanted
        {
            continue;
        }
        groups.entry(summary.group.clone()).or_default().push(summary);
    }

    tracing::info!(
        groups = groups.len(),
        target_load = config.target.load,
        "projecting group baselines"
    );

    let projection_config = ProjectionConfig {
        thresholds: config.requirement_thresholds(),
        model: config.model_params(),
        confidence: config.confidence_params(),
    };

    let results = loadcast_project::project_all(&groups, config.target.load, &projection_config);

    match format {
        "json" => {
            let succeeded: Vec<&ProjectionResult> =
                results.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
            println!("{}", serde_json::to_string_pretty(&succeeded)?);
            for (tag, result) in &results {
                if let Err(e) = result {
                    eprintln!("{tag}: {e}");
                }
            }
        }
        _ => {
            for (tag, result) in &results {
                match result {
                    Ok(projection) => println!("{}", report::format_projection(projection)),
                    Err(e) => println!("❌ {tag}: {e}"),
                }
            }
        }
    }

    Ok(())
}
