use std::collections::BTreeMap;
use std::path::Path;

use loadcast_core::{GroupSummary, Sample};
use loadcast_project::report;

pub fn aggregate(input: &str, load: u32, format: &str) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(Path::new(input))?;
    let samples: Vec<Sample> = serde_json::from_str(&content)?;

    tracing::info!(samples = samples.len(), load, "aggregating samples");

    let summaries = loadcast_aggregate::aggregate(&samples, load);

    match format {
        "json" => {
            // BTreeMap for stable group ordering in the output.
            let ordered: BTreeMap<&String, &GroupSummary> = summaries.iter().collect();
            println!("{}", serde_json::to_string_pretty(&ordered)?);
        }
        _ => {
            println!("{}", report::format_summaries(summaries.values()));
        }
    }

    Ok(())
}
