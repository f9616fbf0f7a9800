use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use stagehand_core::script::{Script, Simulator};
use stagehand_core::AppConfig;

pub async fn run(config: &AppConfig, script_path: &Path, viewport_width: f64, pretty: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(script_path)
        .await
        .with_context(|| format!("cannot read {}", script_path.display()))?;
    let script = Script::from_json(&content)?;
    info!(steps = script.steps().len(), viewport_width, "simulating");

    let simulator = Simulator::new(config.capture.clone(), config.smooth_scroll.clone());
    for report in simulator.run(&script, viewport_width) {
        let line = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{}", line);
    }
    Ok(())
}
