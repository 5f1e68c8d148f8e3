use super::{ArchiveWriter, slug};
use crate::error::ArchiveError;
use crate::ui::EditorFlow;
use chrono::{SecondsFormat, Utc};
use tracing::info;

/// File name of the plain export: `<rule-name>-drools-package.zip`.
pub fn default_bundle_name(rule_name: &str) -> String {
    format!("{}-drools-package.zip", slug(rule_name))
}

/// Packs DRL text with a usage README and a JSON snapshot of the editor flow.
pub fn export_bundle(dsl: &str, flow: &EditorFlow) -> Result<Vec<u8>, ArchiveError> {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut snapshot = flow.clone();
    if snapshot.metadata.name.trim().is_empty() {
        snapshot.metadata.name = flow.rule_name().to_string();
    }
    if snapshot.metadata.created_at.is_none() {
        snapshot.metadata.created_at = Some(generated_at.clone());
    }

    let mut archive = ArchiveWriter::new();
    archive.add("rules.drl", dsl)?;
    archive.add("README.md", &readme(flow, &generated_at))?;
    archive.add("config.json", &serde_json::to_string_pretty(&snapshot)?)?;

    let bytes = archive.finish()?;
    info!(rule = flow.rule_name(), bytes = bytes.len(), "Exported rule bundle");
    Ok(bytes)
}

fn readme(flow: &EditorFlow, generated_at: &str) -> String {
    format!(
        r#"# {name}

## Usage

1. Copy `rules.drl` into the resources directory of your Drools project.
2. Load the rules:
   ```java
   KieServices kieServices = KieServices.Factory.get();
   KieContainer kieContainer = kieServices.getKieClasspathContainer();
   KieSession kieSession = kieContainer.newKieSession();
   ```
3. Insert facts and fire the rules:
   ```java
   kieSession.insert(fact);
   kieSession.fireAllRules();
   ```

## Rule information

- Generated at: {generated_at}
- Nodes: {nodes}
- Connections: {connections}
"#,
        name = flow.rule_name(),
        generated_at = generated_at,
        nodes = flow.nodes.len(),
        connections = flow.connections.len(),
    )
}
