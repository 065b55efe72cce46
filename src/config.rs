use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SAMPLE_LIMIT: usize = 10;
pub const DEFAULT_MD_REPORT: &str = "audit_report.md";
pub const DEFAULT_DOT_FILE: &str = "graph_diagram.dot";
pub const DEFAULT_PNG_FILE: &str = "graph_diagram.png";

/// Run-wide settings handed to the extractor and the output stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Maximum number of rows sampled per label or relationship type
    pub sample_limit: usize,
    /// Procedure namespaces listed in the report; empty keeps every procedure
    pub procedure_prefixes: Vec<String>,
    pub render: RenderOptions,
    pub diagram: DiagramOptions,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            procedure_prefixes: vec!["apoc".to_string(), "algo".to_string(), "gds".to_string()],
            render: RenderOptions::default(),
            diagram: DiagramOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Graphviz executable
    pub command: String,
    pub dpi: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            command: "dot".to_string(),
            dpi: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// Append `(prop: Type, ...)` to edge labels
    pub edge_properties: bool,
    pub rankdir: String,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            edge_properties: true,
            rankdir: "LR".to_string(),
        }
    }
}

impl AuditConfig {
    pub fn load_from_path(config_path: Option<&str>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        let config: AuditConfig = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse config file '{}': {}",
                path_ref.display(),
                e
            )
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_limit == 0 {
            return Err(anyhow::anyhow!("Sample limit must be greater than 0"));
        }

        if self.render.command.trim().is_empty() {
            return Err(anyhow::anyhow!("Render command cannot be empty"));
        }

        if self.render.dpi == 0 {
            return Err(anyhow::anyhow!("Render DPI must be greater than 0"));
        }

        if !matches!(self.diagram.rankdir.as_str(), "LR" | "RL" | "TB" | "BT") {
            return Err(anyhow::anyhow!(
                "Diagram rankdir must be one of LR, RL, TB, BT (got '{}')",
                self.diagram.rankdir
            ));
        }

        Ok(())
    }
}
