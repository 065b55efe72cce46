use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::AuditArgs;
use crate::config::AuditConfig;
use crate::diagram::{render_png, to_dot, write_dot};
use crate::models::SchemaSummary;
use crate::neo4j::{ConnectionSettings, MetadataExtractor, Neo4jConnection};
use crate::report::{render_markdown, write_report, ReportContext};

/// Output locations for one run.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub md: PathBuf,
    pub dot: PathBuf,
    pub png: PathBuf,
}

impl From<&AuditArgs> for ArtifactPaths {
    fn from(args: &AuditArgs) -> Self {
        Self {
            md: PathBuf::from(&args.md),
            dot: PathBuf::from(&args.dot),
            png: PathBuf::from(&args.png),
        }
    }
}

pub async fn handle_audit(args: AuditArgs, config: AuditConfig) -> Result<()> {
    let settings = ConnectionSettings::resolve(
        &args.uri,
        args.user.as_deref(),
        args.password.as_deref(),
        args.database.as_deref(),
    )?;

    let summary = {
        let connection = Neo4jConnection::connect(&settings).await?;
        MetadataExtractor::new(&connection, &config).extract().await?
    };

    let paths = ArtifactPaths::from(&args);
    produce_artifacts(&summary, &paths, &config, !args.no_png).await?;

    println!("Report is available at: {}", paths.md.display());
    Ok(())
}

/// Writes the DOT file, optionally renders it, then writes the report.
///
/// A failed render only drops the PNG reference from the report.
pub async fn produce_artifacts(
    summary: &SchemaSummary,
    paths: &ArtifactPaths,
    config: &AuditConfig,
    render: bool,
) -> Result<()> {
    info!(path = %paths.dot.display(), "Writing DOT diagram");
    write_dot(&to_dot(summary, &config.diagram), &paths.dot)?;

    let png_path = if render {
        rendered_png(&paths.dot, &paths.png, config).await?
    } else {
        None
    };

    let context = ReportContext {
        generated_at: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        dot_path: Some(paths.dot.display().to_string()),
        png_path,
    };

    info!(path = %paths.md.display(), "Writing Markdown report");
    write_report(&render_markdown(summary, &context), &paths.md)?;
    Ok(())
}

async fn rendered_png(dot: &Path, png: &Path, config: &AuditConfig) -> Result<Option<String>> {
    match render_png(dot, png, &config.render).await {
        Ok(()) => Ok(Some(png.display().to_string())),
        Err(e) if !e.is_fatal() => {
            warn!("{}; continuing without PNG", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
