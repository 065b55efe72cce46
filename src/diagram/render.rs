use std::path::Path;
use tokio::process::Command;
use tracing::info;

use crate::config::RenderOptions;
use crate::error::{Result, XrayError};

/// Rasterize a DOT file to PNG with Graphviz.
///
/// A missing executable or a failed run is a `Render` error; callers treat it
/// as a warning because the DOT file already exists.
pub async fn render_png(dot_path: &Path, png_path: &Path, options: &RenderOptions) -> Result<()> {
    let output = Command::new(&options.command)
        .arg("-Tpng")
        .arg(format!("-Gdpi={}", options.dpi))
        .arg(dot_path)
        .arg("-o")
        .arg(png_path)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XrayError::Render(format!(
                    "Graphviz '{}' not found. Install Graphviz (e.g. `apt install graphviz`) to get a PNG diagram",
                    options.command
                ))
            } else {
                XrayError::Render(format!("failed to run '{}': {}", options.command, e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(XrayError::Render(format!(
            "'{}' exited with {}: {}",
            options.command,
            output.status,
            stderr.trim()
        )));
    }

    info!(path = %png_path.display(), "PNG diagram rendered");
    Ok(())
}
