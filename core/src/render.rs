use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::context::RenderContext;
use crate::template::{Template, TemplateError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("error writing output file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub async fn load_template(path: &Path) -> Result<Template, TemplateError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Template::parse(&name, &source)
}

/// Renders `template_path` with `ctx` into `output_path`, replacing its contents.
///
/// The template is parsed before the output is touched, so a broken template
/// leaves the previous output in place. The write itself is not atomic.
pub async fn render_to_file(
    template_path: &Path,
    output_path: &Path,
    ctx: &RenderContext,
) -> Result<usize, RenderError> {
    let template = load_template(template_path).await?;
    let rendered = template.execute(ctx);

    tokio::fs::write(output_path, rendered.as_bytes())
        .await
        .map_err(|source| RenderError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        template = template.name(),
        bytes = rendered.len(),
        "rendered {}",
        output_path.display()
    );
    Ok(rendered.len())
}
