//! Publish the rendered page. Each run fully replaces the previous file.

use anyhow::Context;
use std::{fs, path::Path};
use tracing::info;

use crate::report::Report;

pub fn write_report(path: impl AsRef<Path>, report: &Report) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    fs::write(path, report.html()).with_context(|| format!("write {}", path.display()))?;
    info!("Portfolio exported as HTML: {}", path.display());
    Ok(())
}
