use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::render::terminal::render_preview;
use crate::OutputFormat;

pub fn run(app: &App, library: &Path, format: &OutputFormat, use_color: bool) -> Result<()> {
    let preview = app.preview(library)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preview)?),
        OutputFormat::Plain => println!("{}", render_preview(&preview, use_color)),
    }

    Ok(())
}
