use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::render::terminal::render_summary;
use crate::OutputFormat;

pub fn run(
    app: &App,
    library: &Path,
    output: Option<&Path>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let summary = app.export(library, output)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => println!("{}", render_summary(&summary, use_color)),
    }

    Ok(())
}
