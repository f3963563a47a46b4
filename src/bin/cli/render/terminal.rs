use endnote_exporter_lib::{ExportSummary, LibraryPreview};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render the result of an export run
pub fn render_summary(summary: &ExportSummary, use_color: bool) -> String {
    let mut lines = Vec::new();

    lines.push(paint(
        &format!("Successfully exported {} references.", summary.exported),
        Color::GREEN,
        use_color,
    ));
    if summary.skipped > 0 {
        lines.push(paint(
            &format!(
                "{} of {} references could not be converted and were skipped.",
                summary.skipped, summary.total
            ),
            Color::YELLOW,
            use_color,
        ));
    }

    let mut attachments = format!("PDF attachments linked: {}", summary.attachments_linked);
    if summary.attachments_missing > 0 {
        attachments.push_str(&format!(" ({} missing on disk)", summary.attachments_missing));
    }
    lines.push(attachments);

    lines.push(String::new());
    lines.push(format!(
        "File saved to: {}",
        paint(&summary.output_path.display().to_string(), Color::BOLD, use_color)
    ));

    lines.join("\n")
}

/// Render a library preview
pub fn render_preview(preview: &LibraryPreview, use_color: bool) -> String {
    let mut lines = Vec::new();

    let trash = if preview.include_trashed { ", trash included" } else { "" };
    lines.push(format!(
        "{} ({} references, {} attachments{})",
        paint(&preview.library_name, Color::BOLD, use_color),
        preview.reference_count,
        preview.attachment_count,
        trash
    ));

    for reference in &preview.references {
        let id = reference
            .id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "#?".to_string());
        let mut line = format!("  {} {}", paint(&id, Color::DIM, use_color), reference.title);
        if let Some(year) = reference.year.as_deref().filter(|y| !y.is_empty()) {
            line.push_str(&format!(" ({})", year));
        }
        if let Some(first) = reference.authors.first() {
            let more = if reference.authors.len() > 1 { " et al." } else { "" };
            line.push_str(&format!(" - {}{}", paint(first, Color::CYAN, use_color), more));
        }
        if reference.attachments > 0 {
            line.push_str(&format!(" [{} pdf]", reference.attachments));
        }
        lines.push(line);
    }

    if preview.reference_count > preview.references.len() {
        lines.push(format!(
            "  ... and {} more",
            preview.reference_count - preview.references.len()
        ));
    }

    for warning in &preview.warnings {
        lines.push(paint(&format!("warning: {}", warning), Color::YELLOW, use_color));
    }

    lines.push(String::new());
    lines.push(format!("Default output: {}", preview.suggested_output.display()));

    lines.join("\n")
}
