//! Serialization of Zotero records into EndNote-style XML

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::record::ZoteroRecord;
use crate::error::{ExportError, Result};

pub struct ZoteroXmlWriter {
    indent: usize,
}

impl Default for ZoteroXmlWriter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Characters XML 1.0 allows in text content
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Drop control characters that would make the document ill-formed
fn xml_safe<'a>(tag: &str, text: &'a str) -> Cow<'a, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    log::warn!(
        "Removed {} invalid XML characters from <{}>",
        text.chars().count() - cleaned.chars().count(),
        tag
    );
    Cow::Owned(cleaned)
}

/// Thin wrapper so the record layout reads top to bottom
struct XmlOut {
    inner: Writer<Vec<u8>>,
}

impl XmlOut {
    fn start(&mut self, tag: &str) -> Result<()> {
        self.inner.write_event(Event::Start(BytesStart::new(tag)))?;
        Ok(())
    }

    fn start_with(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(tag);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// `<tag>text</tag>`, or `<tag/>` when there is no text
    fn text_element(&mut self, tag: &str, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) if !text.is_empty() => {
                let text = xml_safe(tag, text);
                self.start(tag)?;
                self.inner.write_event(Event::Text(BytesText::new(&text)))?;
                self.end(tag)
            }
            _ => {
                self.inner.write_event(Event::Empty(BytesStart::new(tag)))?;
                Ok(())
            }
        }
    }

    /// Written only when the value is present
    fn optional_element(&mut self, tag: &str, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) if !text.is_empty() => self.text_element(tag, Some(text)),
            _ => Ok(()),
        }
    }

    /// `<outer><inner>..</inner>..</outer>`, skipped when `items` is empty
    fn list_element<S: AsRef<str>>(&mut self, outer: &str, inner: &str, items: &[S]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.start(outer)?;
        for item in items {
            self.text_element(inner, Some(item.as_ref()))?;
        }
        self.end(outer)
    }
}

impl ZoteroXmlWriter {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Serialize all records into a complete XML document
    pub fn write_records(&self, records: &[ZoteroRecord]) -> Result<Vec<u8>> {
        let inner = if self.indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', self.indent)
        };
        let mut out = XmlOut { inner };

        out.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        out.start("xml")?;
        out.start("records")?;
        for record in records {
            write_record(&mut out, record)?;
        }
        out.end("records")?;
        out.end("xml")?;

        let mut bytes = out.inner.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serialize and write to `path`, replacing any existing file
    pub fn write_to_file(&self, records: &[ZoteroRecord], path: &Path) -> Result<()> {
        let bytes = self.write_records(records)?;
        fs::write(path, bytes).map_err(|source| ExportError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote {} records to {:?}", records.len(), path);
        Ok(())
    }
}

fn write_record(out: &mut XmlOut, record: &ZoteroRecord) -> Result<()> {
    out.start("record")?;

    out.text_element("rec-number", Some(&record.rec_number.to_string()))?;
    out.start_with("ref-type", &[("name", record.ref_type_name.as_str())])?;
    out.inner
        .write_event(Event::Text(BytesText::new(&record.ref_type.to_string())))?;
    out.end("ref-type")?;

    out.start("dates")?;
    out.text_element("year", record.year.as_deref())?;
    if let Some(date) = record.pub_date.as_deref() {
        out.start("pub-dates")?;
        out.text_element("date", Some(date))?;
        out.end("pub-dates")?;
    }
    out.end("dates")?;

    out.start("titles")?;
    out.text_element("title", record.title.as_deref())?;
    out.text_element("secondary-title", record.secondary_title.as_deref())?;
    out.optional_element("tertiary-title", record.tertiary_title.as_deref())?;
    out.optional_element("alt-title", record.alt_title.as_deref())?;
    out.optional_element("short-title", record.short_title.as_deref())?;
    out.end("titles")?;

    if !record.authors.is_empty() {
        out.start("contributors")?;
        out.list_element("authors", "author", &record.authors)?;
        out.end("contributors")?;
    }

    out.text_element("pages", record.pages.as_deref())?;
    out.text_element("volume", record.volume.as_deref())?;
    out.text_element("number", record.number.as_deref())?;
    out.text_element("abstract", record.abstract_text.as_deref())?;
    out.text_element("isbn", record.isbn.as_deref())?;

    out.list_element("keywords", "keyword", &record.keywords)?;
    out.optional_element("publisher", record.publisher.as_deref())?;
    out.optional_element("pub-location", record.pub_location.as_deref())?;
    out.optional_element("edition", record.edition.as_deref())?;
    out.optional_element("electronic-resource-num", record.electronic_resource_num.as_deref())?;
    out.optional_element("language", record.language.as_deref())?;

    if record.has_urls() {
        out.start("urls")?;
        out.list_element("web-urls", "url", &record.web_urls)?;
        let pdf_urls: Vec<String> = record
            .pdf_urls
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        out.list_element("pdf-urls", "url", &pdf_urls)?;
        out.end("urls")?;
    }

    out.text_element("notes", Some(&record.notes))?;

    out.end("record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use std::path::PathBuf;

    /// Collect `(element path, text)` pairs from a document
    fn text_nodes(xml: &[u8]) -> Vec<(String, String)> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        let mut nodes = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) => {
                    stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(e) => {
                    nodes.push((stack.join("/"), e.unescape().unwrap().to_string()));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        nodes
    }

    fn sample() -> ZoteroRecord {
        ZoteroRecord {
            rec_number: 3,
            ref_type: 0,
            ref_type_name: "Journal Article".to_string(),
            year: Some("2021".to_string()),
            title: Some("Salts & <Acids>".to_string()),
            authors: vec!["Doe, J.".to_string(), "Roe, R.".to_string()],
            web_urls: vec!["https://example.org/a?b=1&c=2".to_string()],
            pdf_urls: vec![PathBuf::from("/library/PDF/1/paper.pdf")],
            notes: "Created: 2021-01-01T00:00:00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_document_structure() {
        let xml = ZoteroXmlWriter::default().write_records(&[sample()]).unwrap();
        let text = String::from_utf8(xml.clone()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<ref-type name=\"Journal Article\">0</ref-type>"));
        assert!(text.contains("<pages/>"));
        assert!(text.contains("<secondary-title/>"));

        let nodes = text_nodes(&xml);
        let base = "xml/records/record";
        assert!(nodes.contains(&(format!("{base}/rec-number"), "3".to_string())));
        assert!(nodes.contains(&(format!("{base}/dates/year"), "2021".to_string())));
        assert!(nodes.contains(&(format!("{base}/titles/title"), "Salts & <Acids>".to_string())));
        assert!(nodes.contains(&(
            format!("{base}/contributors/authors/author"),
            "Roe, R.".to_string()
        )));
        assert!(nodes.contains(&(
            format!("{base}/urls/web-urls/url"),
            "https://example.org/a?b=1&c=2".to_string()
        )));
        assert!(nodes.contains(&(
            format!("{base}/urls/pdf-urls/url"),
            "/library/PDF/1/paper.pdf".to_string()
        )));
        assert!(nodes.contains(&(
            format!("{base}/notes"),
            "Created: 2021-01-01T00:00:00".to_string()
        )));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = ZoteroXmlWriter::default().write_records(&[sample()]).unwrap();
        let text = String::from_utf8(xml).unwrap();
        assert!(text.contains("Salts &amp; &lt;Acids&gt;"));
        assert!(!text.contains("<Acids>"));
    }

    #[test]
    fn test_control_characters_are_stripped() {
        let mut record = sample();
        record.title = Some("Bad\u{0B}title\u{01}".to_string());
        record.notes = "line one\r\nline\ttwo\u{FFFF}".to_string();

        let xml = ZoteroXmlWriter::default().write_records(&[record]).unwrap();
        let text = String::from_utf8(xml.clone()).unwrap();
        assert!(!text.chars().any(|c| !is_xml_char(c)));
        assert!(text.contains("<title>Badtitle</title>"));

        let nodes = text_nodes(&xml);
        assert!(nodes.contains(&(
            "xml/records/record/titles/title".to_string(),
            "Badtitle".to_string()
        )));
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let record = ZoteroRecord {
            rec_number: 1,
            ref_type_name: "Journal Article".to_string(),
            ..Default::default()
        };
        let text = String::from_utf8(ZoteroXmlWriter::default().write_records(&[record]).unwrap()).unwrap();
        assert!(!text.contains("<contributors>"));
        assert!(!text.contains("<urls>"));
        assert!(!text.contains("<keywords>"));
        assert!(!text.contains("<publisher"));
        assert!(text.contains("<notes/>"));
        assert!(text.contains("<year/>"));
    }

    #[test]
    fn test_element_order() {
        let mut record = sample();
        record.keywords = vec!["kw".to_string()];
        let text = String::from_utf8(ZoteroXmlWriter::default().write_records(&[record]).unwrap()).unwrap();

        let order = [
            "<rec-number>",
            "<ref-type",
            "<dates>",
            "<titles>",
            "<contributors>",
            "<pages/>",
            "<volume/>",
            "<number/>",
            "<abstract/>",
            "<isbn/>",
            "<keywords>",
            "<urls>",
            "<notes>",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| text.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_empty_library_is_well_formed() {
        let xml = ZoteroXmlWriter::new(0).write_records(&[]).unwrap();
        let text = String::from_utf8(xml).unwrap();
        assert!(text.contains("<xml><records></records></xml>"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.xml");
        let err = ZoteroXmlWriter::default().write_to_file(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::WriteFailed { .. }));
    }
}
