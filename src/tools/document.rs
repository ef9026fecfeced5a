//! Word document tool
//!
//! Writes a minimal Office Open XML (.docx) package: a centred
//! "Draft Document" heading followed by the body text in 12pt.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::{CounselError, Result};

/// File name used when the caller gives none
pub const DEFAULT_FILE_NAME: &str = "draft.docx";

/// Heading placed at the top of every generated document
pub const DOCUMENT_TITLE: &str = "Draft Document";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
</w:styles>"#;

/// Writes generated documents under a fixed output directory
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    output_dir: PathBuf,
}

impl DocumentWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a document named `file_name` would be written to.
    ///
    /// Only the final path component of `file_name` is used.
    pub fn target_path(&self, file_name: Option<&str>) -> Option<PathBuf> {
        let name = Path::new(file_name.unwrap_or(DEFAULT_FILE_NAME)).file_name()?;
        Some(self.output_dir.join(name))
    }

    /// Create a Word document with the given content.
    ///
    /// Returns the written path, or `None` (after logging) if anything fails.
    pub fn create_word_doc(&self, content: &str, file_name: Option<&str>) -> Option<PathBuf> {
        let Some(path) = self.target_path(file_name) else {
            tracing::warn!(?file_name, "Error creating Word document: invalid file name");
            return None;
        };

        match write_docx(&path, content) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "created Word document");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Error creating Word document: {}", e);
                None
            }
        }
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn heading_paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml_text(text)
    )
}

/// 12pt left-aligned body paragraph; `w:sz` is measured in half-points
fn body_paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:rPr><w:sz w:val="24"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml_text(text)
    )
}

/// Build `word/document.xml` for the given body text
pub fn document_xml(content: &str) -> String {
    let mut body = heading_paragraph(DOCUMENT_TITLE);
    for line in content.lines() {
        body.push_str(&body_paragraph(line));
    }
    if content.is_empty() {
        body.push_str(&body_paragraph(""));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        body
    )
}

fn write_docx(path: &Path, content: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let document = document_xml(content);
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/styles.xml", STYLES_XML),
        ("word/document.xml", &document),
    ];

    for (name, xml) in parts {
        zip.start_file(name, options)
            .map_err(|e| CounselError::tool(format!("failed to add {}: {}", name, e)))?;
        zip.write_all(xml.as_bytes())?;
    }

    zip.finish()
        .map_err(|e| CounselError::tool(format!("failed to finish archive: {}", e)))?;
    Ok(())
}
