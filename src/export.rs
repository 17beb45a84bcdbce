// src/export.rs
//! Writing rendered resumes and cover letters to disk.
//!
//! Resumes are written as print-ready HTML. When a PDF command is configured
//! it is run as `<cmd> [args..] <input.html> <output.pdf>`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::render::render;
use crate::template_system::TemplateDescriptor;
use crate::types::ResumeDocument;
use crate::utils::{ensure_dir_exists, sanitize_file_component, write_file_safe};

const BLANK_NAME: &str = "Your_Name";

fn file_name_base(full_name: &str) -> String {
    let name = sanitize_file_component(full_name);
    if name.is_empty() {
        BLANK_NAME.to_string()
    } else {
        name
    }
}

/// `<full name>_Resume`, without extension
pub fn resume_file_stem(full_name: &str) -> String {
    format!("{}_Resume", file_name_base(full_name))
}

pub fn cover_letter_filename(full_name: &str) -> String {
    format!("{}_Cover_Letter.txt", file_name_base(full_name))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedResume {
    pub html: PathBuf,
    pub pdf: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    pdf_command: Option<String>,
}

impl Exporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            pdf_command: None,
        }
    }

    pub fn with_pdf_command(mut self, command: Option<String>) -> Self {
        self.pdf_command = command.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export_resume(
        &self,
        document: &ResumeDocument,
        template: &TemplateDescriptor,
    ) -> Result<ExportedResume> {
        ensure_dir_exists(&self.output_dir)?;

        let stem = resume_file_stem(&document.personal_info.full_name);
        let html_path = self.output_dir.join(format!("{}.html", stem));
        write_file_safe(&html_path, &render(document, template).to_html())?;
        info!("Resume written to {}", html_path.display());

        let pdf = match &self.pdf_command {
            Some(command) => {
                let pdf_path = self.output_dir.join(format!("{}.pdf", stem));
                convert_to_pdf(command, &html_path, &pdf_path)?;
                info!("PDF written to {}", pdf_path.display());
                Some(pdf_path)
            }
            None => None,
        };

        Ok(ExportedResume {
            html: html_path,
            pdf,
        })
    }

    pub fn export_cover_letter(&self, full_name: &str, letter: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(cover_letter_filename(full_name));
        write_file_safe(&path, letter)?;
        info!("Cover letter written to {}", path.display());
        Ok(path)
    }
}

fn convert_to_pdf(command: &str, input: &Path, output: &Path) -> Result<()> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("PDF command is empty"))?;

    let mut cmd = Command::new(program);
    cmd.args(parts).arg(input).arg(output);

    let result = cmd
        .output()
        .with_context(|| format!("Failed to execute PDF command: {}", program))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let stdout = String::from_utf8_lossy(&result.stdout);
        anyhow::bail!(
            "PDF conversion failed: stderr={}, stdout={}",
            stderr,
            stdout
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_system::TemplateCatalog;
    use tempfile::TempDir;

    fn document(name: &str) -> ResumeDocument {
        let mut doc = ResumeDocument::new();
        doc.personal_info.full_name = name.to_string();
        doc
    }

    #[test]
    fn test_file_names() {
        assert_eq!(resume_file_stem("Ada Lovelace"), "Ada Lovelace_Resume");
        assert_eq!(resume_file_stem("   "), "Your_Name_Resume");
        assert_eq!(cover_letter_filename("A/B"), "A_B_Cover_Letter.txt");
        assert_eq!(cover_letter_filename(""), "Your_Name_Cover_Letter.txt");
    }

    #[test]
    fn test_export_resume_writes_html() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let exporter = Exporter::new(dir.path().join("out"));

        let exported = exporter
            .export_resume(&document("Ada"), catalog.get_by_id("minimal-slate").unwrap())
            .unwrap();

        assert_eq!(exported.html, dir.path().join("out").join("Ada_Resume.html"));
        assert_eq!(exported.pdf, None);
        let html = std::fs::read_to_string(&exported.html).unwrap();
        assert!(html.contains("<title>Ada - Resume</title>"));
    }

    #[test]
    fn test_export_cover_letter() {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path().to_path_buf());

        let path = exporter.export_cover_letter("Ada", "Dear Hiring Manager,").unwrap();
        assert!(path.ends_with("Ada_Cover_Letter.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Dear Hiring Manager,");
    }

    #[cfg(unix)]
    #[test]
    fn test_pdf_command_receives_input_and_output() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let exporter =
            Exporter::new(dir.path().to_path_buf()).with_pdf_command(Some("cp".to_string()));

        let exported = exporter
            .export_resume(&document("Ada"), catalog.get_by_id("tech-cyan").unwrap())
            .unwrap();

        let pdf = exported.pdf.unwrap();
        assert!(pdf.ends_with("Ada_Resume.pdf"));
        assert_eq!(
            std::fs::read(&pdf).unwrap(),
            std::fs::read(&exported.html).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_pdf_command_is_reported() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let exporter =
            Exporter::new(dir.path().to_path_buf()).with_pdf_command(Some("false".to_string()));

        let err = exporter
            .export_resume(&document("Ada"), catalog.get_by_id("tech-cyan").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("PDF conversion failed"));
    }

    #[test]
    fn test_blank_pdf_command_is_ignored() {
        let exporter = Exporter::new(PathBuf::from("out")).with_pdf_command(Some("  ".to_string()));
        assert!(exporter.pdf_command.is_none());
    }
}
