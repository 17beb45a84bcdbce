// src/template_system.rs
//! Template catalog: the built-in visual templates plus any custom ones discovered on disk

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Template the builder starts with
pub const DEFAULT_TEMPLATE_ID: &str = "executive-navy";

const PREVIEW_IMAGE: &str = "https://images.pexels.com/photos/590016/pexels-photo-590016.jpeg?auto=compress&cs=tinysrgb&w=300&h=400&fit=crop";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Unknown template category: {0}")]
    UnknownCategory(String),
    #[error("Unknown layout kind: {0}")]
    UnknownLayout(String),
    #[error("Invalid color token '{0}', expected #rrggbb")]
    InvalidColor(String),
}

// ===== Color tokens =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

impl FromStr for Color {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| TemplateError::InvalidColor(s.to_string()))?;

        let value =
            u32::from_str_radix(hex, 16).map_err(|_| TemplateError::InvalidColor(s.to_string()))?;
        Ok(Self::from_hex(value))
    }
}

impl TryFrom<String> for Color {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub background: Color,
    pub light: Color,
}

impl Palette {
    const fn from_hex(values: [u32; 6]) -> Self {
        Self {
            primary: Color::from_hex(values[0]),
            secondary: Color::from_hex(values[1]),
            accent: Color::from_hex(values[2]),
            text: Color::from_hex(values[3]),
            background: Color::from_hex(values[4]),
            light: Color::from_hex(values[5]),
        }
    }

    /// CSS background for hero headers
    pub fn gradient(&self) -> String {
        format!("linear-gradient(135deg, {}, {})", self.primary, self.accent)
    }
}

// ===== Category and layout =====

/// Marketing classification shown as filter tabs. Independent of [`LayoutKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Modern,
    Creative,
    Professional,
    Minimal,
    Executive,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Executive,
        Category::Professional,
        Category::Modern,
        Category::Creative,
        Category::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Creative => "creative",
            Self::Professional => "professional",
            Self::Minimal => "minimal",
            Self::Executive => "executive",
        }
    }
}

impl FromStr for Category {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "creative" => Ok(Self::Creative),
            "professional" => Ok(Self::Professional),
            "minimal" => Ok(Self::Minimal),
            "executive" => Ok(Self::Executive),
            other => Err(TemplateError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector input: `all` is a sentinel, never a stored category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Visual arrangement the renderer dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Traditional,
    Sidebar,
    Modern,
    Creative,
    Executive,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::Sidebar => "sidebar",
            Self::Modern => "modern",
            Self::Creative => "creative",
            Self::Executive => "executive",
        }
    }
}

impl FromStr for LayoutKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "traditional" => Ok(Self::Traditional),
            "sidebar" => Ok(Self::Sidebar),
            "modern" => Ok(Self::Modern),
            "creative" => Ok(Self::Creative),
            "executive" => Ok(Self::Executive),
            other => Err(TemplateError::UnknownLayout(other.to_string())),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Descriptors =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub layout: LayoutKind,
    pub colors: Palette,
    pub preview: String,
}

/// `manifest.toml` of a custom template directory. The directory name is the id.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    pub layout: LayoutKind,
    pub colors: Palette,
    #[serde(default)]
    pub preview: Option<String>,
}

impl TemplateManifest {
    fn into_descriptor(self, id: String) -> TemplateDescriptor {
        TemplateDescriptor {
            description: self
                .description
                .unwrap_or_else(|| format!("{} resume template", self.name)),
            id,
            name: self.name,
            category: self.category,
            layout: self.layout,
            colors: self.colors,
            preview: self.preview.unwrap_or_else(|| PREVIEW_IMAGE.to_string()),
        }
    }
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    category: Category,
    layout: LayoutKind,
    colors: [u32; 6],
) -> TemplateDescriptor {
    TemplateDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        layout,
        colors: Palette::from_hex(colors),
        preview: PREVIEW_IMAGE.to_string(),
    }
}

/// The shipped templates, in display order
pub fn builtin_templates() -> Vec<TemplateDescriptor> {
    use Category as C;
    use LayoutKind as L;

    vec![
        builtin(
            "executive-navy",
            "Executive Navy",
            "Premium executive template with navy blue sophistication",
            C::Executive,
            L::Executive,
            [0x1e3a8a, 0x1e40af, 0x3b82f6, 0x1f2937, 0xffffff, 0xeff6ff],
        ),
        builtin(
            "modern-gradient",
            "Modern Gradient",
            "Contemporary design with beautiful gradient accents",
            C::Modern,
            L::Modern,
            [0x6366f1, 0x4f46e5, 0x8b5cf6, 0x111827, 0xffffff, 0xf8fafc],
        ),
        builtin(
            "creative-coral",
            "Creative Coral",
            "Bold and artistic with vibrant coral and orange design",
            C::Creative,
            L::Creative,
            [0xf97316, 0xea580c, 0xfb923c, 0x1f2937, 0xffffff, 0xfff7ed],
        ),
        builtin(
            "professional-emerald",
            "Professional Emerald",
            "Sophisticated emerald design for corporate professionals",
            C::Professional,
            L::Sidebar,
            [0x059669, 0x047857, 0x10b981, 0x111827, 0xffffff, 0xecfdf5],
        ),
        builtin(
            "minimal-slate",
            "Minimal Slate",
            "Clean and minimal with elegant gray typography",
            C::Minimal,
            L::Traditional,
            [0x475569, 0x334155, 0x64748b, 0x1f2937, 0xffffff, 0xf8fafc],
        ),
        builtin(
            "tech-cyan",
            "Tech Cyan",
            "Perfect for tech professionals with modern cyan styling",
            C::Modern,
            L::Modern,
            [0x0891b2, 0x0e7490, 0x06b6d4, 0x1f2937, 0xffffff, 0xecfeff],
        ),
        builtin(
            "creative-purple",
            "Creative Purple",
            "Artistic and bold with stunning purple gradients",
            C::Creative,
            L::Creative,
            [0x7c3aed, 0x6d28d9, 0x8b5cf6, 0x1f2937, 0xffffff, 0xfaf5ff],
        ),
        builtin(
            "executive-burgundy",
            "Executive Burgundy",
            "Luxurious burgundy design for senior executives",
            C::Executive,
            L::Executive,
            [0x991b1b, 0x7f1d1d, 0xdc2626, 0x1f2937, 0xffffff, 0xfef2f2],
        ),
        builtin(
            "modern-teal",
            "Modern Teal",
            "Fresh and contemporary with teal accents",
            C::Modern,
            L::Sidebar,
            [0x0d9488, 0x0f766e, 0x14b8a6, 0x1f2937, 0xffffff, 0xf0fdfa],
        ),
        builtin(
            "creative-amber",
            "Creative Amber",
            "Energetic and vibrant with warm amber tones",
            C::Creative,
            L::Creative,
            [0xd97706, 0xb45309, 0xf59e0b, 0x1f2937, 0xffffff, 0xfffbeb],
        ),
        builtin(
            "professional-rose",
            "Professional Rose",
            "Elegant rose gold design for modern professionals",
            C::Professional,
            L::Modern,
            [0xe11d48, 0xbe185d, 0xf43f5e, 0x1f2937, 0xffffff, 0xfff1f2],
        ),
        builtin(
            "minimal-charcoal",
            "Minimal Charcoal",
            "Sophisticated charcoal design with clean typography",
            C::Minimal,
            L::Traditional,
            [0x374151, 0x1f2937, 0x6b7280, 0x111827, 0xffffff, 0xf9fafb],
        ),
    ]
}

// ===== Catalog =====

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDescriptor>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Built-ins followed by every `<dir>/<id>/manifest.toml`, sorted by id
    pub fn with_custom_dir(templates_dir: &Path) -> Result<Self> {
        let mut catalog = Self::builtin();

        if !templates_dir.exists() {
            info!(
                "No custom templates directory at {}, using built-in templates",
                templates_dir.display()
            );
            return Ok(catalog);
        }

        let entries = fs::read_dir(templates_dir).with_context(|| {
            format!(
                "Failed to read templates directory: {}",
                templates_dir.display()
            )
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_dir() && path.join("manifest.toml").exists() {
                dirs.push(path);
            }
        }
        dirs.sort();

        for dir in dirs {
            let Some(id) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                warn!("Skipping template directory with invalid name: {}", dir.display());
                continue;
            };

            if catalog.get_by_id(&id).is_ok() {
                warn!("Custom template '{}' collides with an existing template, skipped", id);
                continue;
            }

            match Self::load_manifest(&dir) {
                Ok(manifest) => {
                    info!("Discovered template: {} at {}", id, dir.display());
                    catalog.templates.push(manifest.into_descriptor(id));
                }
                Err(e) => warn!("Failed to load template from {}: {:#}", dir.display(), e),
            }
        }

        info!("Loaded {} templates", catalog.templates.len());
        Ok(catalog)
    }

    fn load_manifest(dir: &Path) -> Result<TemplateManifest> {
        let manifest_path = dir.join("manifest.toml");
        let content = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))
    }

    pub fn list_templates(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    pub fn get_by_id(&self, id: &str) -> Result<&TemplateDescriptor, TemplateError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn filter_by_category(&self, filter: CategoryFilter) -> Vec<&TemplateDescriptor> {
        self.templates
            .iter()
            .filter(|t| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => t.category == category,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_starts_with_default() {
        let catalog = TemplateCatalog::builtin();
        let templates = catalog.list_templates();

        assert_eq!(templates.len(), 12);
        assert_eq!(templates[0].id, DEFAULT_TEMPLATE_ID);
        assert_eq!(templates[11].id, "minimal-charcoal");
    }

    #[test]
    fn test_get_by_id() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get_by_id("professional-emerald").unwrap();

        assert_eq!(template.layout, LayoutKind::Sidebar);
        assert_eq!(template.colors.primary.to_string(), "#059669");
        assert_eq!(
            catalog.get_by_id("nope"),
            Err(TemplateError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_category_and_layout_are_independent() {
        let catalog = TemplateCatalog::builtin();
        let modern = catalog.filter_by_category(CategoryFilter::Only(Category::Modern));

        let ids: Vec<_> = modern.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["modern-gradient", "tech-cyan", "modern-teal"]);
        assert!(modern.iter().any(|t| t.layout == LayoutKind::Sidebar));
        assert!(modern.iter().any(|t| t.layout == LayoutKind::Modern));
    }

    #[test]
    fn test_all_filter_is_a_sentinel() {
        let catalog = TemplateCatalog::builtin();

        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(catalog.filter_by_category(CategoryFilter::All).len(), 12);
        assert!("everything".parse::<CategoryFilter>().is_err());
        assert!(serde_json::from_str::<Category>("\"all\"").is_err());
    }

    #[test]
    fn test_color_parsing() {
        let color: Color = "#1E3A8A".parse().unwrap();
        assert_eq!(color, Color::from_hex(0x1e3a8a));
        assert_eq!(color.to_string(), "#1e3a8a");

        assert!("1e3a8a".parse::<Color>().is_err());
        assert!("#1e3a8".parse::<Color>().is_err());
        assert!("#zz3a8a".parse::<Color>().is_err());
    }

    #[test]
    fn test_descriptor_json_uses_hex_and_lowercase_names() {
        let catalog = TemplateCatalog::builtin();
        let json = serde_json::to_value(catalog.get_by_id("tech-cyan").unwrap()).unwrap();

        assert_eq!(json["category"], "modern");
        assert_eq!(json["layout"], "modern");
        assert_eq!(json["colors"]["accent"], "#06b6d4");
    }

    #[test]
    fn test_custom_templates_are_discovered_after_builtins() {
        let dir = tempfile::tempdir().unwrap();

        let ocean = dir.path().join("ocean");
        fs::create_dir(&ocean).unwrap();
        fs::write(
            ocean.join("manifest.toml"),
            r##"
name = "Ocean"
category = "minimal"
layout = "sidebar"

[colors]
primary = "#0369a1"
secondary = "#075985"
accent = "#0ea5e9"
text = "#0f172a"
background = "#ffffff"
light = "#f0f9ff"
"##,
        )
        .unwrap();

        let broken = dir.path().join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join("manifest.toml"), "name = 42").unwrap();

        let clash = dir.path().join("tech-cyan");
        fs::create_dir(&clash).unwrap();
        fs::write(clash.join("manifest.toml"), "").unwrap();

        let catalog = TemplateCatalog::with_custom_dir(dir.path()).unwrap();
        let templates = catalog.list_templates();

        assert_eq!(templates.len(), 13);
        let ocean = &templates[12];
        assert_eq!(ocean.id, "ocean");
        assert_eq!(ocean.layout, LayoutKind::Sidebar);
        assert_eq!(ocean.description, "Ocean resume template");
    }

    #[test]
    fn test_missing_custom_dir_yields_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_custom_dir(&dir.path().join("absent")).unwrap();
        assert_eq!(catalog.list_templates().len(), 12);
    }
}
