// src/render/mod.rs
//! Resume renderer: combines a document with a template descriptor into a page layout.
//!
//! The page is built as plain data first ([`Page`], [`Section`]) and only then
//! emitted as print-ready HTML by [`html`]. Sections whose backing data is empty
//! are never built, so every layout omits them the same way.

pub mod html;

use chrono::NaiveDate;

use crate::template_system::{LayoutKind, TemplateCatalog, TemplateDescriptor};
use crate::types::{Education, Experience, PersonalInfo, ResumeDocument, Skill, SkillLevel};

pub const BULLET: char = '•';
const PRESENT: &str = "Present";

// ===== Page model =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Full name or the placeholder
    pub name: String,
    pub photo: Option<String>,
    /// Email, phone and location, only those that are filled in
    pub contact: Vec<String>,
    pub links: Vec<Link>,
}

impl Header {
    fn from_personal_info(info: &PersonalInfo) -> Self {
        let contact = [&info.email, &info.phone, &info.location]
            .into_iter()
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();

        let mut links = Vec::new();
        if !info.linkedin.is_empty() {
            links.push(Link {
                label: "LinkedIn",
                href: info.linkedin.clone(),
            });
        }
        if !info.website.is_empty() {
            links.push(Link {
                label: "Portfolio",
                href: info.website.clone(),
            });
        }

        Self {
            name: info.display_name().to_string(),
            photo: info.photo().map(str::to_string),
            contact,
            links,
        }
    }

    pub fn contact_line(&self) -> String {
        self.contact.join(&format!(" {} ", BULLET))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceStyle {
    /// Accent rail, company and dates on one line
    Timeline,
    /// Title with right-aligned date range
    Dated,
    /// Index badges 1..N
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationStyle {
    Cards,
    Compact,
    Dated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStyle {
    /// Name plus level badge
    Badges,
    /// Level mapped to bar width
    ProgressBars,
    Tags,
    /// Two-column name/level rows
    Rows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceItem {
    /// 1-based position in the stored order
    pub index: usize,
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub date_range: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationItem {
    pub degree: String,
    pub school: String,
    pub location: Option<String>,
    pub graduation: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillItem {
    pub name: String,
    pub level: SkillLevel,
    pub bar_width: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    Summary(String),
    Contact { lines: Vec<String>, links: Vec<Link> },
    Experience {
        style: ExperienceStyle,
        items: Vec<ExperienceItem>,
    },
    Education {
        style: EducationStyle,
        items: Vec<EducationItem>,
    },
    Skills {
        style: SkillStyle,
        items: Vec<SkillItem>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Gradient hero over a two-column body
    Executive {
        header: Header,
        left: Vec<Section>,
        right: Vec<Section>,
    },
    /// Narrow tinted sidebar next to the main column
    Sidebar {
        header: Header,
        sidebar: Vec<Section>,
        main: Vec<Section>,
    },
    /// Full-bleed header, summary panel, then a two-thirds/one-third split
    Creative {
        header: Header,
        summary: Option<Section>,
        main: Vec<Section>,
        aside: Vec<Section>,
    },
    SingleColumn {
        header: Header,
        sections: Vec<Section>,
    },
}

impl Page {
    pub fn header(&self) -> &Header {
        match self {
            Page::Executive { header, .. }
            | Page::Sidebar { header, .. }
            | Page::Creative { header, .. }
            | Page::SingleColumn { header, .. } => header,
        }
    }

    /// Every section in reading order
    pub fn sections(&self) -> Vec<&Section> {
        match self {
            Page::Executive { left, right, .. } => left.iter().chain(right).collect(),
            Page::Sidebar { sidebar, main, .. } => sidebar.iter().chain(main).collect(),
            Page::Creative {
                summary,
                main,
                aside,
                ..
            } => summary.iter().chain(main).chain(aside).collect(),
            Page::SingleColumn { sections, .. } => sections.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResume {
    pub template: TemplateDescriptor,
    pub page: Page,
}

impl RenderedResume {
    pub fn to_html(&self) -> String {
        html::document(self)
    }
}

/// Outcome of rendering by template id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Rendered(RenderedResume),
    TemplateNotFound { template_id: String },
}

impl Preview {
    pub fn to_html(&self) -> String {
        match self {
            Preview::Rendered(resume) => resume.to_html(),
            Preview::TemplateNotFound { template_id } => html::template_not_found(template_id),
        }
    }
}

// ===== Rendering =====

pub fn render(document: &ResumeDocument, template: &TemplateDescriptor) -> RenderedResume {
    let header = Header::from_personal_info(&document.personal_info);

    let page = match template.layout {
        LayoutKind::Executive => Page::Executive {
            header,
            left: collect([
                summary_section("Executive Summary", document),
                skills_section("Core Competencies", SkillStyle::Badges, &document.skills),
            ]),
            right: collect([
                experience_section(
                    "Professional Experience",
                    ExperienceStyle::Timeline,
                    &document.experience,
                ),
                education_section("Education", EducationStyle::Cards, &document.education),
            ]),
        },
        LayoutKind::Sidebar => {
            let contact = Section {
                title: "Contact",
                content: SectionContent::Contact {
                    lines: header.contact.clone(),
                    links: header.links.clone(),
                },
            };
            Page::Sidebar {
                sidebar: collect([
                    Some(contact),
                    skills_section("Skills", SkillStyle::ProgressBars, &document.skills),
                    education_section("Education", EducationStyle::Compact, &document.education),
                ]),
                main: collect([
                    summary_section("Professional Summary", document),
                    experience_section(
                        "Professional Experience",
                        ExperienceStyle::Dated,
                        &document.experience,
                    ),
                ]),
                header,
            }
        }
        LayoutKind::Creative => Page::Creative {
            header,
            summary: summary_section("Creative Vision", document),
            main: collect([experience_section(
                "Experience Journey",
                ExperienceStyle::Numbered,
                &document.experience,
            )]),
            aside: collect([
                skills_section("Skills Palette", SkillStyle::Tags, &document.skills),
                education_section("Education", EducationStyle::Cards, &document.education),
            ]),
        },
        LayoutKind::Traditional | LayoutKind::Modern => Page::SingleColumn {
            header,
            sections: collect([
                summary_section("Professional Summary", document),
                experience_section(
                    "Professional Experience",
                    ExperienceStyle::Dated,
                    &document.experience,
                ),
                education_section("Education", EducationStyle::Dated, &document.education),
                skills_section("Technical Skills", SkillStyle::Rows, &document.skills),
            ]),
        },
    };

    RenderedResume {
        template: template.clone(),
        page,
    }
}

/// Render by id, degrading to a placeholder when the id is unknown
pub fn preview(catalog: &TemplateCatalog, template_id: &str, document: &ResumeDocument) -> Preview {
    match catalog.get_by_id(template_id) {
        Ok(template) => Preview::Rendered(render(document, template)),
        Err(_) => {
            tracing::warn!("Preview requested for unknown template: {}", template_id);
            Preview::TemplateNotFound {
                template_id: template_id.to_string(),
            }
        }
    }
}

fn collect<const N: usize>(sections: [Option<Section>; N]) -> Vec<Section> {
    sections.into_iter().flatten().collect()
}

fn summary_section(title: &'static str, document: &ResumeDocument) -> Option<Section> {
    if document.summary.trim().is_empty() {
        return None;
    }
    Some(Section {
        title,
        content: SectionContent::Summary(document.summary.clone()),
    })
}

fn experience_section(
    title: &'static str,
    style: ExperienceStyle,
    experience: &[Experience],
) -> Option<Section> {
    if experience.is_empty() {
        return None;
    }
    let items = experience
        .iter()
        .enumerate()
        .map(|(i, exp)| ExperienceItem {
            index: i + 1,
            job_title: exp.job_title.clone(),
            company: exp.company.clone(),
            location: non_empty(&exp.location),
            date_range: date_range(exp),
            bullets: bullet_lines(&exp.description),
        })
        .collect();
    Some(Section {
        title,
        content: SectionContent::Experience { style, items },
    })
}

fn education_section(
    title: &'static str,
    style: EducationStyle,
    education: &[Education],
) -> Option<Section> {
    if education.is_empty() {
        return None;
    }
    let items = education
        .iter()
        .map(|edu| EducationItem {
            degree: edu.degree.clone(),
            school: edu.school.clone(),
            location: non_empty(&edu.location),
            graduation: format_date(&edu.graduation_date),
            gpa: edu.gpa().map(str::to_string),
        })
        .collect();
    Some(Section {
        title,
        content: SectionContent::Education { style, items },
    })
}

fn skills_section(title: &'static str, style: SkillStyle, skills: &[Skill]) -> Option<Section> {
    if skills.is_empty() {
        return None;
    }
    let items = skills
        .iter()
        .map(|skill| SkillItem {
            name: skill.name.clone(),
            level: skill.level,
            bar_width: skill.level.bar_width_percent(),
        })
        .collect();
    Some(Section {
        title,
        content: SectionContent::Skills { style, items },
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// ===== Text helpers =====

/// `2020-06` -> `June 2020`; empty stays empty; anything unparseable is shown as typed
pub fn format_date(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(&format!("{}-01", token), "%Y-%m-%d") {
        Ok(date) => date.format("%B %Y").to_string(),
        Err(_) => token.to_string(),
    }
}

pub fn date_range(exp: &Experience) -> String {
    let end = match exp.effective_end_date() {
        Some(end) => format_date(end),
        None => PRESENT.to_string(),
    };
    format!("{} - {}", format_date(&exp.start_date), end)
}

/// Split a description into display lines, prefixing a bullet where none is typed
pub fn bullet_lines(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }
    description
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with(BULLET) {
                line.to_string()
            } else {
                format!("{} {}", BULLET, line)
            }
        })
        .collect()
}
