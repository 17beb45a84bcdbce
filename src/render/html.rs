// src/render/html.rs
//! Print-ready HTML emission for rendered resumes

use super::{
    EducationItem, EducationStyle, ExperienceItem, ExperienceStyle, Header, Link, Page,
    RenderedResume, Section, SectionContent, SkillItem, SkillStyle, BULLET,
};
use crate::template_system::Palette;

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn document(resume: &RenderedResume) -> String {
    let header = resume.page.header();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{} - Resume</title>\n", escape(&header.name)));
    html.push_str(&format!(
        "<meta name=\"template\" content=\"{}\">\n",
        escape(&resume.template.id)
    ));
    html.push_str("<style>\n");
    html.push_str(&stylesheet(&resume.template.colors));
    html.push_str("</style>\n</head>\n");
    html.push_str(&format!("<body class=\"layout-{}\">\n", resume.template.layout));

    match &resume.page {
        Page::Executive {
            header,
            left,
            right,
        } => {
            html.push_str(&hero(header, "hero hero-centered", "photo photo-round"));
            html.push_str("<main class=\"columns\">\n<div class=\"column\">\n");
            html.push_str(&sections(left));
            html.push_str("</div>\n<div class=\"column\">\n");
            html.push_str(&sections(right));
            html.push_str("</div>\n</main>\n");
        }
        Page::Sidebar {
            header,
            sidebar,
            main,
        } => {
            html.push_str("<div class=\"sidebar-layout\">\n<aside class=\"sidebar\">\n");
            html.push_str(&photo(header, "photo photo-round"));
            html.push_str(&sections(sidebar));
            html.push_str("</aside>\n<main class=\"main\">\n");
            html.push_str(&format!(
                "<header class=\"name-header\">\n<h1>{}</h1>\n<div class=\"accent-bar\"></div>\n</header>\n",
                escape(&header.name)
            ));
            html.push_str(&sections(main));
            html.push_str("</main>\n</div>\n");
        }
        Page::Creative {
            header,
            summary,
            main,
            aside,
        } => {
            html.push_str(&hero(header, "hero hero-creative", "photo photo-tilted"));
            html.push_str("<main class=\"creative-body\">\n");
            if let Some(summary) = summary {
                html.push_str("<div class=\"panel\">\n");
                html.push_str(&section(summary));
                html.push_str("</div>\n");
            }
            html.push_str("<div class=\"split\">\n<div class=\"two-thirds\">\n");
            html.push_str(&sections(main));
            html.push_str("</div>\n<div class=\"one-third\">\n");
            html.push_str(&sections(aside));
            html.push_str("</div>\n</div>\n</main>\n");
        }
        Page::SingleColumn { header, sections: body } => {
            html.push_str("<main class=\"single\">\n");
            html.push_str("<header class=\"doc-header\">\n");
            html.push_str(&photo(header, "photo photo-round photo-small"));
            html.push_str(&identity(header));
            html.push_str("</header>\n");
            html.push_str(&sections(body));
            html.push_str("</main>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn template_not_found(template_id: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Template not found</title>\n</head>\n<body>\n<div class=\"template-not-found\" data-template=\"{}\">Template not found</div>\n</body>\n</html>\n",
        escape(template_id)
    )
}

fn stylesheet(colors: &Palette) -> String {
    let mut css = format!(
        ":root {{ --primary: {}; --secondary: {}; --accent: {}; --text: {}; --background: {}; --light: {}; }}\n",
        colors.primary, colors.secondary, colors.accent, colors.text, colors.background, colors.light
    );
    css.push_str(&format!(
        ".hero {{ background: {}; color: #ffffff; padding: 3rem 2rem; }}\n",
        colors.gradient()
    ));
    css.push_str(
        r#"@page { size: A4; margin: 12mm; }
* { box-sizing: border-box; }
body { margin: 0; font-family: "Helvetica Neue", Arial, sans-serif; color: var(--text); background: var(--background); }
h1 { margin: 0 0 0.5rem; }
h2 { color: var(--primary); border-bottom: 2px solid var(--accent); padding-bottom: 0.4rem; }
h3 { margin: 0; color: var(--text); }
a { color: inherit; }
.hero-centered { text-align: center; }
.hero-creative { display: flex; align-items: center; gap: 2rem; }
.photo img { width:100%; height:100%; object-fit: cover; }
.photo { width: 8rem; height: 8rem; overflow: hidden; border: 4px solid #ffffff; }
.photo-round { border-radius: 50%; margin: 0 auto 1rem; }
.photo-small { width: 6rem; height: 6rem; }
.photo-tilted { border-radius: 1rem; transform: rotate(3deg); }
.contact, .links { display: flex; flex-wrap: wrap; gap: 1rem; justify-content: inherit; }
.hero-centered .contact, .hero-centered .links { justify-content: center; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 3rem; padding: 2rem; }
.sidebar-layout { display: flex; }
.sidebar { width: 33%; background: var(--light); padding: 2rem; }
.main { flex: 1; padding: 2rem; }
.accent-bar { height: 4px; width: 6rem; background: var(--accent); margin-bottom: 1rem; }
.creative-body { padding: 2rem; }
.panel { background: var(--light); border-radius: 1rem; padding: 1.5rem; margin-bottom: 2rem; }
.split { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }
.single { padding: 2rem; }
.doc-header { text-align: center; border-bottom: 3px solid var(--primary); padding-bottom: 1.5rem; margin-bottom: 1.5rem; }
.exp { margin-bottom: 1.5rem; }
.exp.timeline { border-left: 4px solid var(--accent); padding-left: 1.25rem; }
.exp.numbered { display: flex; gap: 1rem; }
.index-badge { flex-shrink: 0; width: 2.5rem; height: 2.5rem; border-radius: 50%; background: var(--accent); color: #ffffff; display: flex; align-items: center; justify-content: center; font-weight: bold; }
.card { background: var(--light); border-radius: 0.75rem; padding: 1rem; margin-bottom: 1rem; }
.row { display: flex; justify-content: space-between; align-items: baseline; gap: 1rem; }
.dates { color: var(--secondary); white-space: nowrap; }
.company, .school, .meta { color: var(--primary); font-weight: 600; }
.location { color: var(--secondary); font-size: 0.9em; }
.bullet { margin-bottom: 0.25rem; }
.level-badge { background: var(--accent); color: #ffffff; border-radius: 999px; padding: 0.1rem 0.6rem; font-size: 0.8em; }
.level { color: var(--secondary); font-size: 0.85em; }
.skill-row { display: flex; justify-content: space-between; align-items: center; padding: 0.4rem 0; }
.skill-grid { display: grid; grid-template-columns: 1fr 1fr; column-gap: 2rem; }
.track { background: #e5e7eb; border-radius: 999px; height: 0.5rem; }
.fill { background: var(--accent); border-radius: 999px; height: 0.5rem; }
.tags { list-style: none; padding: 0; margin: 0; }
.tag { border-left: 4px solid var(--accent); background: var(--background); padding: 0.5rem; margin-bottom: 0.5rem; display: flex; justify-content: space-between; }
@media print {
  body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  .exp, .card, .tag { break-inside: avoid; }
}
"#,
    );
    css
}

// ===== Header parts =====

fn hero(header: &Header, class: &str, photo_class: &str) -> String {
    let mut html = format!("<header class=\"{}\">\n", class);
    html.push_str(&photo(header, photo_class));
    html.push_str("<div class=\"identity\">\n");
    html.push_str(&identity(header));
    html.push_str("</div>\n</header>\n");
    html
}

fn identity(header: &Header) -> String {
    let mut html = format!("<h1>{}</h1>\n", escape(&header.name));
    if !header.contact.is_empty() {
        html.push_str(&format!(
            "<div class=\"contact\">{}</div>\n",
            escape(&header.contact_line())
        ));
    }
    if !header.links.is_empty() {
        html.push_str("<div class=\"links\">");
        for link in &header.links {
            html.push_str(&anchor(link));
        }
        html.push_str("</div>\n");
    }
    html
}

fn photo(header: &Header, class: &str) -> String {
    match &header.photo {
        Some(src) => format!(
            "<div class=\"{}\"><img src=\"{}\" alt=\"Profile\"></div>\n",
            class,
            escape(src)
        ),
        None => String::new(),
    }
}

fn anchor(link: &Link) -> String {
    if has_safe_scheme(&link.href) {
        format!("<a href=\"{}\">{}</a>", escape(&link.href), link.label)
    } else {
        format!("<span class=\"link\">{}</span>", escape(&link.href))
    }
}

fn has_safe_scheme(href: &str) -> bool {
    let href = href.trim_start().to_ascii_lowercase();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

// ===== Sections =====

fn sections(list: &[Section]) -> String {
    list.iter().map(section).collect()
}

fn section(section: &Section) -> String {
    let mut html = format!("<section>\n<h2>{}</h2>\n", section.title);
    match &section.content {
        SectionContent::Summary(text) => {
            html.push_str(&format!("<p class=\"summary\">{}</p>\n", escape(text)));
        }
        SectionContent::Contact { lines, links } => {
            html.push_str("<div class=\"contact-block\">\n");
            for line in lines {
                html.push_str(&format!("<div>{}</div>\n", escape(line)));
            }
            for link in links {
                html.push_str(&format!("<div>{}</div>\n", anchor(link)));
            }
            html.push_str("</div>\n");
        }
        SectionContent::Experience { style, items } => {
            for item in items {
                html.push_str(&experience(*style, item));
            }
        }
        SectionContent::Education { style, items } => {
            for item in items {
                html.push_str(&education(*style, item));
            }
        }
        SectionContent::Skills { style, items } => html.push_str(&skills(*style, items)),
    }
    html.push_str("</section>\n");
    html
}

fn bullets(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div class=\"bullets\">\n");
    for line in lines {
        html.push_str(&format!("<div class=\"bullet\">{}</div>\n", escape(line)));
    }
    html.push_str("</div>\n");
    html
}

fn with_location(text: &str, location: &Option<String>) -> String {
    match location {
        Some(location) => format!("{} {} {}", escape(text), BULLET, escape(location)),
        None => escape(text),
    }
}

fn experience(style: ExperienceStyle, item: &ExperienceItem) -> String {
    match style {
        ExperienceStyle::Timeline => {
            let mut html = String::from("<article class=\"exp timeline\">\n");
            html.push_str(&format!("<h3>{}</h3>\n", escape(&item.job_title)));
            html.push_str(&format!(
                "<div class=\"meta\">{} {} {}</div>\n",
                escape(&item.company),
                BULLET,
                escape(&item.date_range)
            ));
            if let Some(location) = &item.location {
                html.push_str(&format!(
                    "<div class=\"location\">{}</div>\n",
                    escape(location)
                ));
            }
            html.push_str(&bullets(&item.bullets));
            html.push_str("</article>\n");
            html
        }
        ExperienceStyle::Dated => {
            let mut html = String::from("<article class=\"exp dated\">\n");
            html.push_str(&format!(
                "<div class=\"row\"><h3>{}</h3><span class=\"dates\">{}</span></div>\n",
                escape(&item.job_title),
                escape(&item.date_range)
            ));
            html.push_str(&format!(
                "<div class=\"company\">{}</div>\n",
                with_location(&item.company, &item.location)
            ));
            html.push_str(&bullets(&item.bullets));
            html.push_str("</article>\n");
            html
        }
        ExperienceStyle::Numbered => {
            let mut html = String::from("<article class=\"exp numbered\">\n");
            html.push_str(&format!(
                "<span class=\"index-badge\">{}</span>\n<div class=\"card\">\n",
                item.index
            ));
            html.push_str(&format!("<h3>{}</h3>\n", escape(&item.job_title)));
            html.push_str(&format!(
                "<div class=\"company\">{}</div>\n",
                escape(&item.company)
            ));
            html.push_str(&format!(
                "<div class=\"dates\">{}</div>\n",
                with_location(&item.date_range, &item.location)
            ));
            html.push_str(&bullets(&item.bullets));
            html.push_str("</div>\n</article>\n");
            html
        }
    }
}

fn gpa(item: &EducationItem) -> String {
    match &item.gpa {
        Some(gpa) => format!("<div class=\"gpa\">GPA: {}</div>\n", escape(gpa)),
        None => String::new(),
    }
}

fn education(style: EducationStyle, item: &EducationItem) -> String {
    let mut html = String::new();
    match style {
        EducationStyle::Cards => {
            html.push_str("<div class=\"edu card\">\n");
            html.push_str(&format!("<h3>{}</h3>\n", escape(&item.degree)));
            html.push_str(&format!(
                "<div class=\"school\">{} {} {}</div>\n",
                escape(&item.school),
                BULLET,
                escape(&item.graduation)
            ));
            if let Some(location) = &item.location {
                html.push_str(&format!(
                    "<div class=\"location\">{}</div>\n",
                    escape(location)
                ));
            }
        }
        EducationStyle::Compact => {
            html.push_str("<div class=\"edu compact\">\n");
            html.push_str(&format!("<h3>{}</h3>\n", escape(&item.degree)));
            html.push_str(&format!("<div class=\"school\">{}</div>\n", escape(&item.school)));
            html.push_str(&format!(
                "<div class=\"dates\">{}</div>\n",
                escape(&item.graduation)
            ));
        }
        EducationStyle::Dated => {
            html.push_str("<div class=\"edu dated\">\n");
            html.push_str(&format!(
                "<div class=\"row\"><h3>{}</h3><span class=\"dates\">{}</span></div>\n",
                escape(&item.degree),
                escape(&item.graduation)
            ));
            html.push_str(&format!(
                "<div class=\"school\">{}</div>\n",
                with_location(&item.school, &item.location)
            ));
        }
    }
    html.push_str(&gpa(item));
    html.push_str("</div>\n");
    html
}

fn skills(style: SkillStyle, items: &[SkillItem]) -> String {
    let mut html = String::new();
    match style {
        SkillStyle::Badges => {
            for item in items {
                html.push_str(&format!(
                    "<div class=\"skill-row card\"><span>{}</span><span class=\"level-badge\">{}</span></div>\n",
                    escape(&item.name),
                    item.level
                ));
            }
        }
        SkillStyle::ProgressBars => {
            for item in items {
                html.push_str(&format!(
                    "<div class=\"skill-bar\">\n<div class=\"row\"><span>{}</span><span class=\"level\">{}</span></div>\n<div class=\"track\"><div class=\"fill\" style=\"width: {}%\"></div></div>\n</div>\n",
                    escape(&item.name),
                    item.level,
                    item.bar_width
                ));
            }
        }
        SkillStyle::Tags => {
            html.push_str("<ul class=\"tags\">\n");
            for item in items {
                html.push_str(&format!(
                    "<li class=\"tag\"><span>{}</span><span class=\"level-badge\">{}</span></li>\n",
                    escape(&item.name),
                    item.level
                ));
            }
            html.push_str("</ul>\n");
        }
        SkillStyle::Rows => {
            html.push_str("<div class=\"skill-grid\">\n");
            for item in items {
                html.push_str(&format!(
                    "<div class=\"skill-row\"><span>{}</span><span class=\"level\">{}</span></div>\n",
                    escape(&item.name),
                    item.level
                ));
            }
            html.push_str("</div>\n");
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::template_system::TemplateCatalog;
    use crate::types::ResumeDocument;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"R&D" it's</b>"#),
            "&lt;b&gt;&quot;R&amp;D&quot; it&#39;s&lt;/b&gt;"
        );
    }

    #[test]
    fn test_user_text_is_escaped() {
        let catalog = TemplateCatalog::builtin();
        let mut doc = ResumeDocument::new();
        doc.personal_info.full_name = "<script>alert(1)</script>".to_string();
        doc.summary = "Tom & Jerry".to_string();

        let html = render(&doc, catalog.get_by_id("minimal-slate").unwrap()).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn test_palette_is_interpolated() {
        let catalog = TemplateCatalog::builtin();
        let html = render(
            &ResumeDocument::new(),
            catalog.get_by_id("executive-navy").unwrap(),
        )
        .to_html();

        assert!(html.contains("--primary: #1e3a8a"));
        assert!(html.contains("linear-gradient(135deg, #1e3a8a, #3b82f6)"));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn test_photo_is_optional() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get_by_id("creative-purple").unwrap();
        let mut doc = ResumeDocument::new();

        assert!(!render(&doc, template).to_html().contains("<img"));

        doc.personal_info.photo = Some("data:image/png;base64,AAAA".to_string());
        let html = render(&doc, template).to_html();
        assert!(html.contains("photo-tilted"));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn test_gpa_and_links_rendered_when_present() {
        let catalog = TemplateCatalog::builtin();
        let mut doc = ResumeDocument::new();
        doc.personal_info.website = "https://example.dev".to_string();
        let edu = doc.add_education();
        edu.degree = "MSc".to_string();
        edu.school = "ETH".to_string();
        edu.gpa = Some("5.5/6".to_string());

        let html = render(&doc, catalog.get_by_id("minimal-charcoal").unwrap()).to_html();
        assert!(html.contains("GPA: 5.5/6"));
        assert!(html.contains("<a href=\"https://example.dev\">Portfolio</a>"));
        assert!(!html.contains("LinkedIn"));
    }

    #[test]
    fn test_only_web_and_mail_links_are_clickable() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get_by_id("modern-teal").unwrap();
        let mut doc = ResumeDocument::new();
        doc.personal_info.linkedin = "javascript:alert(document.cookie)".to_string();
        doc.personal_info.website = "HTTPS://ada.dev".to_string();

        let html = render(&doc, template).to_html();
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("<span class=\"link\">javascript:alert(document.cookie)</span>"));
        assert!(html.contains("<a href=\"HTTPS://ada.dev\">Portfolio</a>"));

        assert!(has_safe_scheme("mailto:ada@example.com"));
        assert!(!has_safe_scheme("data:text/html,hi"));
        assert!(!has_safe_scheme("ada.dev"));
    }
}
