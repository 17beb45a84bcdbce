// src/types/resume.rs
//! Resume document model shared by the builder, the renderer and the cover letter generator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Placeholder shown wherever the candidate has not entered a name yet.
pub const NAME_PLACEHOLDER: &str = "Your Name";

// ===== Personal Info =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    /// Embedded data reference (`data:image/...`) or plain URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl PersonalInfo {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            NAME_PLACEHOLDER
        } else {
            &self.full_name
        }
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref().filter(|p| !p.is_empty())
    }
}

// ===== Experience / Education / Skills =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    /// Year-month token, e.g. `2020-06`
    pub start_date: String,
    /// Ignored while `is_current_job` is set
    pub end_date: String,
    pub is_current_job: bool,
    /// Newline separated bullet lines
    pub description: String,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            job_title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current_job: false,
            description: String::new(),
        }
    }
}

impl Experience {
    /// End date token as displayed: `None` while the job is current
    pub fn effective_end_date(&self) -> Option<&str> {
        if self.is_current_job {
            None
        } else {
            Some(&self.end_date)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub location: String,
    pub graduation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            degree: String::new(),
            school: String::new(),
            location: String::new(),
            graduation_date: String::new(),
            gpa: None,
        }
    }
}

impl Education {
    pub fn gpa(&self) -> Option<&str> {
        self.gpa.as_deref().filter(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }

    /// Width of the sidebar progress bar, in percent
    pub fn bar_width_percent(&self) -> u8 {
        match self {
            Self::Beginner => 40,
            Self::Intermediate => 60,
            Self::Advanced => 80,
            Self::Expert => 100,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            name: String::new(),
            level: SkillLevel::default(),
        }
    }
}

// ===== Resume Document =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
}

impl ResumeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resume file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse resume file: {}", path.display()))
    }

    pub fn add_experience(&mut self) -> &mut Experience {
        self.experience.push(Experience::default());
        let last = self.experience.len() - 1;
        &mut self.experience[last]
    }

    pub fn experience_mut(&mut self, id: &str) -> Option<&mut Experience> {
        self.experience.iter_mut().find(|e| e.id == id)
    }

    pub fn remove_experience(&mut self, id: &str) -> bool {
        let before = self.experience.len();
        self.experience.retain(|e| e.id != id);
        self.experience.len() != before
    }

    pub fn add_education(&mut self) -> &mut Education {
        self.education.push(Education::default());
        let last = self.education.len() - 1;
        &mut self.education[last]
    }

    pub fn education_mut(&mut self, id: &str) -> Option<&mut Education> {
        self.education.iter_mut().find(|e| e.id == id)
    }

    pub fn remove_education(&mut self, id: &str) -> bool {
        let before = self.education.len();
        self.education.retain(|e| e.id != id);
        self.education.len() != before
    }

    pub fn add_skill(&mut self) -> &mut Skill {
        self.skills.push(Skill::default());
        let last = self.skills.len() - 1;
        &mut self.skills[last]
    }

    pub fn skill_mut(&mut self, id: &str) -> Option<&mut Skill> {
        self.skills.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_skill(&mut self, id: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s.id != id);
        self.skills.len() != before
    }
}

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}
