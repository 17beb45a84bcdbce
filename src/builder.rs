// src/builder.rs
//! Builder funnel: landing page, tabbed editor, thank-you page and cover letter step.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;

use crate::render::{self, Preview};
use crate::template_system::{TemplateCatalog, TemplateError, DEFAULT_TEMPLATE_ID};
use crate::types::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    Landing,
    Builder,
    ThankYou,
    CoverLetter,
}

impl FunnelStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Builder => "builder",
            Self::ThankYou => "thank_you",
            Self::CoverLetter => "cover_letter",
        }
    }
}

impl fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor tabs in display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderTab {
    #[default]
    Template,
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
}

impl BuilderTab {
    pub const ALL: [BuilderTab; 6] = [
        BuilderTab::Template,
        BuilderTab::Personal,
        BuilderTab::Summary,
        BuilderTab::Experience,
        BuilderTab::Education,
        BuilderTab::Skills,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// `None` on the last tab
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// `None` on the first tab
    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).map(|i| Self::ALL[i])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunnelError {
    #[error("Cannot {action} from the {from} step")]
    InvalidTransition {
        from: FunnelStep,
        action: &'static str,
    },
    #[error("No completed resume yet")]
    NotCompleted,
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// State of one user's pass through the funnel
#[derive(Debug, Clone)]
pub struct BuilderSession {
    step: FunnelStep,
    tab: BuilderTab,
    document: ResumeDocument,
    template_id: String,
    completed: Option<ResumeDocument>,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    pub fn new() -> Self {
        Self {
            step: FunnelStep::Landing,
            tab: BuilderTab::default(),
            document: ResumeDocument::new(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            completed: None,
        }
    }

    pub fn step(&self) -> FunnelStep {
        self.step
    }

    pub fn tab(&self) -> BuilderTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: BuilderTab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) -> BuilderTab {
        if let Some(next) = self.tab.next() {
            self.tab = next;
        }
        self.tab
    }

    pub fn previous_tab(&mut self) -> BuilderTab {
        if let Some(previous) = self.tab.previous() {
            self.tab = previous;
        }
        self.tab
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ResumeDocument {
        &mut self.document
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Document snapshot taken when the builder was completed
    pub fn completed(&self) -> Option<&ResumeDocument> {
        self.completed.as_ref()
    }

    /// Live preview of the in-progress document
    pub fn preview(&self, catalog: &TemplateCatalog) -> Preview {
        render::preview(catalog, &self.template_id, &self.document)
    }

    fn expect_step(&self, expected: FunnelStep, action: &'static str) -> Result<(), FunnelError> {
        if self.step != expected {
            return Err(FunnelError::InvalidTransition {
                from: self.step,
                action,
            });
        }
        Ok(())
    }

    fn move_to(&mut self, step: FunnelStep) {
        info!("Funnel step: {} -> {}", self.step, step);
        self.step = step;
    }

    pub fn get_started(&mut self) -> Result<(), FunnelError> {
        self.expect_step(FunnelStep::Landing, "get started")?;
        self.move_to(FunnelStep::Builder);
        Ok(())
    }

    pub fn select_template(
        &mut self,
        catalog: &TemplateCatalog,
        template_id: &str,
    ) -> Result<(), FunnelError> {
        self.expect_step(FunnelStep::Builder, "select a template")?;
        let template = catalog.get_by_id(template_id)?;
        self.template_id = template.id.clone();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<&ResumeDocument, FunnelError> {
        self.expect_step(FunnelStep::Builder, "complete the resume")?;
        self.move_to(FunnelStep::ThankYou);
        Ok(self.completed.insert(self.document.clone()))
    }

    pub fn open_cover_letter(&mut self) -> Result<&ResumeDocument, FunnelError> {
        self.expect_step(FunnelStep::ThankYou, "open the cover letter")?;
        if self.completed.is_none() {
            return Err(FunnelError::NotCompleted);
        }
        self.move_to(FunnelStep::CoverLetter);
        self.completed.as_ref().ok_or(FunnelError::NotCompleted)
    }

    pub fn back_to_thank_you(&mut self) -> Result<(), FunnelError> {
        self.expect_step(FunnelStep::CoverLetter, "go back")?;
        self.move_to(FunnelStep::ThankYou);
        Ok(())
    }

    /// Back to the landing page with a fresh editor
    pub fn start_over(&mut self) {
        self.move_to(FunnelStep::Landing);
        self.tab = BuilderTab::default();
        self.document = ResumeDocument::new();
        self.template_id = DEFAULT_TEMPLATE_ID.to_string();
        self.completed = None;
    }
}
