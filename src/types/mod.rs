// src/types/mod.rs
pub mod cover_letter;
pub mod resume;
pub mod review;

pub use cover_letter::CoverLetterInputs;
pub use resume::{
    Education, Experience, PersonalInfo, ResumeDocument, Skill, SkillLevel, NAME_PLACEHOLDER,
};
pub use review::{Review, ReviewInput};
