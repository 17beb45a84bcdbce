// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::cover_letter::CoverLetterService;
use crate::export::Exporter;
use crate::photo::photo_data_url;
use crate::reviews::{average_rating, ReviewService, StoredReviews};
use crate::storage::SqliteStore;
use crate::template_system::{CategoryFilter, TemplateCatalog, DEFAULT_TEMPLATE_ID};
use crate::types::{CoverLetterInputs, ResumeDocument, ReviewInput};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "resume-studio")]
#[command(about = "Build resumes and cover letters from structured data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,
    /// List templates, optionally for one category
    Templates {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Render a resume JSON file to HTML (and PDF when configured)
    Render {
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_TEMPLATE_ID)]
        template: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a cover letter for a resume JSON file
    CoverLetter {
        input: PathBuf,
        #[arg(long)]
        company: String,
        #[arg(long)]
        job_title: String,
        #[arg(long, default_value = "")]
        hiring_manager: String,
        #[arg(long, default_value = "")]
        job_description: String,
        #[arg(long, default_value = "")]
        why_interested: String,
        #[arg(long, default_value = "")]
        key_achievement: String,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        print: bool,
    },
    /// Stored reviews
    Reviews {
        #[command(subcommand)]
        command: ReviewCommand,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Show stored reviews, newest first
    List,
    /// Submit a review
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        comment: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long)]
        rating: Option<u8>,
        /// Image file used as avatar
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

pub async fn handle_command(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Serve => start_web_server(&config).await,

        Command::Templates { category } => {
            let catalog = TemplateCatalog::with_custom_dir(&config.templates_path)?;
            let filter: CategoryFilter = category.parse()?;
            for template in catalog.filter_by_category(filter) {
                println!(
                    "{:<22} {:<13} {:<12} {}",
                    template.id,
                    template.category.as_str(),
                    template.layout.as_str(),
                    template.description
                );
            }
            Ok(())
        }

        Command::Render {
            input,
            template,
            output,
        } => {
            let catalog = TemplateCatalog::with_custom_dir(&config.templates_path)?;
            let template = catalog.get_by_id(&template)?;
            let document = ResumeDocument::from_json_file(&input)?;

            let exporter = Exporter::new(output.unwrap_or_else(|| config.output_path.clone()))
                .with_pdf_command(config.pdf_command.clone());
            let exported = exporter.export_resume(&document, template)?;

            println!("{}", exported.html.display());
            if let Some(pdf) = exported.pdf {
                println!("{}", pdf.display());
            }
            Ok(())
        }

        Command::CoverLetter {
            input,
            company,
            job_title,
            hiring_manager,
            job_description,
            why_interested,
            key_achievement,
            print,
        } => {
            let document = ResumeDocument::from_json_file(&input)?;
            let inputs = CoverLetterInputs {
                company_name: company,
                job_title,
                hiring_manager_name: hiring_manager,
                job_description,
                why_interested,
                key_achievement,
            };

            let service = CoverLetterService::new(config.generation_pacer());
            let letter = service.generate(&document, &inputs).await?;

            if print {
                println!("{}", letter);
            } else {
                let path = Exporter::new(config.output_path.clone())
                    .export_cover_letter(&document.personal_info.full_name, &letter)?;
                println!("{}", path.display());
            }
            Ok(())
        }

        Command::Reviews { command } => {
            let store = SqliteStore::open(&config.database_path).await?;
            let service = ReviewService::new(
                Arc::new(StoredReviews::new(store)),
                config.review_pacer(),
            );
            handle_review_command(command, &service).await
        }
    }
}

async fn handle_review_command(command: ReviewCommand, service: &ReviewService) -> Result<()> {
    match command {
        ReviewCommand::List => {
            let reviews = service.list().await?;
            for review in &reviews {
                println!(
                    "{} {} ({}) {}/5: {}",
                    review.date, review.name, review.role, review.rating, review.comment
                );
            }
            match average_rating(&reviews) {
                Some(avg) => println!("{} reviews, average {:.1}/5", reviews.len(), avg),
                None => println!("No reviews yet"),
            }
            Ok(())
        }

        ReviewCommand::Add {
            name,
            comment,
            role,
            rating,
            photo,
        } => {
            let photo = match photo {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("Failed to read photo: {}", path.display()))?;
                    photo_data_url(content_type_for(&path), &bytes)
                }
                None => None,
            };

            let review = service
                .submit(ReviewInput {
                    name,
                    role,
                    rating,
                    comment,
                    photo,
                })
                .await?;
            info!("Review {} stored", review.id);
            println!("{}", review.id);
            Ok(())
        }
    }
}

fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
