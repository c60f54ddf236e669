use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::warn;

mod intent;
mod judge;
mod keywords;
mod models;
mod rank;
mod report;
mod rules;
mod semantic;
mod store;

use judge::{GeminiJudge, Judge};
use rank::Recommender;
use store::{Catalog, InstructorDirectory, ProfileStore};

#[derive(Parser)]
#[command(name = "coursematch")]
#[command(about = "Hybrid rule/semantic course recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a realistic sample data set
    Seed {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Import courses from a CSV export
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Recommend courses for a student from a free-text query
    Recommend {
        #[arg(long)]
        student: String,
        #[arg(long)]
        query: String,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Generate a markdown report of recommendations
    Report {
        #[arg(long)]
        student: String,
        #[arg(long)]
        query: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { data_dir } => {
            store::seed(&data_dir)?;
            println!("Sample data written to {}.", data_dir.display());
        }
        Commands::Import { csv, data_dir } => {
            let mut catalog = Catalog::load(&data_dir)?;
            let inserted = catalog.import_csv(&csv)?;
            catalog.save(&data_dir)?;
            println!("Imported {inserted} courses from {}.", csv.display());
        }
        Commands::Recommend {
            student,
            query,
            data_dir,
        } => {
            let catalog = Catalog::load(&data_dir)?;
            let profiles = ProfileStore::load(&data_dir)?;
            let instructors = InstructorDirectory::load(&data_dir)?;
            let profile = profiles
                .resolve(&student)
                .context("no student profiles available")?;

            let gemini = gemini_from_env();
            let judge = gemini.as_ref().map(|g| g as &dyn Judge);
            let recommender = Recommender::new(catalog.courses(), &instructors, judge);
            let results = recommender.recommend(profile, &query).await;

            if results.is_empty() {
                println!("No courses matched this query.");
                return Ok(());
            }

            println!("Top course matches for {}:", profile.id);
            for candidate in &results {
                let course = &candidate.course;
                println!(
                    "- {} {} ({}, {} credits) score {}",
                    course.id, course.title, course.department, course.credits, candidate.score
                );
                if let Some(instructor) = &candidate.instructor {
                    match instructor.rating {
                        Some(rating) => {
                            println!("    Taught by {} (rating {rating})", instructor.name)
                        }
                        None => println!("    Taught by {}", instructor.name),
                    }
                }
                for reason in &candidate.reasons {
                    println!("    {reason}");
                }
            }
        }
        Commands::Report {
            student,
            query,
            out,
            data_dir,
        } => {
            let catalog = Catalog::load(&data_dir)?;
            let profiles = ProfileStore::load(&data_dir)?;
            let instructors = InstructorDirectory::load(&data_dir)?;
            let profile = profiles
                .resolve(&student)
                .context("no student profiles available")?;

            let gemini = gemini_from_env();
            let judge = gemini.as_ref().map(|g| g as &dyn Judge);
            let recommender = Recommender::new(catalog.courses(), &instructors, judge);
            let results = recommender.recommend(profile, &query).await;

            let report = report::build_report(profile, &query, &results);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Semantic scoring is opt-in via GEMINI_API_KEY; without it every stage
/// runs on the deterministic fallbacks.
fn gemini_from_env() -> Option<GeminiJudge> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => match GeminiJudge::new(key) {
            Ok(judge) => Some(judge),
            Err(err) => {
                warn!("could not configure judgment service: {err}");
                None
            }
        },
        _ => {
            warn!("GEMINI_API_KEY not set; semantic scoring disabled");
            None
        }
    }
}
