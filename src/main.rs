use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use groupscholar_grade_transcripts::config::Config;
use groupscholar_grade_transcripts::models::GradePredictorInput;
use groupscholar_grade_transcripts::predict::predict_with_horizon;
use groupscholar_grade_transcripts::render::{export_transcript, OutputFormat};
use groupscholar_grade_transcripts::scale::GradeScale;
use groupscholar_grade_transcripts::{aggregate, ingest, report};

#[derive(Parser)]
#[command(name = "grade-transcripts")]
#[command(about = "Grade summaries, GPA projections and transcript exports for Group Scholar", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize grade records as a markdown report
    Summary {
        #[arg(long)]
        grades: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        current_gpa: Option<f64>,
        #[arg(long)]
        total_credits: Option<f64>,
        #[arg(long)]
        target_gpa: Option<f64>,
    },
    /// Write chart series and grade distributions as JSON
    Charts {
        #[arg(long)]
        grades: PathBuf,
        #[arg(long, default_value = "charts.json")]
        out: PathBuf,
    },
    /// Average needed over the coming credits to reach a target GPA
    Predict {
        /// Defaults to the GPA of the session user
        #[arg(long)]
        current_gpa: Option<f64>,
        #[arg(long)]
        total_credits: f64,
        #[arg(long)]
        target_gpa: f64,
        #[arg(long)]
        session: Option<PathBuf>,
        #[arg(long)]
        horizon_credits: Option<f64>,
    },
    /// Export a processed transcript as a paginated document
    Export {
        #[arg(long)]
        transcript: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
        format: OutputFormat,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        grade_scale: Option<PathBuf>,
        /// Generation date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Write built-in sample grade records and transcript
    Sample {
        #[arg(long, default_value = "grades.csv")]
        grades: PathBuf,
        #[arg(long, default_value = "transcript.json")]
        transcript: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::load().context("invalid configuration")?;

    match cli.command {
        Commands::Summary {
            grades,
            out,
            current_gpa,
            total_credits,
            target_gpa,
        } => {
            let records = ingest::load_grade_records(&grades)?;
            let prediction = match (current_gpa, total_credits, target_gpa) {
                (Some(current_gpa), Some(total_credits), Some(target_gpa)) => {
                    let input = GradePredictorInput {
                        current_gpa,
                        total_credits,
                        target_gpa,
                    };
                    Some(predict_with_horizon(&input, config.horizon_credits))
                }
                (None, None, None) => None,
                _ => bail!("--current-gpa, --total-credits and --target-gpa must be given together"),
            };

            let summary = report::build_report(&records, prediction.as_ref());
            match out {
                Some(out) => {
                    std::fs::write(&out, summary)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Report written to {}.", out.display());
                }
                None => print!("{summary}"),
            }
        }
        Commands::Charts { grades, out } => {
            let records = ingest::load_grade_records(&grades)?;
            let charts = aggregate::chart_data(&records);
            ingest::write_json(&out, &charts)?;
            println!(
                "Chart data for {} records written to {}.",
                records.len(),
                out.display()
            );
        }
        Commands::Predict {
            current_gpa,
            total_credits,
            target_gpa,
            session,
            horizon_credits,
        } => {
            let session = match session {
                Some(path) => Some(ingest::load_session(&path)?),
                None => None,
            };
            let current_gpa = match current_gpa {
                Some(gpa) => gpa,
                None => match session.as_ref().and_then(|s| s.current_user()) {
                    Some(user) => {
                        info!(student_id = %user.student_id, "using current GPA from session");
                        user.gpa
                    }
                    None => bail!("--current-gpa is required without a signed-in session"),
                },
            };

            let horizon = horizon_credits.unwrap_or(config.horizon_credits);
            if !horizon.is_finite() || horizon <= 0.0 {
                bail!("--horizon-credits must be a positive number");
            }

            let input = GradePredictorInput {
                current_gpa,
                total_credits,
                target_gpa,
            };
            let prediction = predict_with_horizon(&input, horizon);
            info!(needed = prediction.needed_average, outlook = ?prediction.outlook, "prediction computed");
            println!("{}", prediction.message);
        }
        Commands::Export {
            transcript,
            format,
            out_dir,
            grade_scale,
            date,
        } => {
            let data = ingest::load_processed_grades(&transcript)?;
            let scale = match grade_scale.or(config.grade_scale_path.clone()) {
                Some(path) => ingest::load_grade_scale(&path)?,
                None => GradeScale::default(),
            };
            let out_dir = out_dir.unwrap_or(config.out_dir.clone());
            let generated_on = date.unwrap_or_else(|| Local::now().date_naive());

            let backend = format.backend();
            let path = export_transcript(&data, &scale, backend.as_ref(), &out_dir, generated_on)?;
            println!("Transcript written to {}.", path.display());
        }
        Commands::Sample { grades, transcript } => {
            ingest::write_grade_records_csv(&grades, &ingest::sample_records())?;
            ingest::write_json(&transcript, &ingest::sample_transcript())?;
            println!(
                "Sample data written to {} and {}.",
                grades.display(),
                transcript.display()
            );
        }
    }

    Ok(())
}
