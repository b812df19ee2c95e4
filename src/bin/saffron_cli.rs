use clap::{Parser, Subcommand};
use saffron_advisor::core::advisory::{
    build_ranges_response, build_season_response, AssessmentResponse, ReadingResponse,
    SeasonResponse,
};
use saffron_advisor::core::season::parse_date;
use saffron_advisor::core::Clock;
use saffron_advisor::utils::error::{AdvisorError, ErrorSeverity};
use saffron_advisor::utils::{logger, validation::Validate};
use saffron_advisor::{AdvisoryService, SourceArgs, SystemClock, ThingSpeakSource};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "saffron-cli")]
#[command(about = "One-shot queries against the soil channel and the season calendar")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    source: SourceArgs,

    /// Print the API JSON payload instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and print the latest soil reading
    Reading,
    /// Show the current season and the next transition
    Season {
        /// Date to evaluate (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the nutrient reference ranges
    Ranges,
    /// Classify the latest reading and score field health
    Assess,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(&args).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium | ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(args: &Args) -> Result<(), AdvisorError> {
    match &args.command {
        Command::Season { date } => {
            let today = match date {
                Some(input) => parse_date(input)?,
                None => SystemClock.today(),
            };
            let season = build_season_response(today);
            if args.json {
                print_json(&season)?;
            } else {
                print_season(&season);
            }
        }
        Command::Ranges => {
            let ranges = build_ranges_response();
            if args.json {
                print_json(&ranges)?;
            } else {
                for (name, range) in [
                    ("Nitrogen", &ranges.nitrogen),
                    ("Phosphorus", &ranges.phosphorus),
                    ("Potassium", &ranges.potassium),
                ] {
                    println!("{}: {}–{} {}", name, range.low, range.high, range.unit);
                }
            }
        }
        Command::Reading => {
            let reading = service(&args.source)?.sensor_reading().await?;
            if args.json {
                print_json(&reading)?;
            } else {
                print_reading(&reading);
            }
        }
        Command::Assess => {
            let assessment = service(&args.source)?.assessment().await?;
            if args.json {
                print_json(&assessment)?;
            } else {
                print_assessment(&assessment);
            }
        }
    }
    Ok(())
}

fn service(source: &SourceArgs) -> Result<AdvisoryService, AdvisorError> {
    let config = source.load()?;
    config.telemetry.validate()?;
    let source = ThingSpeakSource::new(config.telemetry)?;
    Ok(AdvisoryService::new(Arc::new(source), Arc::new(SystemClock)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AdvisorError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_reading(reading: &ReadingResponse) {
    println!(
        "N: {}, P: {}, K: {}, Moisture: {}",
        reading.nitrogen, reading.phosphorus, reading.potassium, reading.soil_moisture
    );
}

fn print_season(season: &SeasonResponse) {
    println!("🌱 {}", season.current_season);
    println!("   {}", season.description);
    for tip in &season.care_tips {
        println!("   • {}", tip);
    }
    println!(
        "⏭  {} begins {} ({} days)",
        season.next_season, season.next_season_date, season.days_until_next
    );
}

fn print_assessment(assessment: &AssessmentResponse) {
    println!(
        "Field health: {} ({:?})",
        assessment.health_score, assessment.grade
    );
    for (kind, field) in &assessment.fields {
        println!(
            "  {:<14} {:>5} {:<6} {:?}: {}",
            kind.key(),
            field.value,
            field.range.unit,
            field.status,
            field.message
        );
        if let Some(rec) = &field.recommendation {
            println!("  {:<14} {} ({}, {})", "", rec.action, rec.dosage, rec.timing);
        }
    }
    for alert in &assessment.alerts {
        println!("⚠️  [{:?}/{:?}] {}", alert.kind, alert.severity, alert.message);
    }
}
