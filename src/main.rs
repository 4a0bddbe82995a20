use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;

mod aggregate;
mod error;
mod export;
mod models;
mod normalize;
mod profiles;
mod report;
mod score;
mod source;

use models::{PlayerProfile, PlayerScore, SearchRecord, Status};
use source::PeriodLoader;

#[derive(Parser)]
#[command(name = "player-demand-tracker")]
#[command(about = "Search demand tracker and opportunity scorer for football players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine one or more period snapshots into a single record table
    Combine {
        /// Directory holding <period>.csv snapshot files
        #[arg(long)]
        data: PathBuf,
        #[arg(long = "period", required = true)]
        periods: Vec<String>,
        /// Keep only signed or unsigned rows
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rank players by opportunity score
    Score {
        /// Player reference document (JSON with a `players` list)
        #[arg(long)]
        profiles: PathBuf,
        /// Directory holding <period>.csv snapshot files for search volume
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long = "period")]
        periods: Vec<String>,
        /// Score a single player instead of ranking everyone
        #[arg(long)]
        player: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a per-player rollup CSV
    Summary {
        #[arg(long)]
        data: PathBuf,
        #[arg(long = "period", required = true)]
        periods: Vec<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "player_summary.csv")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        data: PathBuf,
        #[arg(long = "period", required = true)]
        periods: Vec<String>,
        /// Include opportunity scores from this reference document
        #[arg(long)]
        profiles: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Combine {
            data,
            periods,
            status,
            out,
        } => {
            let records = load_combined(&data, &periods)?;
            let records = apply_status_filter(records, status.as_deref())?;

            if records.is_empty() {
                println!("No data for the requested periods.");
                return Ok(());
            }

            let total_volume: f64 = records.iter().map(|r| r.volume).sum();
            println!(
                "Combined {} rows for {} (total search volume {:.0}).",
                records.len(),
                records[0].period,
                total_volume
            );

            if let Some(out) = out {
                let file = File::create(&out)
                    .with_context(|| format!("failed to create {}", out.display()))?;
                export::write_records(file, &records)?;
                println!("Records written to {}.", out.display());
            }
        }
        Commands::Score {
            profiles,
            data,
            periods,
            player,
            limit,
            out,
        } => {
            let book = source::load_profiles(&profiles)
                .with_context(|| format!("failed to load profiles from {}", profiles.display()))?;

            let volumes = match data {
                Some(data) if !periods.is_empty() => {
                    player_volumes(&load_combined(&data, &periods)?)
                }
                _ => HashMap::new(),
            };

            if let Some(name) = player {
                let scored = score_single(&book, &name, &volumes);
                print_score_detail(&scored);
                if let Some(out) = out {
                    let file = File::create(&out)
                        .with_context(|| format!("failed to create {}", out.display()))?;
                    export::write_scores(file, &[scored])?;
                    println!("Score written to {}.", out.display());
                }
                return Ok(());
            }

            let scores = score::rank_players(&book, &volumes);
            if scores.is_empty() {
                println!("No profiles to score.");
                return Ok(());
            }

            println!("Top players by opportunity score:");
            for scored in scores.iter().take(limit) {
                let volume = match scored.search_volume {
                    Some(v) => format!("{v:.0} searches"),
                    None => "no search data".to_string(),
                };
                println!(
                    "- {} score {:.2} ({})",
                    scored.name, scored.breakdown.total, volume
                );
            }

            if let Some(out) = out {
                let file = File::create(&out)
                    .with_context(|| format!("failed to create {}", out.display()))?;
                export::write_scores(file, &scores)?;
                println!("Scores written to {}.", out.display());
            }
        }
        Commands::Summary {
            data,
            periods,
            status,
            out,
        } => {
            let records = load_combined(&data, &periods)?;
            let records = apply_status_filter(records, status.as_deref())?;
            let summaries = report::summarize_players(&records);

            if summaries.is_empty() {
                println!("No data for the requested periods.");
                return Ok(());
            }

            let file =
                File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
            export::write_player_summary(file, &summaries)?;
            println!(
                "Summary for {} players written to {}.",
                summaries.len(),
                out.display()
            );
        }
        Commands::Report {
            data,
            periods,
            profiles,
            out,
        } => {
            let records = load_combined(&data, &periods)?;

            let scores = match profiles {
                Some(path) => {
                    let book = source::load_profiles(&path).with_context(|| {
                        format!("failed to load profiles from {}", path.display())
                    })?;
                    Some(score::rank_players(&book, &player_volumes(&records)))
                }
                None => None,
            };

            let label = periods.join(", ");
            let generated_on = chrono::Utc::now().date_naive();
            let document =
                report::build_report(&label, generated_on, &records, scores.as_deref());
            std::fs::write(&out, document)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn load_combined(data: &Path, periods: &[String]) -> anyhow::Result<Vec<SearchRecord>> {
    let mut loader = PeriodLoader::new(data);
    let by_period = loader
        .load_available(periods)
        .context("failed to load period snapshots")?;
    Ok(aggregate::combine_periods(&by_period, periods))
}

fn apply_status_filter(
    records: Vec<SearchRecord>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<SearchRecord>> {
    let wanted = match filter.map(|f| f.trim().to_lowercase()).as_deref() {
        None | Some("all") => return Ok(records),
        Some("signed") => Status::Signed,
        Some("unsigned") => Status::Unsigned,
        Some(other) => bail!("unknown status filter: {other} (expected signed, unsigned or all)"),
    };
    Ok(records.into_iter().filter(|r| r.status == wanted).collect())
}

fn player_volumes(records: &[SearchRecord]) -> HashMap<String, f64> {
    let mut volumes = HashMap::new();
    for record in records {
        *volumes.entry(record.player.clone()).or_insert(0.0) += record.volume;
    }
    volumes
}

fn score_single(
    book: &profiles::ProfileBook,
    name: &str,
    volumes: &HashMap<String, f64>,
) -> PlayerScore {
    match book.resolve(name) {
        Some((profile, stage)) => {
            let matched = score::volume_for(&profile.name, volumes);
            let breakdown =
                score::opportunity_score(profile, matched.as_ref().map(|(_, v, _)| *v));
            println!("Profile match for \"{name}\": {} ({stage})", profile.name);
            PlayerScore {
                name: profile.name.clone(),
                matched_player: matched.as_ref().map(|(key, _, _)| key.to_string()),
                match_stage: matched.as_ref().map(|(_, _, stage)| *stage),
                search_volume: matched.as_ref().map(|(_, v, _)| *v),
                breakdown,
            }
        }
        None => {
            warn!("no profile found for {name}, scoring with defaults");
            let fallback = PlayerProfile {
                name: name.to_string(),
                ..PlayerProfile::default()
            };
            let matched = score::volume_for(name, volumes);
            let breakdown =
                score::opportunity_score(&fallback, matched.as_ref().map(|(_, v, _)| *v));
            PlayerScore {
                name: name.to_string(),
                matched_player: matched.as_ref().map(|(key, _, _)| key.to_string()),
                match_stage: matched.as_ref().map(|(_, _, stage)| *stage),
                search_volume: matched.as_ref().map(|(_, v, _)| *v),
                breakdown,
            }
        }
    }
}

fn print_score_detail(scored: &PlayerScore) {
    let breakdown = &scored.breakdown;
    println!("{} score {:.2}", scored.name, breakdown.total);
    println!(
        "  search {:.1} | social {:.1} | team {:.1} | previous {:.1} | nationality {:.1}",
        breakdown.search,
        breakdown.social,
        breakdown.current_team,
        breakdown.previous_teams,
        breakdown.nationality
    );
    println!(
        "  trophies {:.1} | sport {:.1} | position {:.1} | age {:.1}",
        breakdown.trophies, breakdown.sport, breakdown.position, breakdown.age
    );
    match (&scored.matched_player, scored.match_stage) {
        (Some(player), Some(stage)) => {
            println!(
                "  search volume {:.0} from \"{player}\" ({stage} match)",
                scored.search_volume.unwrap_or(0.0)
            );
        }
        _ => println!("  no search volume matched"),
    }
}
