//! age - command-line driver for age-core
//!
//! Parses decklist exports, evaluates premium access, and closes out events.

use age_core::{
    access::{evaluate_access, parse_timestamp, AccessDecision, ContentItem, PublishedAt},
    decklist::{parse_decklist_export, DecklistView, ParsedDeck},
    logger::{Logger, OutputFormat, VerbosityLevel},
    tournament::{
        close_event, log_closeout, reopen_event, Actor, Event, EventResult, Role, StandingsTable,
    },
    Result,
};
use chrono::{DateTime, Datelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Log line format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl From<LogFormat> for OutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => OutputFormat::Text,
            LogFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "age")]
#[command(about = "AGE site tools - decklists, premium access, event closeout", long_about = None)]
struct Cli {
    /// Verbosity level for log output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', global = true, default_value = "normal")]
    verbosity: VerbosityLevel,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Fabrary decklist exports
    Parse {
        /// Export files ("-" reads stdin)
        #[arg(value_name = "EXPORT", required = true)]
        files: Vec<PathBuf>,

        /// Print the decklist component JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// Check whether a content item is behind the paywall
    Access {
        /// CMS record JSON with accessMode/publishedAt (overrides --mode/--published-at)
        #[arg(long, value_name = "ITEM_JSON")]
        item: Option<PathBuf>,

        /// Access mode (Free, Premium, premium_window)
        #[arg(long)]
        mode: Option<String>,

        /// Publish timestamp (RFC 3339, YYYY-MM-DD, or epoch millis)
        #[arg(long)]
        published_at: Option<String>,

        /// Evaluate as of this instant instead of the current time
        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Close an event and fold its results into the season standings
    Closeout {
        /// Event JSON; rewritten with the completed status
        #[arg(long, value_name = "EVENT_JSON")]
        event: PathBuf,

        /// JSON array of event results
        #[arg(long, value_name = "RESULTS_JSON")]
        results: PathBuf,

        /// Standings JSON array; created if missing, rewritten in place
        #[arg(long, value_name = "STANDINGS_JSON")]
        standings: PathBuf,

        /// Id of the user closing the event
        #[arg(long)]
        actor: String,

        /// Role of the user (admin, tournament_staff, ...)
        #[arg(long)]
        role: Role,

        /// The user is assigned as staff to this event
        #[arg(long)]
        assigned: bool,

        /// Close as of this instant instead of the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// Reopen a completed event (admins only)
    Reopen {
        #[arg(long, value_name = "EVENT_JSON")]
        event: PathBuf,

        #[arg(long)]
        actor: String,

        #[arg(long)]
        role: Role,
    },

    /// Print ranked season standings for a circuit
    Standings {
        #[arg(long, value_name = "STANDINGS_JSON")]
        standings: PathBuf,

        #[arg(long)]
        circuit: String,

        /// Season year (default: current year)
        #[arg(long)]
        season: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = Logger::with_verbosity(cli.verbosity);
    logger.set_output_format(cli.log_format.into());

    match cli.command {
        Commands::Parse { files, json } => run_parse(&logger, &files, json),
        Commands::Access {
            item,
            mode,
            published_at,
            now,
            json,
        } => run_access(&logger, item, mode, published_at, now, json),
        Commands::Closeout {
            event,
            results,
            standings,
            actor,
            role,
            assigned,
            now,
        } => run_closeout(&logger, &event, &results, &standings, actor, role, assigned, now),
        Commands::Reopen { event, actor, role } => run_reopen(&logger, &event, actor, role),
        Commands::Standings {
            standings,
            circuit,
            season,
        } => run_standings(&standings, &circuit, season),
    }
}

fn resolve_now(now: Option<String>) -> Result<DateTime<Utc>> {
    match now {
        Some(value) => parse_timestamp(&value),
        None => Ok(Utc::now()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json + "\n")?;
    Ok(())
}

/// Write `value` to `<path>.tmp`; the caller renames it into place
fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    let staged = PathBuf::from(staged);
    write_json(&staged, value)?;
    Ok(staged)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_parse(logger: &Logger, files: &[PathBuf], json: bool) -> Result<()> {
    // Each export parses independently; order of `files` is kept
    let decks = files
        .par_iter()
        .map(|path| read_input(path).map(|raw| parse_decklist_export(&raw)))
        .collect::<Result<Vec<ParsedDeck>>>()?;

    for (path, deck) in files.iter().zip(&decks) {
        if deck.is_empty() {
            logger.normal(&format!("{}: no decklist found", path.display()));
        } else {
            logger.verbose(&format!(
                "{}: {} arena, {} deck cards",
                path.display(),
                deck.total_arena_cards(),
                deck.total_deck_cards()
            ));
        }
    }

    if json {
        let views: Vec<DecklistView> = decks.into_iter().map(DecklistView::from).collect();
        return match views.as_slice() {
            [single] => print_json(single),
            _ => print_json(&views),
        };
    }

    for (path, deck) in files.iter().zip(&decks) {
        println!("== {} ==", path.display());
        print_deck(deck);
        println!();
    }
    Ok(())
}

fn print_deck(deck: &ParsedDeck) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    println!("Name:   {}", field(&deck.deck_name));
    println!("Hero:   {}", field(&deck.hero));
    println!("Format: {}", field(&deck.format));
    println!("URL:    {}", field(&deck.source_url));

    println!("Arena Cards ({})", deck.total_arena_cards());
    for card in &deck.arena_cards {
        println!("  {card}");
    }
    println!("Deck Cards ({})", deck.total_deck_cards());
    for card in &deck.deck_cards {
        println!("  {card}");
    }
}

fn run_access(
    logger: &Logger,
    item_path: Option<PathBuf>,
    mode: Option<String>,
    published_at: Option<String>,
    now: Option<String>,
    json: bool,
) -> Result<()> {
    let now = resolve_now(now)?;
    let item: Option<ContentItem> = match item_path {
        Some(path) => Some(read_json(&path)?),
        None if mode.is_none() && published_at.is_none() => None,
        None => Some(ContentItem {
            access_mode: mode,
            published_at: published_at.as_deref().map(PublishedAt::parse),
        }),
    };

    if let Some(PublishedAt::Unparseable(raw)) =
        item.as_ref().and_then(|i| i.published_at.as_ref())
    {
        logger.normal(&format!("unparseable publish date '{raw}', treating as missing"));
    }

    let decision = evaluate_access(item.as_ref(), now);
    logger.verbose(&format!("evaluated at {}", now.to_rfc3339()));

    if json {
        return print_json(&decision);
    }
    match decision {
        AccessDecision::Free => println!("free"),
        AccessDecision::Gated {
            unlocks_at: Some(at),
        } => println!("gated until {}", at.to_rfc3339()),
        AccessDecision::Gated { unlocks_at: None } => println!("gated"),
        AccessDecision::Lapsed { since } => println!("free (premium lapsed {})", since.to_rfc3339()),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_closeout(
    logger: &Logger,
    event_path: &Path,
    results_path: &Path,
    standings_path: &Path,
    actor_id: String,
    role: Role,
    assigned: bool,
    now: Option<String>,
) -> Result<()> {
    let now = resolve_now(now)?;
    let mut event: Event = read_json(event_path)?;
    let results: Vec<EventResult> = read_json(results_path)?;
    let mut standings: StandingsTable = if standings_path.exists() {
        read_json(standings_path)?
    } else {
        logger.verbose(&format!(
            "{} not found, starting empty standings",
            standings_path.display()
        ));
        StandingsTable::new()
    };

    let mut actor = Actor::new(actor_id, role);
    if assigned {
        actor = actor.assigned_to(event.id.clone());
    }

    let report = close_event(&mut event, &results, &mut standings, &actor, now)?;

    let staged_standings = stage_json(standings_path, &standings)?;
    let staged_event = match stage_json(event_path, &event) {
        Ok(staged) => staged,
        Err(err) => {
            let _ = std::fs::remove_file(&staged_standings);
            return Err(err);
        }
    };
    // Event first: once it reads completed it cannot be closed again, so a
    // failed standings rename never leads to points being counted twice
    std::fs::rename(&staged_event, event_path)?;
    std::fs::rename(&staged_standings, standings_path)?;

    log_closeout(logger, &report);
    print_json(&report)
}

fn run_reopen(logger: &Logger, event_path: &Path, actor_id: String, role: Role) -> Result<()> {
    let mut event: Event = read_json(event_path)?;
    reopen_event(&mut event, &Actor::new(actor_id, role))?;
    write_json(event_path, &event)?;
    logger.minimal(&format!("Event {} reopened", event.id));
    Ok(())
}

fn run_standings(standings_path: &Path, circuit: &str, season: Option<String>) -> Result<()> {
    let standings: StandingsTable = read_json(standings_path)?;
    let season = season.unwrap_or_else(|| Utc::now().year().to_string());

    println!("=== {circuit} {season} ===");
    for (rank, standing) in standings.ranked(&season, circuit).iter().enumerate() {
        println!(
            "{:>3}. {:<24} {:>4} pts  {} events  {} wins  {} top 4  {} top 8",
            rank + 1,
            standing.player_name,
            standing.total_points,
            standing.events_played,
            standing.first_place_finishes,
            standing.top4_finishes,
            standing.top8_finishes
        );
    }
    Ok(())
}
