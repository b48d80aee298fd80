use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::path::Path;

use faceoff::{
    apply_vote, bottom_ranked, compute_stats, import_characters, open_database, read_csv,
    report_character, select_matchup, top_ranked, Character, Config, Filters, ReportOutcome,
    VoteOutcome,
};

const USAGE: &str = "\
usage: faceoff <command>

  import <csv>            load characters (character_id,name,race,bloodline,gender)
  matchup                 pick two characters to compare
  vote <winner> <loser>   record a head-to-head result
  report <character_id>   report a character
  top [limit]             best win ratios
  shame [limit]           most losses
  stats                   population statistics
  version                 print the version";

fn main() -> Result<()> {
    faceoff::init_tracing("warn");

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::load()?;

    match args.first().map(String::as_str) {
        Some("import") => {
            let csv_path = args.get(1).context("import needs a CSV path")?;
            run_import(&config, Path::new(csv_path))
        }
        Some("matchup") => run_matchup(&config),
        Some("vote") => match (args.get(1), args.get(2)) {
            (Some(winner), Some(loser)) => run_vote(&config, winner, loser),
            _ => bail!("vote needs <winner> <loser>\n\n{USAGE}"),
        },
        Some("report") => {
            let id = args.get(1).context("report needs a character id")?;
            run_report(&config, id)
        }
        Some("top") => run_top(&config, parse_limit(args.get(1))?),
        Some("shame") => run_shame(&config, parse_limit(args.get(1))?),
        Some("stats") => run_stats(&config),
        Some("version" | "--version") => {
            println!("faceoff {}", faceoff::VERSION);
            Ok(())
        }
        _ => {
            println!("faceoff {}\n{USAGE}", faceoff::VERSION);
            Ok(())
        }
    }
}

fn parse_limit(arg: Option<&String>) -> Result<Option<usize>> {
    arg.map(|raw| raw.parse::<usize>().with_context(|| format!("invalid limit: {raw}")))
        .transpose()
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("🗄️  Character Import - CSV → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Loading CSV...");
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    let rows = read_csv(file)?;
    println!("✓ Loaded {} characters from CSV", rows.len());

    println!("\n🔧 Opening database...");
    let mut conn = open_database(&config.database_path)?;
    println!("✓ Database ready at {}", config.database_path.display());

    println!("\n💾 Inserting characters...");
    let summary = import_characters(&mut conn, &rows)?;
    println!("✓ Inserted: {} characters", summary.inserted);
    println!("✓ Skipped duplicates: {}", summary.duplicates);

    Ok(())
}

fn run_matchup(config: &Config) -> Result<()> {
    let mut conn = open_database(&config.database_path)?;

    match select_matchup(&mut conn)? {
        Some(matchup) => {
            println!("⚔️  {}", describe(&matchup.first));
            println!("    vs");
            println!("⚔️  {}", describe(&matchup.second));
        }
        None => println!("🔄 Round finished, every character is available again. Try again."),
    }

    Ok(())
}

fn run_vote(config: &Config, winner: &str, loser: &str) -> Result<()> {
    let mut conn = open_database(&config.database_path)?;

    match apply_vote(&mut conn, winner, loser)? {
        VoteOutcome::Recorded => println!("✅ Vote recorded: {winner} beat {loser}"),
        VoteOutcome::AlreadyVoted => println!("⚠️  Matchup already voted this round, nothing changed"),
    }

    Ok(())
}

fn run_report(config: &Config, character_id: &str) -> Result<()> {
    let mut conn = open_database(&config.database_path)?;

    match report_character(&mut conn, character_id)? {
        ReportOutcome::Reported(count) => println!("🚩 {character_id} reported ({count} reports)"),
        ReportOutcome::Deleted => println!("🗑️  {character_id} removed after too many reports"),
    }

    Ok(())
}

fn run_top(config: &Config, limit: Option<usize>) -> Result<()> {
    let conn = open_database(&config.database_path)?;
    let limit = limit.unwrap_or(config.leaderboard_limit);

    println!("🏆 Top {limit}");
    for (rank, character) in top_ranked(&conn, &Filters::new(), Some(limit))?.iter().enumerate() {
        println!(
            "{:>4}. {:<40} {:>5.1}%",
            rank + 1,
            describe(character),
            character.win_ratio() * 100.0
        );
    }

    Ok(())
}

fn run_shame(config: &Config, limit: Option<usize>) -> Result<()> {
    let conn = open_database(&config.database_path)?;
    let limit = limit.unwrap_or(config.leaderboard_limit);

    println!("💀 Hall of Shame");
    for (rank, character) in bottom_ranked(&conn, Some(limit))?.iter().enumerate() {
        println!("{:>4}. {:<40} {:>5} losses", rank + 1, describe(character), character.losses);
    }

    Ok(())
}

fn run_stats(config: &Config) -> Result<()> {
    let mut conn = open_database(&config.database_path)?;
    let stats = compute_stats(&mut conn)?;

    println!("📊 Statistics");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Characters:  {}", stats.total_count);
    println!("Votes cast:  {}", stats.total_votes);
    for (race, count) in &stats.race_counts {
        println!("  {:<10} {}", race.as_str(), count);
    }
    for (gender, count) in &stats.gender_counts {
        println!("  {:<10} {}", gender.as_str(), count);
    }
    if let Some(leader) = &stats.leading_race {
        println!("Leading race:      {} ({})", leader.value, leader.count);
    }
    if let Some(leader) = &stats.leading_bloodline {
        println!("Leading bloodline: {} ({})", leader.value, leader.count);
    }

    Ok(())
}

fn describe(character: &Character) -> String {
    format!(
        "{} [{}] {} {}",
        character.name, character.character_id, character.race, character.bloodline
    )
}
