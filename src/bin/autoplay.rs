//! Greedy autoplayer.
//!
//! Usage: `autoplay [seed] [games] [classic]`

use anyhow::{Context, Result};

use block_blast::engine::{autoplay, HighScores, Session};
use block_blast::types::{RuleSet, SessionConfig};

/// Safety cap on placements per game
const MAX_ROUNDS: u32 = 100_000;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let seed: u32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed: {s}"))?,
        None => 1,
    };
    let games: u32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid game count: {s}"))?,
        None => 1,
    };
    let rules = match args.next() {
        Some(s) => RuleSet::from_str(&s).with_context(|| format!("unknown rules: {s}"))?,
        None => RuleSet::Blast,
    };

    let mut session = Session::new(SessionConfig::for_rules(rules, seed))?;
    let mut table = HighScores::default();

    for game in 1..=games {
        if game > 1 {
            session.restart();
        }
        let run = autoplay::play(&mut session, MAX_ROUNDS)?;
        let rank = table.submit(&format!("game-{game}"), run.score);
        println!(
            "[autoplay] game {} ({}): score {}, rounds {}, game over {}{}",
            game,
            rules.as_str(),
            run.score,
            run.rounds,
            run.game_over,
            rank.map(|r| format!(", rank {r}")).unwrap_or_default()
        );
    }

    if let Some(best) = table.best() {
        println!("[autoplay] best: {} with {}", best.name, best.score);
    }
    Ok(())
}
