use mcpuzzles::{boxes, doors, family};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let mut rng = StdRng::from_entropy();

    // The two-child paradox, both questions over one batch of families
    let (given_girl, given_julie) = family::run_trials(&mut rng, family::JULIE_TRIALS);
    println!(
        "Two-child paradox, {} families generated:",
        family::JULIE_TRIALS
    );
    println!(
        "  P(both girls | at least one girl)   = {:.4}  ({} of {})",
        given_girl.probability()?,
        given_girl.matching(),
        given_girl.qualifying()
    );
    println!(
        "  P(both girls | a girl named Julie)  = {:.4}  ({} of {})",
        given_julie.probability()?,
        given_julie.matching(),
        given_julie.qualifying()
    );

    // The 100-box game with the cycle-chasing strategy
    let stats = boxes::run_trials(&mut rng, boxes::GAME_TRIALS)?;
    println!(
        "Box game, {} rooms of {} boxes, {} opens per person:",
        boxes::GAME_TRIALS,
        boxes::BOX_COUNT,
        boxes::OPEN_LIMIT
    );
    println!(
        "  whole group succeeded in {} games    = {:.2}%",
        stats.all_found(),
        stats.all_found_ratio()? * 100.0
    );
    println!(
        "  individual success rate              = {:.2}%",
        stats.mean_winner_ratio()? * 100.0
    );

    // The three-door game with the always-switch player
    let stats = doors::run_trials(&mut rng, doors::DEAL_TRIALS);
    println!(
        "Door game, {} rounds with the switching player:",
        doors::DEAL_TRIALS
    );
    println!(
        "  won {} rounds, {} faults             = {:.2}%",
        stats.wins(),
        stats.faults(),
        stats.win_ratio()? * 100.0
    );
    println!(
        "  opening pick was already the car in {} rounds = {:.2}%",
        stats.chosen_wins(),
        stats.chosen_wins() as f64 * 100.0 / stats.rounds() as f64
    );

    Ok(())
}
