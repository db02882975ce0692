//! Automated playtester - runs a headless snake game against the skill engine
//!
//! Simulates the host loop: food events, skill offers, activations, per-tick
//! effect dispatch and rewinds, then reports how the run went.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use serpent_skills::core::{load_config, EngineConfig, Millis};
use serpent_skills::manager::SkillEffects;
use serpent_skills::session::{AwardOutcome, GameSession};
use serpent_skills::skills::SkillKind;

/// Milliseconds per simulated host tick
const TICK_MS: Millis = 100;

/// Base points per food item
const FOOD_POINTS: u32 = 10;

/// Headless playtest of the skill progression engine
#[derive(Parser, Debug)]
#[command(name = "playtest")]
#[command(about = "Simulate a snake run and report skill progression")]
struct Args {
    /// Engine config TOML (defaults used when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before the run is abandoned
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Chance per tick of eating food
    #[arg(long, default_value_t = 0.08)]
    food_chance: f64,

    /// Chance per tick of hitting something
    #[arg(long, default_value_t = 0.0015)]
    crash_chance: f64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// Host-side state the snapshots carry
#[derive(Debug, Clone, Copy, PartialEq)]
struct SnakeBody {
    length: u32,
}

/// Effect toggles, re-derived from the engine every tick
#[derive(Debug, Default)]
struct HeadlessEffects {
    score_multiplier: f64,
    speed_multiplier: f64,
    shield: bool,
    steel_body: bool,
    ghost: bool,
    second_chance: bool,
    wall_phasing: bool,
    lucky_star: bool,
    time_rewind: bool,
    length_delta: i64,
}

impl HeadlessEffects {
    fn begin_tick(&mut self) {
        *self = Self {
            score_multiplier: 1.0,
            speed_multiplier: 1.0,
            length_delta: self.length_delta,
            ..Self::default()
        };
    }

    fn survives_crash(&self) -> bool {
        self.shield || self.steel_body || self.ghost || self.second_chance || self.wall_phasing
    }
}

impl SkillEffects for HeadlessEffects {
    fn apply_speed_multiplier(&mut self, multiplier: f64) {
        self.speed_multiplier *= multiplier;
    }
    fn enable_wall_phasing(&mut self) {
        self.wall_phasing = true;
    }
    fn enable_food_magnet(&mut self, _radius: u32) {}
    fn enable_lucky_star(&mut self) {
        self.lucky_star = true;
    }
    fn apply_score_multiplier(&mut self, multiplier: f64) {
        self.score_multiplier *= multiplier;
    }
    fn enable_score_frenzy(&mut self) {}
    fn enable_basic_shield(&mut self) {
        self.shield = true;
    }
    fn enable_steel_body(&mut self) {
        self.steel_body = true;
    }
    fn enable_ghost_mode(&mut self) {
        self.ghost = true;
    }
    fn enable_second_chance(&mut self) {
        self.second_chance = true;
    }
    fn shrink_snake(&mut self) {
        self.length_delta -= 1;
    }
    fn grow_snake(&mut self) {
        self.length_delta += 1;
    }
    fn enable_time_rewind(&mut self) {
        self.time_rewind = true;
    }
    fn enable_world_shrink(&mut self) {}
    fn expand_skill_slots(&mut self) {}
}

/// JSON output structure
#[derive(Serialize)]
struct PlaytestReport {
    seed: u64,
    outcome: String,
    ticks: u64,
    score: u32,
    foods: u32,
    skills_earned: u32,
    skills_declined: u32,
    duplicates: u32,
    conflicts: u32,
    rewinds: u32,
    final_length: u32,
    active_skills: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            eprintln!("Using default config");
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    let mut session: GameSession<SnakeBody> = match GameSession::with_seed(config, seed) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting playtest with seed {}", seed);

    let mut effects = HeadlessEffects::default();
    let mut body = SnakeBody { length: 3 };
    let mut report = PlaytestReport {
        seed,
        outcome: "abandoned".to_string(),
        ticks: 0,
        score: 0,
        foods: 0,
        skills_earned: 0,
        skills_declined: 0,
        duplicates: 0,
        conflicts: 0,
        rewinds: 0,
        final_length: 0,
        active_skills: Vec::new(),
    };

    session.start(0);

    for tick in 0..args.max_ticks {
        let now = tick * TICK_MS;
        report.ticks = tick + 1;

        // Expire, then re-derive toggles for this tick
        effects.begin_tick();
        session.tick(now, &mut effects);
        // Size requests are honoured once, at activation
        effects.length_delta = 0;

        if rng.gen::<f64>() < args.crash_chance {
            if effects.survives_crash() {
                tracing::debug!("Crash absorbed at tick {}", tick);
            } else {
                session.end_with_loss(now);
                report.outcome = "lost".to_string();
                break;
            }
        }

        // A slower snake reaches food less often; lucky star spawns extra food
        let mut food_chance = args.food_chance * effects.speed_multiplier;
        if effects.lucky_star {
            food_chance *= 1.25;
        }
        if rng.gen::<f64>() >= food_chance {
            continue;
        }

        report.foods += 1;
        body.length += 1;
        let base = (FOOD_POINTS as f64 * effects.score_multiplier) as u32;
        let outcome = session.on_food_eaten(base, now);

        if outcome.won {
            report.outcome = "won".to_string();
            break;
        }

        match outcome.award {
            AwardOutcome::Offered(kind) => {
                // Take anything that doesn't shrink us when we're already short
                if kind == SkillKind::BodySplit && body.length < 6 {
                    session.decline_offer();
                    report.skills_declined += 1;
                } else if let Some(id) = session.accept_offer(now) {
                    let activation = session.activate(id, now, &mut effects);
                    apply_length_delta(&mut body, &mut effects);
                    if activation.displaced.is_some() {
                        report.conflicts += 1;
                    }
                }
            }
            AwardOutcome::DuplicateConverted { .. } => report.duplicates += 1,
            AwardOutcome::Nothing | AwardOutcome::CatalogExhausted => {}
        }

        if outcome.rewind_due {
            if let Some(restored) = session.try_rewind(now) {
                body = restored;
                report.rewinds += 1;
            }
        }

        if effects.time_rewind && report.foods % 3 == 0 {
            session.take_snapshot(body, now);
        }
    }

    let state = session.state();
    report.score = state.score();
    report.skills_earned = state.skills_earned();
    report.final_length = body.length;
    report.active_skills = state
        .active_skills()
        .map(|s| s.kind.name().to_string())
        .collect();

    if args.format == "json" {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    println!("=== Serpent Skills Playtest ===\n");
    println!("Seed:            {}", report.seed);
    println!("Outcome:         {} after {} ticks", report.outcome, report.ticks);
    println!("Score:           {}", report.score);
    println!("Food eaten:      {}", report.foods);
    println!("Skills earned:   {} ({} declined)", report.skills_earned, report.skills_declined);
    println!("Duplicates:      {}", report.duplicates);
    println!("Conflicts:       {}", report.conflicts);
    println!("Rewinds:         {}", report.rewinds);
    println!("Snake length:    {}", report.final_length);
    println!("Active skills:   {}", report.active_skills.join(", "));

    println!("\nRecent notifications:");
    for note in session.notifications().recent() {
        println!("  [{:>6}ms] {}", note.at_ms, note.message);
    }
}

fn apply_length_delta(body: &mut SnakeBody, effects: &mut HeadlessEffects) {
    let length = body.length as i64 + effects.length_delta;
    body.length = length.max(1) as u32;
    effects.length_delta = 0;
}
