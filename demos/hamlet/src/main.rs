//! hamlet: smallest demo for the wsim world engine.
//!
//! Six villagers and two animals share a 3 × 2 patch of land.  Every round
//! the villagers' unmet needs are turned into actions, threats from the
//! animals are weighed against them, and the Overwatch runs everything to
//! completion.  Actions and interactions are journaled to
//! `output/hamlet/world.csv`.
//!
//! Pass a TOML file as the first argument to override the scheduler
//! settings; `RUST_LOG=debug` shows every step.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use wsim_action::{ActionResult, GameObserver, Interaction};
use wsim_agent::{AgentStore, load_roster_reader};
use wsim_core::{AgentId, InteractionId, LocationId, RealmId, TimeBox, TimeBoxId};
use wsim_overwatch::{OverwatchBuilder, OverwatchConfig};
use wsim_spatial::{Geography, GeographyBuilder};
use wsim_store::{JournalStore, Query, RecordStore};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64   = 42;
const ROUNDS:      usize = 6;
const VALLEY:      RealmId = RealmId(0);
const SECS_PER_PASS: i64 = 900; // four passes to the hour

// ── Roster ────────────────────────────────────────────────────────────────────

// Cells, row-major: 0 1 2 (village) / 3 4 5 (woods).
const ROSTER_CSV: &str = "\
id,name,kind,realm,location,age,gender,alignment,strength,agility,speed,health,perception,reaction,feed,fight\n\
0,Ada,person,0,0,31,female,lawful_good,12,11,10,14,13,12,0.3,0.2\n\
1,Bo,person,0,0,44,male,neutral_good,14,9,9,15,10,11,0.3,0.3\n\
2,Cyn,person,0,1,19,female,chaotic_good,9,14,13,11,15,14,0.3,0.1\n\
3,Dag,person,0,1,52,male,lawful_neutral,13,8,8,12,9,10,0.3,0.4\n\
4,Edda,person,0,2,27,female,neutral,10,12,11,13,12,13,0.3,0.2\n\
5,Finn,person,0,2,8,male,neutral_good,6,13,12,10,14,15,0.2,0.1\n\
6,wolf,animal,0,4,3,,chaotic_neutral,9,14,15,10,15,16,0.9,0.7\n\
7,boar,animal,0,3,5,,neutral,15,9,10,16,8,9,0.6,0.8\n\
";

fn valley() -> Geography {
    let mut b = GeographyBuilder::new();
    b.grid(VALLEY, 3, 2, 250.0, 180_000);
    b.build()
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs what happens and keeps a few counters for the closing table.
#[derive(Default)]
struct Chronicle {
    completed: usize,
    failed:    usize,
    threats:   usize,
    fights:    usize,
    hours:     usize,
}

impl GameObserver for Chronicle {
    fn on_action_complete(&mut self, action: &ActionResult) {
        self.completed += 1;
        tracing::info!(actor = %action.actor, action = %action.action, outcome = ?action.outcome, "done");
    }

    fn on_action_error(&mut self, action: &ActionResult, error: &str) {
        self.failed += 1;
        tracing::warn!(actor = %action.actor, action = %action.action, error, "gave up");
    }

    fn on_threat_detected(&mut self, _agent: AgentId, threat: &Interaction) {
        self.threats += 1;
        tracing::info!("{}", threat.description);
    }

    fn on_threat_removed(&mut self, agent: AgentId, threat: InteractionId) {
        tracing::debug!(%agent, %threat, "threat over");
    }

    fn on_npc_moved(&mut self, agent: AgentId, _from: Option<LocationId>, to: LocationId) {
        tracing::debug!(%agent, %to, "moved");
    }

    fn on_interaction_end(&mut self, interaction: &Interaction) {
        self.fights += 1;
        tracing::info!(outcome = ?interaction.actor.outcome, "{}", interaction.description);
    }

    fn on_increment_end(&mut self, realm: RealmId, ended: &TimeBox) {
        self.hours += 1;
        tracing::info!(%realm, hour = %ended.name, "hour over");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // 1. Settings.
    let config = match std::env::args().nth(1) {
        Some(path) => OverwatchConfig::from_file(Path::new(&path))?,
        None => OverwatchConfig { seed: SEED, seconds_per_iteration: SECS_PER_PASS, ..OverwatchConfig::default() },
    };
    println!("=== hamlet: wsim world engine ===");
    println!("Rounds: {ROUNDS}  |  Seed: {}  |  {} s per pass", config.seed, config.seconds_per_iteration);

    // 2. World.
    let agents = load_roster_reader(Cursor::new(ROSTER_CSV))?;
    let people = villagers(&agents);
    let geography = valley();
    println!("Valley: {} cells  |  {} villagers, {} animals", geography.cell_count(), people.len(), agents.animals().count());

    // 3. Scheduler, journaling to disk.
    let out = PathBuf::from("output/hamlet");
    std::fs::create_dir_all(&out)?;
    let journal = out.join("world.csv");
    if journal.exists() {
        std::fs::remove_file(&journal)?;
    }
    let mut overwatch = OverwatchBuilder::new(config, agents, geography)
        .increment(VALLEY, TimeBox::hour(TimeBoxId(1), 0))
        .store(JournalStore::open(&journal)?)
        .build()?;

    // 4. Rounds: recommend, submit, process.
    let mut chronicle = Chronicle::default();
    let t0 = Instant::now();
    println!();
    println!("{:<6} {:>9} {:>7} {:>10} {:>8}", "Round", "Submitted", "Passes", "Rolled out", "Clock");
    println!("{}", "-".repeat(44));
    for round in 1..=ROUNDS {
        let backlog = overwatch.recommend(VALLEY, &people, &mut chronicle)?;
        let submitted = overwatch.submit_all(backlog.into_iter().filter(|a| a.is_assigned())).len();
        let summary = overwatch.process(&mut chronicle)?;
        println!(
            "{:<6} {:>9} {:>7} {:>10} {:>8}",
            round, submitted, summary.passes, summary.rolled_out, overwatch.now()
        );
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    let stored = overwatch.store().count(&Query::new("action"))?;
    let interactions = overwatch.store().count(&Query::new("interaction"))?;
    println!();
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  actions completed : {}", chronicle.completed);
    println!("  actions dropped   : {}", chronicle.failed);
    println!("  threats noticed   : {}", chronicle.threats);
    println!("  fights settled    : {}", chronicle.fights);
    println!("  hours passed      : {}", chronicle.hours);
    println!("  {} : {stored} actions, {interactions} interactions", journal.display());

    println!();
    println!("{:<8} {:>6} {:>5} {:>5} {:>6}", "Agent", "Health", "Food", "Water", "Home");
    println!("{}", "-".repeat(34));
    for agent in overwatch.agents().iter() {
        let c = &agent.circumstances;
        println!(
            "{:<8} {:>6.2} {:>5} {:>5} {:>6}",
            agent.name,
            agent.state.health,
            c.food,
            c.water,
            c.home.map_or_else(|| "-".to_owned(), |h| h.0.to_string()),
        );
    }

    Ok(())
}

fn villagers(agents: &AgentStore) -> Vec<AgentId> {
    agents.people().map(|a| a.id).collect()
}
