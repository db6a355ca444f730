//! CSV roster loader.
//!
//! # CSV format
//!
//! One row per agent.  Only `name` and `kind` are required; every other
//! column may be omitted from the header and takes its default.
//!
//! ```csv
//! id,name,kind,realm,location,age,gender,alignment,strength,agility,speed,health,perception,reaction,feed,fight
//! 0,Ada,person,0,3,31,female,lawful_good,12,11,10,14,13,12,0.3,0.2
//! 1,wolf,animal,0,4,3,,chaotic_neutral,9,14,15,10,15,16,0.9,0.7
//! ```
//!
//! Relationship columns (`partners`, `siblings`, `dependents`, `social_ring`,
//! `owned_locations`) hold `;`-separated ids.  A row that carries all five
//! OCEAN columns gets a [`Personality`]; people without them get the neutral
//! default.  Rows without an `id` are numbered by the builder.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wsim_core::{AgentId, Alignment, LocationId, RealmId};

use crate::{
    Agent, AgentError, AgentKind, AgentResult, AgentState, AgentStore,
    AgentStoreBuilder, Circumstances, Gender, Instincts, Personality, Statistics,
};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct RosterRecord {
    id:        Option<u32>,
    name:      String,
    kind:      String,
    realm:     u32,
    location:  Option<u32>,
    age:       u32,
    gender:    String,
    alignment: String,

    strength:         i32,
    endurance:        i32,
    dexterity:        i32,
    agility:          i32,
    speed:            i32,
    mental_strength:  i32,
    mental_endurance: i32,
    intelligence:     i32,
    wisdom:           i32,
    charisma:         i32,
    creativity:       i32,
    spirituality:     i32,
    health:           i32,
    maximum_health:   i32,
    reaction:         i32,
    perception:       i32,
    willpower:        i32,
    magic:            i32,
    science:          i32,
    luck:             i32,

    fight:   f64,
    flight:  f64,
    feed:    f64,
    drink:   f64,
    protect: f64,
    herd:    f64,
    mate:    f64,
    sleep:   f64,

    openness:          Option<f64>,
    conscientiousness: Option<f64>,
    extraversion:      Option<f64>,
    agreeableness:     Option<f64>,
    neuroticism:       Option<f64>,
    machiavellianism:  f64,
    narcissism:        f64,
    psychopathy:       f64,

    apparel:         u32,
    food:            u32,
    water:           u32,
    items:           u32,
    toxins:          u32,
    home:            Option<u32>,
    owned_locations: String,
    partners:        String,
    siblings:        String,
    dependents:      String,
    social_ring:     String,
    divorced:        bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a roster from a CSV file into a store.
pub fn load_roster_csv(path: &Path) -> AgentResult<AgentStore> {
    let file = std::fs::File::open(path).map_err(AgentError::Io)?;
    load_roster_reader(file)
}

/// Like [`load_roster_csv`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> AgentResult<AgentStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = AgentStoreBuilder::new();

    for (line, result) in csv_reader.deserialize::<RosterRecord>().enumerate() {
        let row = result.map_err(|e| AgentError::Parse(e.to_string()))?;
        let agent = to_agent(row).map_err(|e| match e {
            AgentError::Parse(msg) => AgentError::Parse(format!("row {}: {msg}", line + 1)),
            other => other,
        })?;
        builder = builder.agent(agent);
    }

    let store = builder.build()?;
    tracing::info!(agents = store.len(), "roster loaded");
    Ok(store)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_agent(r: RosterRecord) -> AgentResult<Agent> {
    if r.name.trim().is_empty() {
        return Err(AgentError::Parse("missing name".into()));
    }
    let kind: AgentKind = r.kind.parse()?;
    let alignment = if r.alignment.trim().is_empty() {
        Alignment::Neutral
    } else {
        r.alignment
            .parse::<Alignment>()
            .map_err(|e| AgentError::Parse(e.to_string()))?
    };

    let personality = match (r.openness, r.conscientiousness, r.extraversion, r.agreeableness, r.neuroticism) {
        (Some(o), Some(c), Some(e), Some(a), Some(n)) => Some(Personality {
            openness:          o,
            conscientiousness: c,
            extraversion:      e,
            agreeableness:     a,
            neuroticism:       n,
            machiavellianism:  r.machiavellianism,
            narcissism:        r.narcissism,
            psychopathy:       r.psychopathy,
        }),
        _ if kind == AgentKind::Person => Some(Personality {
            machiavellianism: r.machiavellianism,
            narcissism:       r.narcissism,
            psychopathy:      r.psychopathy,
            ..Personality::default()
        }),
        _ => None,
    };

    Ok(Agent {
        id:        r.id.map(AgentId).unwrap_or(AgentId::INVALID),
        name:      r.name,
        kind,
        realm:     RealmId(r.realm),
        age:       r.age,
        gender:    r.gender.parse::<Gender>()?,
        alignment,
        statistics: Statistics {
            strength:         r.strength,
            endurance:        r.endurance,
            dexterity:        r.dexterity,
            agility:          r.agility,
            speed:            r.speed,
            mental_strength:  r.mental_strength,
            mental_endurance: r.mental_endurance,
            intelligence:     r.intelligence,
            wisdom:           r.wisdom,
            charisma:         r.charisma,
            creativity:       r.creativity,
            spirituality:     r.spirituality,
            health:           r.health,
            maximum_health:   r.maximum_health,
            reaction:         r.reaction,
            perception:       r.perception,
            willpower:        r.willpower,
            magic:            r.magic,
            science:          r.science,
            luck:             r.luck,
        },
        state: AgentState {
            location: r.location.map(LocationId),
            ..AgentState::default()
        },
        instincts: Instincts {
            fight:   r.fight,
            flight:  r.flight,
            feed:    r.feed,
            drink:   r.drink,
            protect: r.protect,
            herd:    r.herd,
            mate:    r.mate,
            sleep:   r.sleep,
        },
        personality,
        circumstances: Circumstances {
            apparel:         r.apparel,
            food:            r.food,
            water:           r.water,
            items:           r.items.max(r.food + r.water),
            toxins:          r.toxins,
            home:            r.home.map(LocationId),
            owned_locations: parse_ids(&r.owned_locations)?.into_iter().map(LocationId).collect(),
            partners:        parse_ids(&r.partners)?.into_iter().map(AgentId).collect(),
            siblings:        parse_ids(&r.siblings)?.into_iter().map(AgentId).collect(),
            dependents:      parse_ids(&r.dependents)?.into_iter().map(AgentId).collect(),
            social_ring:     parse_ids(&r.social_ring)?.into_iter().map(AgentId).collect(),
            divorced:        r.divorced,
        },
    })
}

fn parse_ids(s: &str) -> AgentResult<Vec<u32>> {
    s.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u32>()
                .map_err(|_| AgentError::Parse(format!("invalid id {t:?} in list {s:?}")))
        })
        .collect()
}
