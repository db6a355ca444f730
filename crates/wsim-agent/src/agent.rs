//! Agent records.
//!
//! An [`Agent`] is a plain value: identity, demographics, a 20-point
//! [`Statistics`] block, mutable [`AgentState`], [`Instincts`], an optional
//! [`Personality`] (people only), and [`Circumstances`] describing what the
//! agent owns and who it is connected to.

use std::fmt;
use std::str::FromStr;

use wsim_core::{AgentId, Alignment, LocationId, RealmId};

use crate::AgentError;

// ── Kind / gender ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    #[default]
    Person,
    Animal,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Person => "person",
            AgentKind::Animal => "animal",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "person" => Ok(AgentKind::Person),
            "animal" => Ok(AgentKind::Animal),
            other    => Err(AgentError::Parse(format!("unknown agent kind {other:?}"))),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

impl FromStr for Gender {
    type Err = AgentError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m"   => Ok(Gender::Male),
            "" | "unknown" => Ok(Gender::Unknown),
            other          => Err(AgentError::Parse(format!("unknown gender {other:?}"))),
        }
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Names of the fields of [`Statistics`], for lookups by name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Strength,
    Endurance,
    Dexterity,
    Agility,
    Speed,
    MentalStrength,
    MentalEndurance,
    Intelligence,
    Wisdom,
    Charisma,
    Creativity,
    Spirituality,
    Health,
    MaximumHealth,
    Reaction,
    Perception,
    Willpower,
    Magic,
    Science,
    Luck,
}

impl Stat {
    pub const ALL: [Stat; 20] = [
        Stat::Strength, Stat::Endurance, Stat::Dexterity, Stat::Agility, Stat::Speed,
        Stat::MentalStrength, Stat::MentalEndurance, Stat::Intelligence, Stat::Wisdom,
        Stat::Charisma, Stat::Creativity, Stat::Spirituality, Stat::Health,
        Stat::MaximumHealth, Stat::Reaction, Stat::Perception, Stat::Willpower,
        Stat::Magic, Stat::Science, Stat::Luck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Strength        => "strength",
            Stat::Endurance       => "endurance",
            Stat::Dexterity       => "dexterity",
            Stat::Agility         => "agility",
            Stat::Speed           => "speed",
            Stat::MentalStrength  => "mental_strength",
            Stat::MentalEndurance => "mental_endurance",
            Stat::Intelligence    => "intelligence",
            Stat::Wisdom          => "wisdom",
            Stat::Charisma        => "charisma",
            Stat::Creativity      => "creativity",
            Stat::Spirituality    => "spirituality",
            Stat::Health          => "health",
            Stat::MaximumHealth   => "maximum_health",
            Stat::Reaction        => "reaction",
            Stat::Perception      => "perception",
            Stat::Willpower       => "willpower",
            Stat::Magic           => "magic",
            Stat::Science         => "science",
            Stat::Luck            => "luck",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = AgentError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Stat::ALL
            .iter()
            .copied()
            .find(|stat| stat.as_str() == key)
            .ok_or(AgentError::UnknownStat(key))
    }
}

/// Twenty-point attribute block.  Zero means "not rolled" and is treated as
/// invalid by the roll engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    pub strength:         i32,
    pub endurance:        i32,
    pub dexterity:        i32,
    pub agility:          i32,
    pub speed:            i32,
    pub mental_strength:  i32,
    pub mental_endurance: i32,
    pub intelligence:     i32,
    pub wisdom:           i32,
    pub charisma:         i32,
    pub creativity:       i32,
    pub spirituality:     i32,
    pub health:           i32,
    pub maximum_health:   i32,
    pub reaction:         i32,
    pub perception:       i32,
    pub willpower:        i32,
    pub magic:            i32,
    pub science:          i32,
    pub luck:             i32,
}

impl Statistics {
    /// Every statistic set to `v`.
    pub fn uniform(v: i32) -> Self {
        let mut s = Self::default();
        for stat in Stat::ALL {
            *s.get_mut(stat) = v;
        }
        s
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength        => self.strength,
            Stat::Endurance       => self.endurance,
            Stat::Dexterity       => self.dexterity,
            Stat::Agility         => self.agility,
            Stat::Speed           => self.speed,
            Stat::MentalStrength  => self.mental_strength,
            Stat::MentalEndurance => self.mental_endurance,
            Stat::Intelligence    => self.intelligence,
            Stat::Wisdom          => self.wisdom,
            Stat::Charisma        => self.charisma,
            Stat::Creativity      => self.creativity,
            Stat::Spirituality    => self.spirituality,
            Stat::Health          => self.health,
            Stat::MaximumHealth   => self.maximum_health,
            Stat::Reaction        => self.reaction,
            Stat::Perception      => self.perception,
            Stat::Willpower       => self.willpower,
            Stat::Magic           => self.magic,
            Stat::Science         => self.science,
            Stat::Luck            => self.luck,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Strength        => &mut self.strength,
            Stat::Endurance       => &mut self.endurance,
            Stat::Dexterity       => &mut self.dexterity,
            Stat::Agility         => &mut self.agility,
            Stat::Speed           => &mut self.speed,
            Stat::MentalStrength  => &mut self.mental_strength,
            Stat::MentalEndurance => &mut self.mental_endurance,
            Stat::Intelligence    => &mut self.intelligence,
            Stat::Wisdom          => &mut self.wisdom,
            Stat::Charisma        => &mut self.charisma,
            Stat::Creativity      => &mut self.creativity,
            Stat::Spirituality    => &mut self.spirituality,
            Stat::Health          => &mut self.health,
            Stat::MaximumHealth   => &mut self.maximum_health,
            Stat::Reaction        => &mut self.reaction,
            Stat::Perception      => &mut self.perception,
            Stat::Willpower       => &mut self.willpower,
            Stat::Magic           => &mut self.magic,
            Stat::Science         => &mut self.science,
            Stat::Luck            => &mut self.luck,
        }
    }

    /// Integer mean of the named statistics (0 for an empty list).
    pub fn average(&self, stats: &[Stat]) -> i32 {
        if stats.is_empty() {
            return 0;
        }
        let sum: i32 = stats.iter().map(|s| self.get(*s)).sum();
        sum / stats.len() as i32
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Mutable condition of an agent.  `health` is a fraction in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub health:        f64,
    pub alive:         bool,
    pub awake:         bool,
    pub immobilized:   bool,
    pub incapacitated: bool,
    pub location:      Option<LocationId>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            health:        1.0,
            alive:         true,
            awake:         true,
            immobilized:   false,
            incapacitated: false,
            location:      None,
        }
    }
}

impl AgentState {
    /// Alive, awake, and free to move and act.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && self.awake && !self.immobilized && !self.incapacitated
    }

    /// Cannot move out of the way of anything.
    #[inline]
    pub fn is_helpless(&self) -> bool {
        self.immobilized || self.incapacitated
    }
}

// ── Instincts ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instinct {
    Fight,
    Flight,
    Feed,
    Drink,
    Protect,
    Herd,
    Mate,
    Sleep,
}

/// Instinct strengths in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instincts {
    pub fight:   f64,
    pub flight:  f64,
    pub feed:    f64,
    pub drink:   f64,
    pub protect: f64,
    pub herd:    f64,
    pub mate:    f64,
    pub sleep:   f64,
}

impl Instincts {
    pub fn get(&self, instinct: Instinct) -> f64 {
        match instinct {
            Instinct::Fight   => self.fight,
            Instinct::Flight  => self.flight,
            Instinct::Feed    => self.feed,
            Instinct::Drink   => self.drink,
            Instinct::Protect => self.protect,
            Instinct::Herd    => self.herd,
            Instinct::Mate    => self.mate,
            Instinct::Sleep   => self.sleep,
        }
    }
}

// ── Personality ───────────────────────────────────────────────────────────────

/// Five-factor and dark-triad traits, each in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Personality {
    pub openness:          f64,
    pub conscientiousness: f64,
    pub extraversion:      f64,
    pub agreeableness:     f64,
    pub neuroticism:       f64,

    pub machiavellianism: f64,
    pub narcissism:       f64,
    pub psychopathy:      f64,
}

// ── Circumstances ─────────────────────────────────────────────────────────────

/// Possessions and relationships.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circumstances {
    /// Worn apparel pieces.
    pub apparel: u32,
    /// Food items carried or stored.
    pub food:    u32,
    /// Water items carried or stored.
    pub water:   u32,
    /// All items, food and water included.
    pub items:   u32,
    /// Toxins carried: venom, poison.  Any at all make the agent toxic.
    pub toxins:  u32,

    pub home:            Option<LocationId>,
    pub owned_locations: Vec<LocationId>,

    pub partners:    Vec<AgentId>,
    pub siblings:    Vec<AgentId>,
    pub dependents:  Vec<AgentId>,
    pub social_ring: Vec<AgentId>,
    pub divorced:    bool,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:        AgentId,
    pub name:      String,
    pub kind:      AgentKind,
    pub realm:     RealmId,
    pub age:       u32,
    pub gender:    Gender,
    pub alignment: Alignment,

    pub statistics:    Statistics,
    pub state:         AgentState,
    pub instincts:     Instincts,
    pub personality:   Option<Personality>,
    pub circumstances: Circumstances,
}

impl Agent {
    /// A person with default state and zeroed statistics.  The id is left
    /// `INVALID` for the store builder to assign.
    pub fn person(name: impl Into<String>, realm: RealmId) -> Self {
        Self {
            id:            AgentId::INVALID,
            name:          name.into(),
            kind:          AgentKind::Person,
            realm,
            age:           0,
            gender:        Gender::Unknown,
            alignment:     Alignment::Neutral,
            statistics:    Statistics::default(),
            state:         AgentState::default(),
            instincts:     Instincts::default(),
            personality:   Some(Personality::default()),
            circumstances: Circumstances::default(),
        }
    }

    pub fn animal(name: impl Into<String>, realm: RealmId) -> Self {
        Self {
            kind:        AgentKind::Animal,
            personality: None,
            ..Self::person(name, realm)
        }
    }

    pub fn with_statistics(mut self, statistics: Statistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_instincts(mut self, instincts: Instincts) -> Self {
        self.instincts = instincts;
        self
    }

    pub fn at(mut self, location: LocationId) -> Self {
        self.state.location = Some(location);
        self
    }

    #[inline]
    pub fn is_person(&self) -> bool {
        self.kind == AgentKind::Person
    }

    #[inline]
    pub fn is_animal(&self) -> bool {
        self.kind == AgentKind::Animal
    }

    #[inline]
    pub fn location(&self) -> Option<LocationId> {
        self.state.location
    }

    /// Carries at least one toxin.
    #[inline]
    pub fn is_toxic(&self) -> bool {
        self.circumstances.toxins > 0
    }

    pub fn married(&self) -> bool {
        !self.circumstances.partners.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.circumstances.dependents.is_empty()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
