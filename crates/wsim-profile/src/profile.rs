//! Per-agent profiles.
//!
//! A [`Profile`] is a snapshot derived from an [`Agent`]: nothing in it is
//! recomputed when the agent changes.  Callers that know an agent changed
//! call [`ProfileCache::update`](crate::ProfileCache::update).

use std::collections::BTreeSet;

use wsim_agent::{Agent, AgentKind, Gender, Instinct, Instincts, Personality, Stat};
use wsim_core::{AgentId, Esteem, Love, Need, Physiological, RealmId, Safety};

use crate::level::{InstinctLevel, StatBands, TraitLevel};

/// Health fraction below which safety needs include [`Safety::Health`].
pub const POOR_HEALTH: f64 = 0.25;

// ── NeedSets ──────────────────────────────────────────────────────────────────

/// Unmet needs, one set per category.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeedSets {
    pub physiological: BTreeSet<Physiological>,
    pub safety:        BTreeSet<Safety>,
    pub love:          BTreeSet<Love>,
    pub esteem:        BTreeSet<Esteem>,
}

impl NeedSets {
    pub fn contains(&self, need: Need) -> bool {
        match need {
            Need::Physiological(n) => self.physiological.contains(&n),
            Need::Safety(n)        => self.safety.contains(&n),
            Need::Love(n)          => self.love.contains(&n),
            Need::Esteem(n)        => self.esteem.contains(&n),
        }
    }

    /// Every unmet need, highest-priority category first.
    pub fn iter(&self) -> impl Iterator<Item = Need> + '_ {
        self.physiological
            .iter()
            .map(|n| Need::from(*n))
            .chain(self.safety.iter().map(|n| Need::from(*n)))
            .chain(self.love.iter().map(|n| Need::from(*n)))
            .chain(self.esteem.iter().map(|n| Need::from(*n)))
    }

    pub fn len(&self) -> usize {
        self.physiological.len() + self.safety.len() + self.love.len() + self.esteem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Derive the unmet needs of a person from its circumstances.
    pub fn derive(agent: &Agent) -> Self {
        let mut needs = NeedSets::default();
        let c = &agent.circumstances;

        if c.apparel == 0 {
            needs.physiological.insert(Physiological::Clothing);
        }
        if c.water == 0 {
            needs.physiological.insert(Physiological::Water);
        }
        if c.food == 0 {
            needs.physiological.insert(Physiological::Food);
        }
        if c.home.is_none() {
            needs.physiological.insert(Physiological::Shelter);
        }

        if c.partners.is_empty() {
            needs.love.insert(Love::Intimacy);
        }
        if c.partners.is_empty() && c.siblings.is_empty() && c.dependents.is_empty() {
            needs.love.insert(Love::Family);
        }
        if c.social_ring.is_empty() {
            needs.love.insert(Love::Friendship);
        }
        if needs.love.is_empty() {
            needs.love.insert(Love::Connection);
        }

        // Security and employment have no inputs yet, so every person lacks them.
        needs.safety.insert(Safety::Security);
        needs.safety.insert(Safety::Employment);
        if c.items == 0 {
            needs.safety.insert(Safety::Resources);
        }
        if c.owned_locations.is_empty() {
            needs.safety.insert(Safety::Property);
        }
        if agent.state.health < POOR_HEALTH {
            needs.safety.insert(Safety::Health);
        }

        needs
    }
}

// ── PersonalityTraits ─────────────────────────────────────────────────────────

/// Bucketed five-factor and dark-triad traits plus their compact keys.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonalityTraits {
    pub open:          TraitLevel,
    pub conscientious: TraitLevel,
    pub extraverted:   TraitLevel,
    pub agreeable:     TraitLevel,
    pub neurotic:      TraitLevel,

    pub machiavellian: TraitLevel,
    pub narcissist:    TraitLevel,
    pub psychopath:    TraitLevel,

    /// Five letters: social/reserved, limbic/calm, organized/unstructured,
    /// accommodating/egocentric, inquisitive/non-curious.
    pub sloan_key:      String,
    /// `M`/`m`, `N`/`n`, `P`/`p`; uppercase when the trait is above 0.5.
    pub dark_triad_key: String,
}

impl PersonalityTraits {
    pub fn from_personality(p: &Personality) -> Self {
        Self {
            open:           TraitLevel::from_value(p.openness),
            conscientious:  TraitLevel::from_value(p.conscientiousness),
            extraverted:    TraitLevel::from_value(p.extraversion),
            agreeable:      TraitLevel::from_value(p.agreeableness),
            neurotic:       TraitLevel::from_value(p.neuroticism),
            machiavellian:  TraitLevel::from_value(p.machiavellianism),
            narcissist:     TraitLevel::from_value(p.narcissism),
            psychopath:     TraitLevel::from_value(p.psychopathy),
            sloan_key:      sloan_key(p),
            dark_triad_key: dark_triad_key(p),
        }
    }
}

fn letter(value: f64, high: char, low: char) -> char {
    if value > 0.5 { high } else { low }
}

pub fn sloan_key(p: &Personality) -> String {
    [
        letter(p.extraversion, 's', 'r'),
        letter(p.neuroticism, 'l', 'c'),
        letter(p.conscientiousness, 'o', 'u'),
        letter(p.agreeableness, 'a', 'e'),
        letter(p.openness, 'i', 'n'),
    ]
    .iter()
    .collect()
}

pub fn dark_triad_key(p: &Personality) -> String {
    [
        letter(p.machiavellianism, 'M', 'm'),
        letter(p.narcissism, 'N', 'n'),
        letter(p.psychopathy, 'P', 'p'),
    ]
    .iter()
    .collect()
}

// ── Profile ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub id:     AgentId,
    pub name:   String,
    pub kind:   AgentKind,
    pub realm:  RealmId,
    pub age:    u32,
    pub gender: Gender,

    pub alive:    bool,
    pub married:  bool,
    pub children: bool,
    pub divorced: bool,

    /// Raw instinct strengths; threat checks scale these by distance.
    pub instincts: Instincts,
    pub stats:     StatBands,
    /// `None` for animals.
    pub personality: Option<PersonalityTraits>,
    pub needs:       NeedSets,
    /// Item count, used for the group's relative wealth.
    pub items:       u32,

    /// Agents this one has become fixated on.  Carried across updates.
    pub fixations: BTreeSet<AgentId>,
}

impl Profile {
    pub fn from_agent(agent: &Agent) -> Self {
        let person = agent.is_person();
        Self {
            id:          agent.id,
            name:        agent.name.clone(),
            kind:        agent.kind,
            realm:       agent.realm,
            age:         agent.age,
            gender:      agent.gender,
            alive:       agent.state.alive,
            married:     agent.married(),
            children:    agent.has_children(),
            divorced:    agent.circumstances.divorced,
            instincts:   agent.instincts.clone(),
            stats:       StatBands::from_statistics(&agent.statistics),
            personality: agent.personality.as_ref().map(PersonalityTraits::from_personality),
            needs:       if person { NeedSets::derive(agent) } else { NeedSets::default() },
            items:       agent.circumstances.items,
            fixations:   BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_person(&self) -> bool {
        self.kind == AgentKind::Person
    }

    pub fn instinct(&self, instinct: Instinct) -> InstinctLevel {
        InstinctLevel::from_value(self.instincts.get(instinct))
    }

    pub fn stat(&self, stat: Stat) -> crate::StatBand {
        self.stats.get(stat)
    }

    pub fn has_need(&self, need: Need) -> bool {
        self.needs.contains(need)
    }
}
