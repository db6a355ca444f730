//! Spot the agents that pose an immediate threat to each member of a group.
//!
//! For every evaluated agent the sources are the live animals within
//! `threat_hops` cells and every other live person within the same radius.
//! Each source is classified by its [`Hazard`]:
//!
//! - **Aggressive** when one of its instincts, weakened by distance,
//!   reaches its threshold and it notices the agent.
//! - **Toxic** otherwise, when it carries a toxin and shares the agent's
//!   cell.  A toxic source is its plain threat kind without any roll.
//!
//! An aggressive source's reaction roll then decides what it becomes to the
//! agent:
//!
//! | Reaction roll         | Result                                          |
//! |-----------------------|-------------------------------------------------|
//! | catastrophic failure  | the target kind: the source exposed itself      |
//! | natural success       | `ExistentialThreat`, and the source fixates     |
//! | success               | the threat kind (animal or personal)            |
//! | anything else         | no threat                                       |

use std::sync::Arc;

use wsim_action::{GameObserver, Interaction, InteractionLog, InteractionSide};
use wsim_agent::{Agent, AgentStore, Instinct};
use wsim_core::{
    AgentId, InteractionId, InteractionKind, LocationId, Reason, RealmId, Role, RollSource, ThreatKind, TimeBox,
};
use wsim_profile::{InstinctLevel, Profile, ProfileCache};
use wsim_rules::{RollOutcome, perception_check, reaction_check};
use wsim_spatial::Geography;

use crate::PopulationCache;

/// Fixed priority of a physical confrontation when weighed against the
/// actor's chosen action.
pub const THREAT_PRIORITY: f64 = 0.8;

/// Instinct thresholds that make a source aggressive.
pub const AGGRESSION_THRESHOLDS: [(Instinct, InstinctLevel); 3] = [
    (Instinct::Feed, InstinctLevel::Strong),
    (Instinct::Fight, InstinctLevel::Average),
    (Instinct::Protect, InstinctLevel::Strong),
];

/// Why a source endangers an agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Hazard {
    Aggressive,
    Toxic,
}

/// Read-only world state a threat evaluation looks at.
#[derive(Clone, Copy)]
pub struct ThreatView<'a> {
    pub agents:     &'a AgentStore,
    pub geography:  &'a Geography,
    pub population: &'a PopulationCache,
    pub profiles:   &'a ProfileCache,
}

/// An aggressive source the agent must deal with.
#[derive(Clone, Debug, PartialEq)]
pub struct ImminentThreat {
    pub agent:       AgentId,
    pub source:      AgentId,
    pub kind:        ThreatKind,
    pub hazard:      Hazard,
    pub interaction: InteractionId,
    pub priority:    f64,
    /// Whether the agent's own perception roll noticed the source.
    pub noticed:     bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThreatReport {
    /// `Threaten` interactions recorded this evaluation.
    pub interactions: Vec<InteractionId>,
    pub imminent:     Vec<ImminentThreat>,
}

impl ThreatReport {
    pub fn is_empty(&self) -> bool {
        self.imminent.is_empty()
    }

    /// Highest threat priority facing `agent`, if any.
    pub fn pressure_on(&self, agent: AgentId) -> Option<f64> {
        self.imminent
            .iter()
            .filter(|t| t.agent == agent)
            .map(|t| t.priority)
            .reduce(f64::max)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ThreatEvaluator {
    pub threat_hops:     u32,
    pub threat_priority: f64,
}

impl Default for ThreatEvaluator {
    fn default() -> Self {
        Self { threat_hops: 1, threat_priority: THREAT_PRIORITY }
    }
}

impl ThreatEvaluator {
    pub fn new(threat_hops: u32, threat_priority: f64) -> Self {
        Self { threat_hops, threat_priority }
    }

    /// `1 − hops / (threat_hops + 1)`: full strength in the same cell,
    /// fading towards the edge of the radius.
    pub fn distance_factor(&self, hops: u32) -> f64 {
        1.0 - hops as f64 / (self.threat_hops as f64 + 1.0)
    }

    /// Whether any of `source`'s instincts, scaled by `factor`, meets its
    /// aggression threshold.
    pub fn is_driven(&self, source: &Profile, factor: f64) -> bool {
        AGGRESSION_THRESHOLDS
            .iter()
            .any(|(i, min)| InstinctLevel::from_value(source.instincts.get(*i) * factor) >= *min)
    }

    /// Aggressive when driven at `hops` and `source` passes a perception
    /// check; failing that, toxic when it carries a toxin in the same cell.
    pub fn classify(
        &self,
        rng:     &mut dyn RollSource,
        source:  &Agent,
        profile: &Profile,
        hops:    u32,
    ) -> Option<Hazard> {
        if self.is_driven(profile, self.distance_factor(hops)) && perception_check(rng, source).is_success() {
            Some(Hazard::Aggressive)
        } else if hops == 0 && source.is_toxic() {
            Some(Hazard::Toxic)
        } else {
            None
        }
    }

    /// Evaluate every agent in `profiles` that lives in `realm`.
    ///
    /// Interactions are appended to `log` with the increment's window;
    /// noticed threats are announced through `observer`.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_threats(
        &self,
        realm:     RealmId,
        increment: &TimeBox,
        profiles:  &[Arc<Profile>],
        view:      ThreatView<'_>,
        rng:       &mut dyn RollSource,
        observer:  &mut dyn GameObserver,
        log:       &mut InteractionLog,
    ) -> ThreatReport {
        let mut report = ThreatReport::default();

        for profile in profiles.iter().filter(|p| p.realm == realm) {
            let Some(agent) = view.agents.get(profile.id) else { continue };
            if !agent.state.is_active() {
                continue;
            }
            let Some(here) = agent.location() else {
                tracing::warn!(agent = %agent.id, "no location; skipping threat evaluation");
                continue;
            };

            for (source, hops) in self.sources(agent, here, view) {
                let Some(source_profile) = view.profiles.get(source) else { continue };
                let Some(hazard) = self.classify(rng, source, &source_profile, hops) else { continue };
                let kind = match hazard {
                    Hazard::Aggressive => self.react(rng, source, agent, view.profiles),
                    Hazard::Toxic => threat_of(source),
                };
                if kind.is_none() {
                    continue;
                }

                let interaction = Interaction::new(
                    InteractionKind::Threaten,
                    InteractionSide::new(source.id)
                        .with_alignment(source.alignment)
                        .with_role(Role::Antagonist)
                        .with_reason(if source.is_animal() { Reason::Instinct } else { Reason::None }),
                    InteractionSide::new(agent.id)
                        .with_alignment(agent.alignment)
                        .with_threat(kind)
                        .with_role(Role::Protagonist),
                )
                .during(increment.start, increment.end)
                .describe(format!(
                    "{} is a {}{} to {}",
                    source.name,
                    if hazard == Hazard::Toxic { "toxic " } else { "" },
                    kind.as_str().to_uppercase(),
                    agent.name
                ));
                let id = log.push(interaction);

                let noticed = perception_check(rng, agent).is_success();
                if noticed {
                    if let Some(logged) = log.get(id) {
                        observer.on_threat_detected(agent.id, logged);
                    }
                }
                report.interactions.push(id);
                report.imminent.push(ImminentThreat {
                    agent: agent.id,
                    source: source.id,
                    kind,
                    hazard,
                    interaction: id,
                    priority: self.threat_priority,
                    noticed,
                });
            }
        }

        tracing::debug!(%realm, threats = report.imminent.len(), "threat evaluation done");
        report
    }

    /// Live animals and other live people within range of `agent`, with
    /// their hop distance.
    fn sources<'v>(&self, agent: &Agent, here: LocationId, view: ThreatView<'v>) -> Vec<(&'v Agent, u32)> {
        let mut out: Vec<(&Agent, u32)> = view
            .population
            .animals_near(view.geography, here, self.threat_hops, view.agents)
            .into_iter()
            .filter_map(|(id, hops)| view.agents.get(id).map(|a| (a, hops)))
            .filter(|(a, _)| a.id != agent.id && a.state.alive && a.realm == agent.realm)
            .collect();

        out.extend(view.agents.people().filter_map(|p| {
            if p.id == agent.id || !p.state.alive || p.realm != agent.realm {
                return None;
            }
            let there = p.location()?;
            view.geography
                .hops_between(here, there, self.threat_hops)
                .map(|hops| (p, hops))
        }));
        out
    }

    /// What an aggressive `source` becomes to `agent`.
    fn react(
        &self,
        rng:      &mut dyn RollSource,
        source:   &Agent,
        agent:    &Agent,
        profiles: &ProfileCache,
    ) -> ThreatKind {
        let threat = threat_of(source);
        match reaction_check(rng, source) {
            RollOutcome::CatastrophicFailure => {
                tracing::warn!(source = %source.id, agent = %agent.id, "made itself a target");
                threat.target()
            }
            RollOutcome::NaturalSuccess => {
                tracing::warn!(source = %source.id, agent = %agent.id, "fixated on its target");
                profiles.add_fixation(source.id, agent.id);
                ThreatKind::ExistentialThreat
            }
            RollOutcome::Success => threat,
            RollOutcome::Failure | RollOutcome::InvalidStatistic => ThreatKind::None,
        }
    }
}

fn threat_of(source: &Agent) -> ThreatKind {
    if source.is_animal() { ThreatKind::AnimalThreat } else { ThreatKind::PersonalThreat }
}
