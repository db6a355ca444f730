//! Unit tests for wsim-action.

#[cfg(test)]
mod helpers {
    use wsim_agent::{Agent, AgentStore, Instincts, Statistics};
    use wsim_core::{AgentId, LocationId, RealmId, ScriptedRolls};
    use wsim_spatial::{Geography, GeographyBuilder};

    use crate::{
        ActionContext, ActionProvider, ActionResult, GameObserver, InteractionLog, ProviderResult,
    };

    #[derive(Default)]
    pub struct Recorder {
        pub moves:       Vec<(AgentId, LocationId)>,
        pub changes:     Vec<(AgentId, String, String)>,
        pub npc_actions: Vec<AgentId>,
    }

    impl GameObserver for Recorder {
        fn on_npc_moved(&mut self, agent: AgentId, _from: Option<LocationId>, to: LocationId) {
            self.moves.push((agent, to));
        }

        fn on_state_changed(&mut self, agent: AgentId, field: &str, value: &str) {
            self.changes.push((agent, field.to_owned(), value.to_owned()));
        }

        fn on_npc_action(&mut self, agent: AgentId, _action: &ActionResult) {
            self.npc_actions.push(agent);
        }
    }

    /// Three cells in a row, one second apart.
    pub struct World {
        pub agents:  AgentStore,
        pub geo:     Geography,
        pub log:     InteractionLog,
        pub spawned: Vec<ActionResult>,
        pub rolls:   ScriptedRolls,
        pub seen:    Recorder,
    }

    impl World {
        pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
            let mut b = GeographyBuilder::new();
            b.grid(RealmId(0), 3, 1, 100.0, 1_000);
            Self {
                agents:  AgentStore::default(),
                geo:     b.build(),
                log:     InteractionLog::new(),
                spawned: Vec::new(),
                rolls:   ScriptedRolls::new(rolls),
                seen:    Recorder::default(),
            }
        }

        pub fn ctx(&mut self) -> ActionContext<'_> {
            ActionContext {
                now:          0,
                increment:    None,
                agents:       &mut self.agents,
                geography:    &self.geo,
                rng:          &mut self.rolls,
                observer:     &mut self.seen,
                interactions: &mut self.log,
                spawned:      &mut self.spawned,
            }
        }

        /// Begin (if pending), execute, and conclude one step.
        pub fn step(&mut self, provider: &dyn ActionProvider, action: &mut ActionResult) -> ProviderResult<bool> {
            action.begin();
            let mut ctx = self.ctx();
            let did = provider.execute(&mut ctx, action)?;
            let actor = action.actor;
            let counterpart = action.target.and_then(|t| t.agent());
            provider.conclude(&mut ctx, action, actor, counterpart)?;
            Ok(did)
        }
    }

    pub fn person(name: &str, cell: u32) -> Agent {
        Agent::person(name, RealmId(0))
            .with_statistics(Statistics::uniform(10))
            .at(LocationId(cell))
    }

    pub fn beast(name: &str, cell: u32, fight: f64) -> Agent {
        Agent::animal(name, RealmId(0))
            .with_statistics(Statistics::uniform(10))
            .with_instincts(Instincts { fight, ..Instincts::default() })
            .at(LocationId(cell))
    }
}

// ── Results and interactions ──────────────────────────────────────────────────

#[cfg(test)]
mod results {
    use wsim_core::{AgentId, Physiological};

    use crate::{ActionOutcome, ActionResult, ActionState};

    #[test]
    fn state_only_moves_forward() {
        let mut a = ActionResult::new("idle").for_actor(AgentId(0));
        assert!(a.begin());
        assert!(!a.begin());
        assert!(a.finish(ActionOutcome::Succeeded));
        assert!(!a.advance(ActionState::InProgress));
        assert_eq!(a.state, ActionState::Complete);
        assert!(!a.is_active());
        assert!(a.succeeded());
    }

    #[test]
    fn builder_clamps_priority() {
        let a = ActionResult::new("gather")
            .with_need(Physiological::Food.into())
            .with_priority(1.7)
            .with_param("quantity", 3);
        assert_eq!(a.priority, 1.0);
        assert_eq!(a.param("quantity"), Some(3));
        assert!(!a.is_assigned());
        assert_eq!(a.state, ActionState::Pending);
    }
}

#[cfg(test)]
mod interactions {
    use wsim_core::{AgentId, InteractionId, InteractionKind, Outcome, Polarity};

    use crate::{Interaction, InteractionLog, InteractionSide};

    fn fight() -> Interaction {
        Interaction::new(
            InteractionKind::Combat,
            InteractionSide::new(AgentId(1)),
            InteractionSide::new(AgentId(2)),
        )
        .during(10, 5)
    }

    #[test]
    fn resolves_once() {
        let mut i = fight();
        assert_eq!(i.end, 10);
        assert_eq!(i.polarity(), Polarity::Negative);
        assert!(i.resolve(Outcome::Favorable, Outcome::Unfavorable));
        assert!(!i.resolve(Outcome::Unfavorable, Outcome::Favorable));
        assert_eq!(i.actor.outcome, Some(Outcome::Favorable));
        assert_eq!(i.counterpart(AgentId(2)), Some(AgentId(1)));
        assert_eq!(i.counterpart(AgentId(3)), None);
    }

    #[test]
    fn log_assigns_sequential_ids() {
        let mut log = InteractionLog::new();
        assert_eq!(log.push(fight()), InteractionId(0));
        assert_eq!(log.push(fight()), InteractionId(1));
        assert_eq!(log.get(InteractionId(1)).map(|i| i.id), Some(InteractionId(1)));
        assert!(log.get(InteractionId::INVALID).is_none());
        assert_eq!(log.involving(AgentId(2)).count(), 2);
        assert_eq!(log.since(1).collect::<Vec<_>>(), vec![InteractionId(1)]);
    }
}

// ── Observer fan-out ──────────────────────────────────────────────────────────

#[cfg(test)]
mod notifier {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{ActionResult, GameObserver, Notifier};

    struct Count(Arc<AtomicUsize>);

    impl GameObserver for Count {
        fn on_action_start(&mut self, _action: &ActionResult) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn add_remove_clear() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut n = Notifier::new();
        assert!(!n.has_handlers());

        let a = n.add_handler(Box::new(Count(Arc::clone(&hits))));
        let _b = n.add_handler(Box::new(Count(Arc::clone(&hits))));
        n.on_action_start(&ActionResult::new("idle"));
        assert_eq!(hits.load(Ordering::Relaxed), 2);

        assert!(n.remove_handler(a).is_some());
        assert!(n.remove_handler(a).is_none());
        n.on_action_start(&ActionResult::new("idle"));
        assert_eq!(hits.load(Ordering::Relaxed), 3);

        n.clear_handlers();
        n.on_action_start(&ActionResult::new("idle"));
        assert_eq!(hits.load(Ordering::Relaxed), 3);
        assert!(n.is_empty());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use wsim_core::{Physiological, Safety};

    use crate::ActionRegistry;
    use crate::providers::IdleProvider;

    #[test]
    fn builtins_are_tagged_by_need() {
        let reg = ActionRegistry::with_builtins();
        assert_eq!(reg.len(), 6);
        assert_eq!(reg.candidates(Physiological::Food.into()), vec!["gather", "hunt"]);
        assert_eq!(reg.candidates(Physiological::Shelter.into()), vec!["build"]);
        assert!(reg.candidates(Safety::Security.into()).is_empty());
        assert!(reg.get("teleport").is_none());
    }

    #[test]
    fn re_register_replaces() {
        let mut reg = ActionRegistry::new();
        assert!(reg.register(IdleProvider).is_none());
        assert!(reg.register(IdleProvider).is_some());
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["idle"]);
    }
}

// ── Built-in providers ────────────────────────────────────────────────────────

#[cfg(test)]
mod providers {
    use wsim_core::{AgentId, LocationId, Outcome, Physiological};

    use super::helpers::{World, beast, person};
    use crate::providers::{BuildProvider, CombatProvider, GatherProvider, HuntProvider, MoveProvider};
    use crate::{ActionOutcome, ActionProvider, ActionResult, ActionState, ActionTarget, ProviderError};

    #[test]
    fn move_walks_one_hop_per_step() {
        let mut w = World::new([]);
        let walker = w.agents.push(person("walker", 0));
        let mut a = ActionResult::new("move")
            .for_actor(walker)
            .with_target(ActionTarget::Location(LocationId(2)));

        let cost = MoveProvider.calculate_cost_ms(&w.ctx(), &a, walker, None);
        assert_eq!(cost, 1_000);

        assert!(w.step(&MoveProvider, &mut a).unwrap());
        assert_eq!(a.state, ActionState::InProgress);
        assert!(w.step(&MoveProvider, &mut a).unwrap());
        assert_eq!(a.state, ActionState::Complete);
        assert!(a.succeeded());
        assert_eq!(a.steps, 2);
        assert_eq!(w.seen.moves, vec![(walker, LocationId(1)), (walker, LocationId(2))]);
    }

    #[test]
    fn move_without_target_is_an_error() {
        let mut w = World::new([]);
        let walker = w.agents.push(person("walker", 0));
        let mut a = ActionResult::new("move").for_actor(walker);
        assert!(matches!(w.step(&MoveProvider, &mut a), Err(ProviderError::MissingTarget(_))));
    }

    #[test]
    fn gather_fills_the_tagged_need() {
        let mut w = World::new([20, 80]);
        let g = w.agents.push(person("gatherer", 1));

        let mut water = ActionResult::new("gather")
            .for_actor(g)
            .with_need(Physiological::Water.into())
            .with_param("quantity", 2);
        assert_eq!(GatherProvider.calculate_cost_ms(&w.ctx(), &water, g, None), 1_200_000);
        w.step(&GatherProvider, &mut water).unwrap();
        assert!(water.succeeded());
        assert_eq!(w.agents.get(g).unwrap().circumstances.water, 2);

        let mut food = ActionResult::new("gather").for_actor(g).with_need(Physiological::Food.into());
        w.step(&GatherProvider, &mut food).unwrap();
        assert_eq!(food.outcome, Some(ActionOutcome::Failed));
        assert_eq!(food.state, ActionState::Complete);
        assert_eq!(w.agents.get(g).unwrap().circumstances.food, 0);
    }

    #[test]
    fn gather_needs_a_location() {
        let mut w = World::new([]);
        let mut lost = person("lost", 0);
        lost.state.location = None;
        let id = w.agents.push(lost);
        let mut a = ActionResult::new("gather").for_actor(id);
        assert!(matches!(w.step(&GatherProvider, &mut a), Err(ProviderError::NoLocation(_))));
    }

    #[test]
    fn build_takes_several_steps() {
        let mut w = World::new([]);
        let b = w.agents.push(person("builder", 2));
        let mut a = ActionResult::new("build").for_actor(b).with_param("steps", 3);
        for _ in 0..2 {
            w.step(&BuildProvider, &mut a).unwrap();
            assert_eq!(a.state, ActionState::InProgress);
        }
        w.step(&BuildProvider, &mut a).unwrap();
        assert!(a.succeeded());
        let c = &w.agents.get(b).unwrap().circumstances;
        assert_eq!(c.home, Some(LocationId(2)));
        assert_eq!(c.owned_locations, vec![LocationId(2)]);
    }

    #[test]
    fn combat_round_records_interaction_and_counter() {
        // to-hit 40 (skill 50), dodge 60 (skill 50): a hit.
        let mut w = World::new([40, 60]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.8));
        let mut act = ActionResult::new("combat")
            .for_actor(a)
            .with_target(ActionTarget::Agent(d))
            .with_priority(0.4)
            .with_param("weapon_damage", 5);

        w.step(&CombatProvider, &mut act).unwrap();
        assert!(act.succeeded());
        assert_eq!(act.param("hits"), Some(1));
        assert!((w.agents.get(d).unwrap().state.health - 0.9).abs() < 1e-9);

        let id = act.interaction.unwrap();
        let i = w.log.get(id).unwrap();
        assert_eq!(i.actor.outcome, Some(Outcome::Favorable));
        assert_eq!(i.interactor.outcome, Some(Outcome::Unfavorable));

        assert_eq!(w.spawned.len(), 1);
        let counter = &w.spawned[0];
        assert_eq!(counter.actor, d);
        assert_eq!(counter.target, Some(ActionTarget::Agent(a)));
        assert_eq!(counter.interaction, Some(id));
        assert_eq!(w.seen.npc_actions, vec![d]);
    }

    #[test]
    fn counter_attack_does_not_counter() {
        let mut w = World::new([40, 60]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.8));
        let mut act = ActionResult::new("combat")
            .for_actor(d)
            .with_target(ActionTarget::Agent(a))
            .with_param("counter", 1);
        w.step(&CombatProvider, &mut act).unwrap();
        assert!(w.spawned.is_empty());
    }

    fn armored_bout(d: AgentId, a: AgentId, hp: i64, stress: i64) -> ActionResult {
        ActionResult::new("combat")
            .for_actor(a)
            .with_target(ActionTarget::Agent(d))
            .with_param("rounds", 3)
            .with_param("weapon_damage", 2)
            .with_param("armor_hp", hp)
            .with_param("armor_stress", stress)
            .with_param("armor_absorption", 50)
    }

    #[test]
    fn armor_wears_through_across_rounds() {
        // Each round: hit 40, dodge fails 95, ADS 30 → armor takes all 2.
        let mut w = World::new([40, 95, 30, 40, 95, 30, 40, 95]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.0));
        let mut act = armored_bout(d, a, 4, 100);

        w.step(&CombatProvider, &mut act).unwrap();
        assert_eq!((act.param("armor_hp"), act.param("armor_worn")), (Some(2), Some(2)));
        w.step(&CombatProvider, &mut act).unwrap();
        assert_eq!((act.param("armor_hp"), act.param("armor_worn")), (Some(0), Some(4)));
        assert!((w.agents.get(d).unwrap().state.health - 1.0).abs() < 1e-9);

        // Worn through: the last blow lands in full and no ADS roll is drawn.
        w.step(&CombatProvider, &mut act).unwrap();
        assert!((w.agents.get(d).unwrap().state.health - 0.96).abs() < 1e-9);
        assert_eq!(w.rolls.remaining(), 0);
        assert!(act.succeeded());
    }

    #[test]
    fn armor_stress_pierces_and_stops_shielding() {
        let mut w = World::new([40, 95, 30, 40, 95, 30, 40, 95]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.0));
        let mut act = armored_bout(d, a, 10, 3);

        w.step(&CombatProvider, &mut act).unwrap();
        assert_eq!(act.param("armor_pierced"), Some(0));
        w.step(&CombatProvider, &mut act).unwrap();
        assert_eq!(act.param("armor_pierced"), Some(1));
        assert_eq!(act.param("armor_hp"), Some(6));

        w.step(&CombatProvider, &mut act).unwrap();
        assert!((w.agents.get(d).unwrap().state.health - 0.96).abs() < 1e-9);
    }

    #[test]
    fn incapacitating_blow_forces_a_death_save() {
        // 45 damage leaves 0.1 health; save chance clamps to 5, roll 50 fails.
        let mut w = World::new([40, 60, 50]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.0));
        let mut act = ActionResult::new("combat")
            .for_actor(a)
            .with_target(ActionTarget::Agent(d))
            .with_param("weapon_damage", 45);
        w.step(&CombatProvider, &mut act).unwrap();

        let boar = &w.agents.get(d).unwrap().state;
        assert!(!boar.alive);
        assert_eq!(boar.health, 0.0);
        assert!(w.seen.changes.contains(&(d, "alive".to_owned(), "false".to_owned())));
        let i = w.log.get(act.interaction.unwrap()).unwrap();
        assert_eq!(i.actor.outcome, Some(Outcome::VeryFavorable));
    }

    #[test]
    fn passed_death_save_leaves_the_defender_down() {
        let mut w = World::new([40, 60, 3]);
        let a = w.agents.push(person("attacker", 1));
        let d = w.agents.push(beast("boar", 1, 0.0));
        let mut act = ActionResult::new("combat")
            .for_actor(a)
            .with_target(ActionTarget::Agent(d))
            .with_param("weapon_damage", 45);
        w.step(&CombatProvider, &mut act).unwrap();

        let boar = &w.agents.get(d).unwrap().state;
        assert!(boar.alive);
        assert!(boar.incapacitated);
        let i = w.log.get(act.interaction.unwrap()).unwrap();
        assert_eq!(i.actor.outcome, Some(Outcome::Favorable));
    }

    #[test]
    fn combat_out_of_reach_fails_without_rolling() {
        let mut w = World::new([40, 60]);
        let a = w.agents.push(person("attacker", 0));
        let d = w.agents.push(person("defender", 2));
        let mut act = ActionResult::new("combat").for_actor(a).with_target(ActionTarget::Agent(d));
        assert!(!w.step(&CombatProvider, &mut act).unwrap());
        assert_eq!(act.outcome, Some(ActionOutcome::Failed));
        assert_eq!(w.rolls.remaining(), 2);
        assert!(w.log.is_empty());
    }

    #[test]
    fn hunt_downs_the_nearest_animal() {
        // Five spear hits (0.2 health each) incapacitate the deer.
        let mut w = World::new([40, 60].repeat(5));
        let h = w.agents.push(person("hunter", 0));
        let deer = w.agents.push(beast("deer", 0, 0.0));
        let mut act = ActionResult::new("hunt").for_actor(h).with_need(Physiological::Food.into());

        for _ in 0..4 {
            w.step(&HuntProvider, &mut act).unwrap();
            assert_eq!(act.state, ActionState::InProgress);
        }
        w.step(&HuntProvider, &mut act).unwrap();
        assert!(act.succeeded());
        assert_eq!(act.target, Some(ActionTarget::Agent(deer)));
        assert!(!w.agents.get(deer).unwrap().state.alive);
        assert_eq!(w.agents.get(h).unwrap().circumstances.food, 3);
        assert_eq!(
            w.log.get(act.interaction.unwrap()).unwrap().actor.outcome,
            Some(Outcome::VeryFavorable)
        );
    }

    #[test]
    fn hunt_with_nothing_around_fails() {
        let mut w = World::new([]);
        let h = w.agents.push(person("hunter", 0));
        w.agents.push(person("neighbor", 0));
        let mut act = ActionResult::new("hunt").for_actor(h);
        w.step(&HuntProvider, &mut act).unwrap();
        assert_eq!(act.outcome, Some(ActionOutcome::Failed));
        assert_eq!(act.state, ActionState::Complete);
    }

    #[test]
    fn unknown_actor_is_reported() {
        let mut w = World::new([]);
        let mut act = ActionResult::new("build").for_actor(AgentId(9));
        assert!(matches!(w.step(&BuildProvider, &mut act), Err(ProviderError::UnknownAgent(_))));
    }
}
