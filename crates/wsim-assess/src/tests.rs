//! Unit tests for wsim-assess.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use wsim_agent::{Agent, AgentStore, Instincts, Statistics};
    use wsim_core::{LocationId, RealmId};
    use wsim_profile::Profile;
    use wsim_spatial::{Geography, GeographyBuilder};

    pub fn line() -> Geography {
        let mut b = GeographyBuilder::new();
        b.grid(RealmId(0), 3, 1, 100.0, 1_000);
        b.build()
    }

    pub fn person(name: &str, cell: u32) -> Agent {
        Agent::person(name, RealmId(0))
            .with_statistics(Statistics::uniform(10))
            .at(LocationId(cell))
    }

    pub fn wolf(cell: u32, fight: f64) -> Agent {
        Agent::animal("wolf", RealmId(0))
            .with_statistics(Statistics::uniform(10))
            .with_instincts(Instincts { fight, ..Instincts::default() })
            .at(LocationId(cell))
    }

    pub fn profiles(store: &AgentStore) -> Vec<Arc<Profile>> {
        store.people().map(|a| Arc::new(Profile::from_agent(a))).collect()
    }
}

// ── Needs ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod needs {
    use std::collections::BTreeSet;

    use wsim_action::ActionRegistry;
    use wsim_agent::AgentStore;
    use wsim_core::{AgentId, Need, Physiological, Safety, ScriptedRolls};

    use super::helpers::{person, profiles};
    use crate::NeedEvaluator;

    fn village() -> AgentStore {
        let mut store = AgentStore::default();
        store.push(person("ada", 0));
        store.push(person("bo", 0));
        store
    }

    #[test]
    fn backlog_follows_group_priorities() {
        let group = profiles(&village());
        let reg = ActionRegistry::with_builtins();
        let mut rng = ScriptedRolls::new([]).with_indices([1]);

        let backlog = NeedEvaluator::new().evaluate_needs(&group, &reg, &mut rng, &BTreeSet::new());
        let summary: Vec<(&str, Need)> =
            backlog.iter().map(|a| (a.action.as_str(), a.need.unwrap())).collect();
        assert_eq!(
            summary,
            vec![
                ("hunt", Physiological::Food.into()),
                ("gather", Physiological::Water.into()),
                ("build", Physiological::Shelter.into()),
                ("build", Safety::Property.into()),
                ("gather", Safety::Resources.into()),
            ]
        );
        assert!((backlog[0].priority - 0.7).abs() < 1e-9);
        assert!((backlog[3].priority - 0.5).abs() < 1e-9);
        assert!(backlog.iter().all(|a| !a.is_assigned()));
    }

    #[test]
    fn open_needs_are_skipped() {
        let group = profiles(&village());
        let reg = ActionRegistry::with_builtins();
        let open: BTreeSet<Need> = [Physiological::Water.into(), Safety::Property.into()].into();
        let backlog = NeedEvaluator::new().evaluate_needs(&group, &reg, &mut ScriptedRolls::new([]), &open);
        assert_eq!(backlog.len(), 3);
        assert!(backlog.iter().all(|a| !open.contains(&a.need.unwrap())));
    }

    #[test]
    fn empty_registry_yields_nothing() {
        let group = profiles(&village());
        let backlog = NeedEvaluator::new().evaluate_needs(
            &group,
            &ActionRegistry::new(),
            &mut ScriptedRolls::new([]),
            &BTreeSet::new(),
        );
        assert!(backlog.is_empty());
    }

    #[test]
    fn one_action_per_member() {
        let group = profiles(&village());
        let reg = ActionRegistry::with_builtins();
        let eval = NeedEvaluator::new();
        let mut backlog = eval.evaluate_needs(&group, &reg, &mut ScriptedRolls::new([]), &BTreeSet::new());
        eval.assign(&mut backlog, &group);
        let actors: Vec<AgentId> = backlog.iter().map(|a| a.actor).collect();
        assert_eq!(actors[..2], [AgentId(0), AgentId(1)]);
        assert!(actors[2..].iter().all(|a| !a.is_valid()));
    }
}

// ── Population cache ──────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use wsim_agent::AgentStore;
    use wsim_core::LocationId;

    use super::helpers::{line, person, wolf};
    use crate::PopulationCache;

    #[test]
    fn stale_until_invalidated() {
        let geo = line();
        let mut store = AgentStore::default();
        store.push(person("ada", 0));
        let w = store.push(wolf(1, 0.9));
        let cache = PopulationCache::new();

        assert_eq!(*cache.animals_at(LocationId(1), &store), vec![w]);
        assert_eq!(cache.animals_near(&geo, LocationId(0), 1, &store), vec![(w, 1)]);
        assert!(cache.animals_near(&geo, LocationId(0), 0, &store).is_empty());

        store.get_mut(w).unwrap().state.location = Some(LocationId(2));
        assert_eq!(*cache.animals_at(LocationId(1), &store), vec![w]);
        assert!(cache.invalidate(LocationId(1)));
        assert!(cache.animals_at(LocationId(1), &store).is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.animals_near(&geo, LocationId(7), 1, &store).is_empty());
    }
}

// ── Threats ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod threats {
    use wsim_action::{GameObserver, Interaction, InteractionLog, NoopObserver};
    use wsim_agent::AgentStore;
    use wsim_core::{AgentId, RealmId, ScriptedRolls, ThreatKind, TimeBox, TimeBoxId};
    use wsim_profile::ProfileCache;
    use wsim_spatial::Geography;

    use super::helpers::{line, person, profiles, wolf};
    use crate::{Hazard, PopulationCache, ThreatEvaluator, ThreatReport, ThreatView};

    #[derive(Default)]
    struct Detections(Vec<(AgentId, String)>);

    impl GameObserver for Detections {
        fn on_threat_detected(&mut self, agent: AgentId, threat: &Interaction) {
            self.0.push((agent, threat.description.clone()));
        }
    }

    struct Scene {
        store: AgentStore,
        geo:   Geography,
        pop:   PopulationCache,
        cache: ProfileCache,
        log:   InteractionLog,
    }

    impl Scene {
        fn new(wolf_cell: u32, fight: f64) -> (Self, AgentId, AgentId) {
            let mut store = AgentStore::default();
            let ada = store.push(person("ada", 0));
            let w = store.push(wolf(wolf_cell, fight));
            let scene = Scene {
                store,
                geo:   line(),
                pop:   PopulationCache::new(),
                cache: ProfileCache::new(),
                log:   InteractionLog::new(),
            };
            (scene, ada, w)
        }

        fn run(&mut self, rng: &mut ScriptedRolls, observer: &mut dyn GameObserver) -> ThreatReport {
            let hour = TimeBox::hour(TimeBoxId(0), 0);
            let group = profiles(&self.store);
            let view = ThreatView {
                agents:     &self.store,
                geography:  &self.geo,
                population: &self.pop,
                profiles:   &self.cache,
            };
            ThreatEvaluator::default().evaluate_threats(
                RealmId(0),
                &hour,
                &group,
                view,
                rng,
                observer,
                &mut self.log,
            )
        }
    }

    #[test]
    fn thresholds_scale_with_distance() {
        let eval = ThreatEvaluator::default();
        assert_eq!(eval.distance_factor(0), 1.0);
        assert_eq!(eval.distance_factor(1), 0.5);
    }

    #[test]
    fn noticed_animal_threat() {
        let (mut scene, ada, w) = Scene::new(0, 0.9);
        // wolf perception 10, wolf reaction 20, ada perception 30.
        let mut rng = ScriptedRolls::new([10, 20, 30]);
        let mut seen = Detections::default();
        let report = scene.run(&mut rng, &mut seen);

        assert_eq!(report.imminent.len(), 1);
        let t = &report.imminent[0];
        assert_eq!((t.agent, t.source, t.kind), (ada, w, ThreatKind::AnimalThreat));
        assert!(t.noticed);
        assert_eq!(t.priority, 0.8);
        assert_eq!(report.pressure_on(ada), Some(0.8));
        assert_eq!(report.pressure_on(w), None);
        assert_eq!(seen.0, vec![(ada, "wolf is a ANIMAL_THREAT to ada".to_owned())]);
        assert_eq!(scene.log.get(t.interaction).unwrap().interactor.threat, ThreatKind::AnimalThreat);
    }

    #[test]
    fn natural_reaction_fixates() {
        let (mut scene, ada, w) = Scene::new(0, 0.9);
        let mut rng = ScriptedRolls::new([10, 99, 80]);
        let mut seen = Detections::default();
        let report = scene.run(&mut rng, &mut seen);

        assert_eq!(report.imminent[0].kind, ThreatKind::ExistentialThreat);
        assert!(!report.imminent[0].noticed);
        assert!(seen.0.is_empty());
        assert_eq!(scene.cache.fixations(w), vec![ada]);
    }

    #[test]
    fn fumbled_reaction_exposes_the_source() {
        let (mut scene, _, _) = Scene::new(0, 0.9);
        let report = scene.run(&mut ScriptedRolls::new([10, 1, 30]), &mut NoopObserver);
        assert_eq!(report.imminent[0].kind, ThreatKind::AnimalTarget);
    }

    #[test]
    fn failed_reaction_is_no_threat() {
        let (mut scene, _, _) = Scene::new(0, 0.9);
        let report = scene.run(&mut ScriptedRolls::new([10, 70]), &mut NoopObserver);
        assert!(report.is_empty());
        assert!(scene.log.is_empty());
    }

    #[test]
    fn distant_half_hearted_wolf_is_ignored() {
        // fight 0.5 at one hop scales to 0.25: below Average.
        let (mut scene, _, _) = Scene::new(1, 0.5);
        let mut rng = ScriptedRolls::new([10, 20, 30]);
        let report = scene.run(&mut rng, &mut NoopObserver);
        assert!(report.is_empty());
        assert_eq!(rng.remaining(), 3);
    }

    fn envenom(scene: &mut Scene, w: AgentId) {
        scene.store.get_mut(w).unwrap().circumstances.toxins = 1;
    }

    #[test]
    fn calm_toxic_animal_in_the_cell_is_a_threat() {
        let (mut scene, ada, w) = Scene::new(0, 0.0);
        envenom(&mut scene, w);
        // No roll for the calm wolf; ada perception 30.
        let mut rng = ScriptedRolls::new([30]);
        let mut seen = Detections::default();
        let report = scene.run(&mut rng, &mut seen);

        assert_eq!(report.imminent.len(), 1);
        let t = &report.imminent[0];
        assert_eq!((t.source, t.kind, t.hazard), (w, ThreatKind::AnimalThreat, Hazard::Toxic));
        assert!(t.noticed);
        assert_eq!(rng.remaining(), 0);
        assert_eq!(seen.0, vec![(ada, "wolf is a toxic ANIMAL_THREAT to ada".to_owned())]);
    }

    #[test]
    fn toxic_animal_next_door_is_ignored() {
        let (mut scene, _, w) = Scene::new(1, 0.0);
        envenom(&mut scene, w);
        let mut rng = ScriptedRolls::new([30]);
        assert!(scene.run(&mut rng, &mut NoopObserver).is_empty());
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn unaware_aggressor_still_counts_as_toxic() {
        // wolf perception 90 fails, so no reaction roll; ada perception 30.
        let (mut scene, _, w) = Scene::new(0, 0.9);
        envenom(&mut scene, w);
        let report = scene.run(&mut ScriptedRolls::new([90, 30]), &mut NoopObserver);
        assert_eq!(report.imminent[0].hazard, Hazard::Toxic);
        assert_eq!(report.imminent[0].kind, ThreatKind::AnimalThreat);
    }

    #[test]
    fn aggression_is_classified_first() {
        let (mut scene, _, w) = Scene::new(0, 0.9);
        envenom(&mut scene, w);
        let report = scene.run(&mut ScriptedRolls::new([10, 20, 30]), &mut NoopObserver);
        assert_eq!(report.imminent[0].hazard, Hazard::Aggressive);
    }

    #[test]
    fn sleeping_or_placeless_agents_are_skipped() {
        let (mut scene, ada, _) = Scene::new(0, 0.9);
        scene.store.get_mut(ada).unwrap().state.awake = false;
        let mut rng = ScriptedRolls::new([10, 20, 30]);
        assert!(scene.run(&mut rng, &mut NoopObserver).is_empty());

        let agent = scene.store.get_mut(ada).unwrap();
        agent.state.awake = true;
        agent.state.location = None;
        assert!(scene.run(&mut rng, &mut NoopObserver).is_empty());
        assert_eq!(rng.remaining(), 3);
    }
}
