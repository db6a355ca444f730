//! Unit tests for wsim-profile.

#[cfg(test)]
mod helpers {
    use wsim_agent::{Agent, Circumstances};
    use wsim_core::{AgentId, LocationId, RealmId};

    /// A person with every physiological, love and property need met.
    pub fn settled(id: u32) -> Agent {
        let mut a = Agent { id: AgentId(id), ..Agent::person(format!("p{id}"), RealmId(0)) };
        a.circumstances = Circumstances {
            apparel:         2,
            food:            3,
            water:           1,
            items:           6,
            toxins:          0,
            home:            Some(LocationId(0)),
            owned_locations: vec![LocationId(0)],
            partners:        vec![AgentId(90)],
            siblings:        vec![],
            dependents:      vec![],
            social_ring:     vec![AgentId(91)],
            divorced:        false,
        };
        a
    }

    pub fn destitute(id: u32) -> Agent {
        Agent { id: AgentId(id), ..Agent::person(format!("d{id}"), RealmId(0)) }
    }
}

#[cfg(test)]
mod levels {
    use wsim_agent::{Stat, Statistics};

    use crate::{InstinctLevel, StatBand, StatBands, TraitLevel};

    #[test]
    fn buckets() {
        assert_eq!(TraitLevel::from_value(0.0), TraitLevel::VeryLow);
        assert_eq!(TraitLevel::from_value(0.2), TraitLevel::Low);
        assert_eq!(TraitLevel::from_value(0.59), TraitLevel::Average);
        assert_eq!(TraitLevel::from_value(1.0), TraitLevel::VeryHigh);
        assert_eq!(InstinctLevel::from_value(0.65), InstinctLevel::Strong);
        assert!(InstinctLevel::Strong >= InstinctLevel::Average);
    }

    #[test]
    fn stat_bands_scale_by_five() {
        assert_eq!(StatBand::from_stat(3), StatBand::Lowest);   // 0.15
        assert_eq!(StatBand::from_stat(10), StatBand::Moderate); // 0.50
        assert_eq!(StatBand::from_stat(16), StatBand::Highest);  // 0.80
        let bands = StatBands::from_statistics(&Statistics { luck: 13, ..Statistics::default() });
        assert_eq!(bands.get(Stat::Luck), StatBand::High);
        assert_eq!(bands.get(Stat::Strength), StatBand::Lowest);
    }
}

#[cfg(test)]
mod needs {
    use wsim_core::{AgentId, Love, Need, Physiological, Safety};

    use super::helpers::{destitute, settled};
    use crate::Profile;

    #[test]
    fn destitute_person_lacks_everything_derivable() {
        let p = Profile::from_agent(&destitute(1));
        for need in [
            Need::from(Physiological::Clothing),
            Physiological::Water.into(),
            Physiological::Food.into(),
            Physiological::Shelter.into(),
            Love::Intimacy.into(),
            Love::Family.into(),
            Love::Friendship.into(),
            Safety::Security.into(),
            Safety::Employment.into(),
            Safety::Resources.into(),
            Safety::Property.into(),
        ] {
            assert!(p.has_need(need), "missing {need}");
        }
        assert!(!p.has_need(Love::Connection.into()));
        assert!(!p.has_need(Safety::Health.into()));
        assert!(p.needs.esteem.is_empty());
    }

    #[test]
    fn settled_person_still_wants_connection_and_security() {
        let p = Profile::from_agent(&settled(1));
        assert!(p.needs.physiological.is_empty());
        assert_eq!(p.needs.love.iter().copied().collect::<Vec<_>>(), vec![Love::Connection]);
        assert_eq!(
            p.needs.safety.iter().copied().collect::<Vec<_>>(),
            vec![Safety::Employment, Safety::Security]
        );
    }

    #[test]
    fn family_satisfied_by_sibling() {
        let mut a = destitute(1);
        a.circumstances.siblings.push(AgentId(5));
        let p = Profile::from_agent(&a);
        assert!(p.has_need(Love::Intimacy.into()));
        assert!(!p.has_need(Love::Family.into()));
    }

    #[test]
    fn poor_health_is_a_safety_need() {
        let mut a = settled(1);
        a.state.health = 0.2;
        assert!(Profile::from_agent(&a).has_need(Safety::Health.into()));
    }

    #[test]
    fn animals_have_no_needs() {
        let mut wolf = wsim_agent::Agent::animal("wolf", wsim_core::RealmId(0));
        wolf.id = AgentId(3);
        let p = Profile::from_agent(&wolf);
        assert!(p.needs.is_empty());
        assert!(p.personality.is_none());
    }
}

#[cfg(test)]
mod keys {
    use wsim_agent::Personality;

    use crate::profile::{dark_triad_key, sloan_key};

    #[test]
    fn sloan_and_dark_triad() {
        let p = Personality {
            openness:          0.9,
            conscientiousness: 0.1,
            extraversion:      0.6,
            agreeableness:     0.5,
            neuroticism:       0.2,
            machiavellianism:  0.7,
            narcissism:        0.5,
            psychopathy:       0.51,
        };
        assert_eq!(sloan_key(&p), "scuei");
        assert_eq!(dark_triad_key(&p), "MnP");
    }
}

#[cfg(test)]
mod group {
    use wsim_core::{AgentId, Love, NeedCategory, Physiological, Safety};

    use super::helpers::{destitute, settled};
    use crate::{GroupProfile, Profile};

    #[test]
    fn ranks_by_count_then_declaration_order() {
        let mut fed = destitute(2);
        fed.circumstances.food = 1;
        fed.circumstances.items = 1;
        let profiles = [
            Profile::from_agent(&destitute(1)),
            Profile::from_agent(&fed),
            Profile::from_agent(&settled(3)),
        ];
        let g = GroupProfile::from_profiles(&profiles);

        assert_eq!(g.members, 3);
        assert_eq!(
            g.physiological,
            vec![
                (Physiological::Water, 2),
                (Physiological::Shelter, 2),
                (Physiological::Clothing, 2),
                (Physiological::Food, 1),
            ]
        );
        assert_eq!(g.safety[0], (Safety::Employment, 3));
        assert_eq!(g.safety[1], (Safety::Security, 3));
        assert_eq!(g.safety[2], (Safety::Property, 2));
        assert_eq!(g.count(Safety::Resources.into()), 1);
        assert_eq!(g.count(Physiological::Reproduction.into()), 0);
        assert!(g.esteem.is_empty());
        assert!((g.share(Love::Friendship.into()) - 2.0 / 3.0).abs() < 1e-9);

        let ranked = g.ranked(NeedCategory::Love);
        assert_eq!(ranked.len(), 4);
        assert_eq!(g.priorities()[0].0, Physiological::Water.into());
    }

    #[test]
    fn wealth_is_relative_to_richest() {
        let profiles = [Profile::from_agent(&settled(1)), Profile::from_agent(&destitute(2))];
        let g = GroupProfile::from_profiles(&profiles);
        assert_eq!(g.wealth[&AgentId(1)], 1.0);
        assert_eq!(g.wealth[&AgentId(2)], 0.0);
    }

    #[test]
    fn empty_group() {
        let g = GroupProfile::from_profiles(std::iter::empty());
        assert_eq!(g.members, 0);
        assert_eq!(g.share(Safety::Security.into()), 0.0);
        assert!(g.priorities().is_empty());
    }
}

#[cfg(test)]
mod cache {
    use std::sync::Arc;

    use wsim_core::{AgentId, Physiological};

    use super::helpers::destitute;
    use crate::ProfileCache;

    #[test]
    fn stale_until_updated() {
        let cache = ProfileCache::new();
        let mut a = destitute(1);
        let first = cache.get(&a).unwrap();
        assert!(first.has_need(Physiological::Food.into()));

        a.circumstances.food = 4;
        assert!(cache.get(&a).unwrap().has_need(Physiological::Food.into()));

        let fresh = cache.update(&a).unwrap();
        assert!(!fresh.has_need(Physiological::Food.into()));
        assert!(!cache.get(&a).unwrap().has_need(Physiological::Food.into()));
    }

    #[test]
    fn invalid_id_is_not_cached() {
        let cache = ProfileCache::new();
        let a = wsim_agent::Agent::person("ghost", wsim_core::RealmId(0));
        assert!(cache.get(&a).is_none());
        assert!(cache.update(&a).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn fixations_survive_update_but_not_invalidate() {
        let cache = ProfileCache::new();
        let a = destitute(1);
        assert!(!cache.add_fixation(a.id, AgentId(7)));
        cache.get(&a);
        assert!(cache.add_fixation(a.id, AgentId(7)));
        cache.update(&a);
        assert_eq!(cache.fixations(a.id), vec![AgentId(7)]);

        assert!(cache.invalidate(a.id));
        assert!(!cache.invalidate(a.id));
        assert!(cache.fixations(a.id).is_empty());
    }

    #[test]
    fn shared_between_threads() {
        let cache = ProfileCache::shared();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let a = destitute(i % 2);
                    cache.get(&a).map(|p| p.id)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_some());
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn group_profiles_in_order() {
        let cache = ProfileCache::new();
        let agents = [destitute(3), destitute(1), destitute(2)];
        let refs: Vec<&wsim_agent::Agent> = agents.iter().collect();
        let ids: Vec<AgentId> = cache.profiles(&refs).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![AgentId(3), AgentId(1), AgentId(2)]);
    }
}
