//! Unit tests for wsim-rules.
//!
//! Randomness is scripted with `ScriptedRolls`, so every test pins the exact
//! rolls it depends on.

#[cfg(test)]
mod helpers {
    use wsim_agent::{Agent, Statistics};
    use wsim_core::RealmId;

    pub fn fighter(strength: i32, agility: i32, speed: i32) -> Agent {
        Agent::person("fighter", RealmId(0)).with_statistics(Statistics {
            strength,
            agility,
            speed,
            ..Statistics::uniform(10)
        })
    }
}

// ── Roll engine ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod roll {
    use wsim_agent::{Stat, Statistics};
    use wsim_core::{Comparator, Outcome, ScriptedRolls};

    use crate::roll::{band, compare, counter_charisma_check, perception_check_at, roll_stat};
    use crate::{RollOutcome, is_catastrophic_failure, is_natural_success, stat_check};

    #[test]
    fn bands_are_exclusive_and_exhaustive() {
        for r in 0..=100 {
            let cat = is_catastrophic_failure(r);
            let nat = is_natural_success(r);
            assert!(!(cat && nat), "roll {r} in both bands");
            if cat {
                assert!(r <= 1);
            }
            if nat {
                assert!(r >= 99);
            }
            let banded = band(r, 50);
            let expected = match r {
                0 | 1   => RollOutcome::CatastrophicFailure,
                99 | 100 => RollOutcome::NaturalSuccess,
                r if r <= 50 => RollOutcome::Success,
                _ => RollOutcome::Failure,
            };
            assert_eq!(banded, expected, "roll {r}");
        }
    }

    #[test]
    fn stat_check_ties_fail() {
        let agent = super::helpers::fighter(10, 10, 10);
        // perception 10 → threshold 50
        let mut rolls = ScriptedRolls::new([49, 50, 1, 99]);
        assert_eq!(stat_check(&mut rolls, &agent, Stat::Perception), RollOutcome::Success);
        assert_eq!(stat_check(&mut rolls, &agent, Stat::Perception), RollOutcome::Failure);
        assert_eq!(stat_check(&mut rolls, &agent, Stat::Perception), RollOutcome::CatastrophicFailure);
        assert_eq!(stat_check(&mut rolls, &agent, Stat::Perception), RollOutcome::NaturalSuccess);
    }

    #[test]
    fn zero_stat_is_invalid_without_rolling() {
        let mut agent = super::helpers::fighter(10, 10, 10);
        agent.statistics = Statistics::default();
        let mut rolls = ScriptedRolls::new([10]);
        assert_eq!(stat_check(&mut rolls, &agent, Stat::Reaction), RollOutcome::InvalidStatistic);
        assert_eq!(rolls.remaining(), 1, "no roll consumed");
        assert_eq!(roll_stat(&mut rolls, -3), RollOutcome::InvalidStatistic);
    }

    #[test]
    fn scaled_perception_and_counter_charisma() {
        let mut agent = super::helpers::fighter(10, 10, 10);
        agent.statistics.perception = 16;
        agent.statistics.charisma = 4;
        agent.statistics.intelligence = 12;
        // 16 * 0.5 = 8 → threshold 40
        let mut rolls = ScriptedRolls::new([39, 40, 39]);
        assert_eq!(perception_check_at(&mut rolls, &agent, 0.5), RollOutcome::Success);
        assert_eq!(perception_check_at(&mut rolls, &agent, 0.5), RollOutcome::Failure);
        // avg(4, 12) = 8 → threshold 40
        assert_eq!(counter_charisma_check(&mut rolls, &agent), RollOutcome::Success);
    }

    #[test]
    fn outcome_mapping() {
        assert_eq!(RollOutcome::CatastrophicFailure.outcome(), Outcome::VeryUnfavorable);
        assert_eq!(RollOutcome::NaturalSuccess.outcome(), Outcome::VeryFavorable);
        assert_eq!(RollOutcome::InvalidStatistic.outcome(), Outcome::Equilibrium);
        assert!(RollOutcome::NaturalSuccess.is_success());
        assert!(!RollOutcome::InvalidStatistic.is_success());
    }

    #[test]
    fn comparisons() {
        assert_eq!(compare(1.0, 1.0), Comparator::Equals);
        assert_eq!(compare(0.5, 1.0), Comparator::LessThan);
        assert_eq!(compare(2.0, 1.0), Comparator::GreaterThan);
    }
}

// ── Combat ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod combat {
    use wsim_agent::Statistics;
    use wsim_core::ScriptedRolls;

    use crate::combat::{
        DEFAULT_FIGHT_SKILL, dodge_skill, fight_skill, roll_dodge, roll_parry, roll_to_hit,
    };
    use crate::{
        ArmorProfile, CriticalLevel, DefenseKind, Engagement, RollOutcome, calculate_armor_damage,
        resolve_combat,
    };

    use super::helpers::fighter;

    #[test]
    fn skills() {
        assert_eq!(fight_skill(&fighter(10, 10, 10)), 50);
        assert_eq!(fight_skill(&fighter(12, 14, 15)), 68);
        let mut blank = fighter(0, 0, 0);
        assert_eq!(fight_skill(&blank), DEFAULT_FIGHT_SKILL);
        blank.statistics = Statistics::default();
        assert_eq!(dodge_skill(&blank), 0);
        assert_eq!(dodge_skill(&fighter(10, 6, 6)), 30);
    }

    #[test]
    fn to_hit_caps_at_95() {
        for bonus in [0, 45, 100, 10_000] {
            let mut rolls = ScriptedRolls::new([96]);
            assert_eq!(roll_to_hit(&mut rolls, 50 + bonus), RollOutcome::Failure, "bonus {bonus}");
        }
        let mut rolls = ScriptedRolls::new([95]);
        assert_eq!(roll_to_hit(&mut rolls, 10_000), RollOutcome::Success);
    }

    #[test]
    fn larger_bonus_never_loses_a_hit() {
        for roll in 0..=100 {
            let mut previous_hit = false;
            for bonus in (0..=80).step_by(5) {
                let mut rolls = ScriptedRolls::new([roll]);
                let hit = roll_to_hit(&mut rolls, 50 + bonus).is_success();
                assert!(hit || !previous_hit, "roll {roll} hit at a lower bonus but not at {bonus}");
                previous_hit = hit;
            }
        }
    }

    #[test]
    fn scripted_exchange_lands_regular_hit() {
        let attacker = fighter(10, 10, 10);
        let defender = fighter(10, 6, 6);
        let engagement = Engagement::with_weapon(5, 0, 0);
        let mut rolls = ScriptedRolls::new([40, 35]);

        let r = resolve_combat(&mut rolls, &attacker, &defender, &engagement);
        assert!(r.attack_hit);
        assert!(!r.defended);
        assert_eq!(r.defense, DefenseKind::Dodge);
        assert_eq!(r.defense_roll, Some(RollOutcome::Failure));
        assert_eq!(r.damage_to_target, 5);
        assert_eq!(r.damage_to_armor, 0);
        assert_eq!(r.critical, CriticalLevel::Regular);
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn fumble_ends_exchange() {
        let mut rolls = ScriptedRolls::new([1]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 10, 10), &Engagement::unarmed());
        assert_eq!(r.attack_roll, RollOutcome::CatastrophicFailure);
        assert!(!r.attack_hit);
        assert_eq!(r.defense_roll, None);
        assert!(r.description.contains("fumbles"));
    }

    #[test]
    fn successful_dodge_means_no_damage() {
        let mut rolls = ScriptedRolls::new([20, 10]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 10, 10), &Engagement::unarmed());
        assert!(r.defended);
        assert!(!r.attack_hit);
        assert_eq!(r.damage_to_target, 0);
    }

    #[test]
    fn helpless_defender_cannot_dodge() {
        let mut defender = fighter(10, 20, 20);
        defender.state.immobilized = true;
        let mut rolls = ScriptedRolls::new([5]);
        assert_eq!(roll_dodge(&mut rolls, &defender, 50), RollOutcome::Failure);
        assert_eq!(rolls.remaining(), 1, "no roll consumed");
    }

    #[test]
    fn sleeping_defender_dodges_badly() {
        let mut defender = fighter(10, 20, 20); // dodge 100
        defender.state.awake = false;           // → 25
        let mut rolls = ScriptedRolls::new([25, 26]);
        assert_eq!(roll_dodge(&mut rolls, &defender, 50), RollOutcome::Success);
        assert_eq!(roll_dodge(&mut rolls, &defender, 50), RollOutcome::Failure);
    }

    #[test]
    fn skilled_attacks_are_harder_to_dodge() {
        let defender = fighter(10, 6, 6); // dodge 30
        // attack 90 → modifier 8 → threshold 22
        let mut rolls = ScriptedRolls::new([22, 23]);
        assert_eq!(roll_dodge(&mut rolls, &defender, 90), RollOutcome::Success);
        assert_eq!(roll_dodge(&mut rolls, &defender, 90), RollOutcome::Failure);
    }

    #[test]
    fn parry_rules() {
        let defender = fighter(10, 10, 10);
        let mut rolls = ScriptedRolls::new([60, 61, 3]);
        // heavier attacking weapon: no roll
        assert_eq!(roll_parry(&mut rolls, &defender, 60, 1, 2), RollOutcome::Failure);
        assert_eq!(rolls.remaining(), 3);
        // min_to_parry tracks the attack skill
        assert_eq!(roll_parry(&mut rolls, &defender, 60, 2, 2), RollOutcome::Success);
        assert_eq!(roll_parry(&mut rolls, &defender, 60, 2, 2), RollOutcome::Failure);
        // clamped to at least 5
        assert_eq!(roll_parry(&mut rolls, &defender, -40, 2, 2), RollOutcome::Success);
    }

    #[test]
    fn parry_preferred_when_armed() {
        let engagement = Engagement::with_weapon(4, 0, 1).parried_with(1);
        let mut rolls = ScriptedRolls::new([30, 30]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 10, 10), &engagement);
        assert_eq!(r.defense, DefenseKind::Parry);
        assert!(r.defended);
    }

    #[test]
    fn natural_hit_rolls_critical() {
        // hit 99 → natural; dodge 90 fails; critical 90 → triple
        let mut rolls = ScriptedRolls::new([99, 90, 90]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 6, 6), &Engagement::unarmed());
        assert_eq!(r.critical, CriticalLevel::Triple);
        assert_eq!(r.damage_to_target, 6);
        assert!(r.description.contains("TRIPLE critical"));
    }

    #[test]
    fn critical_bands() {
        assert_eq!(CriticalLevel::from_percentage(50), CriticalLevel::Regular);
        assert_eq!(CriticalLevel::from_percentage(51), CriticalLevel::Double);
        assert_eq!(CriticalLevel::from_percentage(85), CriticalLevel::Double);
        assert_eq!(CriticalLevel::from_percentage(95), CriticalLevel::Triple);
        assert_eq!(CriticalLevel::from_percentage(96), CriticalLevel::Deadly);
        assert_eq!(CriticalLevel::Deadly.multiplier(), 10);
    }

    #[test]
    fn armor_never_creates_damage() {
        for absorption in (0..=100).step_by(5) {
            for stress in [1, 3, 10] {
                for base in [0, 1, 2, 7, 20] {
                    for roll in 0..=100 {
                        let armor = ArmorProfile::new(10, stress, absorption);
                        let mut rolls = ScriptedRolls::new([roll]);
                        let d = calculate_armor_damage(&mut rolls, 70, base, &armor);
                        assert!(d.to_target <= base);
                        assert!(d.to_armor <= base);
                        if d.to_armor >= stress {
                            assert!(d.pierced);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn armor_bands() {
        let armor = ArmorProfile::new(20, 100, 40);
        let split = |roll| {
            let mut rolls = ScriptedRolls::new([roll]);
            calculate_armor_damage(&mut rolls, 70, 8, &armor)
        };
        // critical band: max(5, 40*0.05=2) = 5
        let d = split(5);
        assert_eq!((d.to_target, d.to_armor, d.pierced), (8, 4, true));
        let d = split(40);
        assert_eq!((d.to_target, d.to_armor, d.pierced), (0, 8, false));
        // effective = 70 - 40 = 30 < absorption, so nothing between
        let d = split(41);
        assert_eq!((d.to_target, d.to_armor), (0, 0));
    }

    #[test]
    fn partial_penetration() {
        let armor = ArmorProfile::new(20, 100, 10);
        let mut rolls = ScriptedRolls::new([40]);
        let d = calculate_armor_damage(&mut rolls, 70, 8, &armor);
        assert_eq!((d.to_target, d.to_armor), (4, 2));
    }

    #[test]
    fn cumulative_armor_stress() {
        let mut armor = ArmorProfile::new(10, 6, 30);
        assert!(!armor.absorb(4));
        assert!(armor.absorb(3));
        assert_eq!(armor.hit_points, 3);
        assert_eq!(armor.cumulative_damage, 7);
    }

    #[test]
    fn exchange_respects_prior_armor_wear() {
        let mut armor = ArmorProfile::new(10, 6, 30);
        armor.absorb(4);
        let engagement = Engagement::with_weapon(4, 0, 0).against_armor(armor);
        // hit 40, dodge fails 90, ADS 20 → armor only (4 to armor) → 8 ≥ 6
        let mut rolls = ScriptedRolls::new([40, 90, 20]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 6, 6), &engagement);
        assert!(r.attack_hit);
        assert_eq!(r.damage_to_target, 0);
        assert_eq!(r.damage_to_armor, 4);
        assert!(r.armor_pierced);
    }

    #[test]
    fn pierced_armor_stops_shielding() {
        let mut armor = ArmorProfile::new(10, 3, 90);
        armor.absorb(3);
        assert!(armor.pierced);
        assert!(!armor.is_intact());
        let engagement = Engagement::with_weapon(5, 0, 0).against_armor(armor);
        // hit 40, dodge fails 90; no ADS roll
        let mut rolls = ScriptedRolls::new([40, 90, 20]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 6, 6), &engagement);
        assert_eq!(r.damage_to_target, 5);
        assert_eq!(r.damage_to_armor, 0);
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn broken_armor_is_ignored() {
        let engagement = Engagement::with_weapon(5, 0, 0).against_armor(ArmorProfile::new(0, 5, 50));
        let mut rolls = ScriptedRolls::new([40, 90]);
        let r = resolve_combat(&mut rolls, &fighter(10, 10, 10), &fighter(10, 6, 6), &engagement);
        assert_eq!(r.damage_to_target, 5);
    }
}

// ── Saves & damage ────────────────────────────────────────────────────────────

#[cfg(test)]
mod saves {
    use wsim_agent::Statistics;
    use wsim_core::ScriptedRolls;

    use crate::{RollOutcome, SaveKind, roll_saving_throw, save_percent};

    use super::helpers::fighter;

    #[test]
    fn death_save_clamps_to_floor() {
        let mut agent = fighter(20, 10, 10);
        agent.statistics.health = 20;
        agent.statistics.willpower = 20;
        assert_eq!(save_percent(&agent, SaveKind::Death, 200), 5);
    }

    #[test]
    fn per_kind_bonuses() {
        let mut agent = fighter(10, 10, 10);
        agent.statistics = Statistics {
            strength:        6,
            health:          6,
            willpower:       6,
            endurance:       8,
            mental_strength: 9,
            wisdom:          10,
            ..Statistics::default()
        };
        assert_eq!(save_percent(&agent, SaveKind::Death, 0), 30);
        assert_eq!(save_percent(&agent, SaveKind::Poison, 0), 38);
        assert_eq!(save_percent(&agent, SaveKind::Magic, 0), 34);
        assert_eq!(save_percent(&agent, SaveKind::Fear, 0), 34);
        assert_eq!(save_percent(&agent, SaveKind::Stun, 0), 34);
        assert_eq!(save_percent(&agent, SaveKind::Stun, -500), 95);
    }

    #[test]
    fn save_roll_uses_to_hit_bands() {
        let agent = fighter(10, 10, 10); // health 10, willpower 10 → 50
        let mut rolls = ScriptedRolls::new([50, 51, 0]);
        assert_eq!(roll_saving_throw(&mut rolls, &agent, SaveKind::Death, 0), RollOutcome::Success);
        assert_eq!(roll_saving_throw(&mut rolls, &agent, SaveKind::Death, 0), RollOutcome::Failure);
        assert_eq!(
            roll_saving_throw(&mut rolls, &agent, SaveKind::Death, 0),
            RollOutcome::CatastrophicFailure
        );
    }
}

#[cfg(test)]
mod damage {
    use crate::apply_damage;

    use super::helpers::fighter;

    #[test]
    fn fractional_loss() {
        let mut agent = fighter(10, 10, 10); // maximum_health 10
        let report = apply_damage(&mut agent, 5);
        assert!((report.health_after - 0.9).abs() < 1e-9);
        assert!(!report.incapacitated);
        assert!(agent.state.alive);
    }

    #[test]
    fn non_positive_damage_is_noop() {
        let mut agent = fighter(10, 10, 10);
        apply_damage(&mut agent, 0);
        apply_damage(&mut agent, -4);
        assert_eq!(agent.state.health, 1.0);
    }

    #[test]
    fn incapacitation_then_death() {
        let mut agent = fighter(10, 10, 10);
        let r = apply_damage(&mut agent, 46); // 1.0 - 0.92 = 0.08
        assert!(r.incapacitated);
        assert!(agent.state.incapacitated);
        assert!(agent.state.alive);

        let r = apply_damage(&mut agent, 100);
        assert!(r.killed);
        assert_eq!(agent.state.health, 0.0);
        assert!(!agent.state.alive);
    }

    #[test]
    fn missing_max_health_defaults_to_ten() {
        let mut agent = fighter(10, 10, 10);
        agent.statistics.maximum_health = 0;
        let r = apply_damage(&mut agent, 25);
        assert!((r.health_after - 0.5).abs() < 1e-9);
    }
}
