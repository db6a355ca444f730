//! Combat resolution and the armor damaging system (ADS).
//!
//! One exchange runs:
//!
//! 1. **To hit.**  `attack_skill = fight_skill + weapon bonus`, rolled
//!    against `min(attack_skill, 95)`.  A catastrophic roll fumbles; a
//!    natural success always lands and later rolls for a critical.
//! 2. **Defense.**  The defender parries (if it prefers to and holds a
//!    weapon) or dodges.  A successful defense ends the exchange.
//! 3. **Damage.**  Weapon damage (2 unarmed) times the critical multiplier,
//!    split between target and armor by the ADS when the defender wears
//!    intact armor.
//!
//! Nothing here fails: zeroed statistics fall back to defaults with a
//! warning.

use wsim_agent::{Agent, Stat};
use wsim_core::RollSource;

use crate::roll::{RollOutcome, band};

/// Fight skill used when strength, agility, and speed are all zero.
pub const DEFAULT_FIGHT_SKILL: i32 = 50;
/// Damage of an unarmed blow.
pub const BASE_UNARMED_DAMAGE: i32 = 2;
/// Ceiling on the to-hit threshold.
pub const MAX_HIT_CHANCE: i32 = 95;
/// Floor and ceiling on defense and save thresholds.
pub const MIN_CHANCE: i32 = 5;
/// Share of absorption that bounds the ADS critical-penetration band.
pub const ARMOR_CRITICAL_SHARE: f64 = 0.05;

// ── Skills ────────────────────────────────────────────────────────────────────

/// `avg(strength, agility, speed) * 5`.
pub fn fight_skill(agent: &Agent) -> i32 {
    let s = &agent.statistics;
    if s.strength == 0 && s.agility == 0 && s.speed == 0 {
        tracing::warn!(agent = %agent.id, "no combat statistics; using default fight skill");
        return DEFAULT_FIGHT_SKILL;
    }
    ((s.strength + s.agility + s.speed) as f64 / 3.0 * 5.0) as i32
}

/// `avg(agility, speed) * 5`, or 0 when both are zero.
pub fn dodge_skill(agent: &Agent) -> i32 {
    let s = &agent.statistics;
    if s.agility == 0 && s.speed == 0 {
        return 0;
    }
    ((s.get(Stat::Agility) + s.get(Stat::Speed)) as f64 / 2.0 * 5.0) as i32
}

/// Parrying uses the same skill as attacking.
pub fn parry_skill(agent: &Agent) -> i32 {
    fight_skill(agent)
}

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefenseKind {
    #[default]
    None,
    Dodge,
    Parry,
    Block,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriticalLevel {
    #[default]
    Regular,
    Double,
    Triple,
    Deadly,
}

impl CriticalLevel {
    pub fn multiplier(self) -> i32 {
        match self {
            CriticalLevel::Regular => 1,
            CriticalLevel::Double  => 2,
            CriticalLevel::Triple  => 3,
            CriticalLevel::Deadly  => 10,
        }
    }

    /// `≤50` regular, `≤85` double, `≤95` triple, else deadly.
    pub fn from_percentage(roll: i32) -> Self {
        if roll <= 50 {
            CriticalLevel::Regular
        } else if roll <= 85 {
            CriticalLevel::Double
        } else if roll <= 95 {
            CriticalLevel::Triple
        } else {
            CriticalLevel::Deadly
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CriticalLevel::Regular => "regular",
            CriticalLevel::Double  => "double",
            CriticalLevel::Triple  => "triple",
            CriticalLevel::Deadly  => "deadly",
        }
    }
}

/// Worn armor.  `cumulative_damage` persists across exchanges; once it
/// reaches `stress` the armor is pierced and stops shielding its wearer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorProfile {
    pub hit_points: i32,
    /// Cumulative damage at which the armor is pierced.
    pub stress:     i32,
    /// Absorption percentage, `0..=100`.
    pub absorption: i32,

    pub cumulative_damage: i32,
    pub pierced:           bool,
}

impl ArmorProfile {
    pub fn new(hit_points: i32, stress: i32, absorption: i32) -> Self {
        Self { hit_points, stress, absorption, ..Self::default() }
    }

    /// Record `damage` taken by the armor.  Returns whether it is now pierced.
    pub fn absorb(&mut self, damage: i32) -> bool {
        let damage = damage.max(0);
        self.cumulative_damage += damage;
        self.hit_points = (self.hit_points - damage).max(0);
        if self.cumulative_damage >= self.stress {
            self.pierced = true;
        }
        self.pierced
    }

    /// Has hit points left and has not been pierced.
    #[inline]
    pub fn is_intact(&self) -> bool {
        self.hit_points > 0 && !self.pierced
    }
}

/// Attack parameters for one exchange.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Engagement {
    pub weapon_damage:         i32,
    pub weapon_skill_bonus:    i32,
    pub weapon_class:          i32,
    pub armor:                 Option<ArmorProfile>,
    pub defender_weapon_class: i32,
    pub prefer_parry:          bool,
}

impl Engagement {
    pub fn unarmed() -> Self {
        Self::default()
    }

    pub fn with_weapon(damage: i32, skill_bonus: i32, class: i32) -> Self {
        Self {
            weapon_damage:      damage,
            weapon_skill_bonus: skill_bonus,
            weapon_class:       class,
            ..Self::default()
        }
    }

    pub fn against_armor(mut self, armor: ArmorProfile) -> Self {
        self.armor = Some(armor);
        self
    }

    pub fn parried_with(mut self, defender_weapon_class: i32) -> Self {
        self.defender_weapon_class = defender_weapon_class;
        self.prefer_parry = true;
        self
    }
}

/// How one ADS roll split the damage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ArmorDamage {
    pub to_target: i32,
    pub to_armor:  i32,
    pub pierced:   bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatResult {
    pub attack_hit:       bool,
    pub defended:         bool,
    pub defense:          DefenseKind,
    pub armor_pierced:    bool,
    pub damage_to_target: i32,
    pub damage_to_armor:  i32,
    pub critical:         CriticalLevel,
    pub attack_roll:      RollOutcome,
    /// `None` when no defense was attempted.
    pub defense_roll:     Option<RollOutcome>,
    pub description:      String,
}

impl CombatResult {
    fn new(attack_roll: RollOutcome) -> Self {
        Self {
            attack_hit:       false,
            defended:         false,
            defense:          DefenseKind::None,
            armor_pierced:    false,
            damage_to_target: 0,
            damage_to_armor:  0,
            critical:         CriticalLevel::Regular,
            attack_roll,
            defense_roll:     None,
            description:      String::new(),
        }
    }
}

// ── Rolls ─────────────────────────────────────────────────────────────────────

/// Roll to hit with an already-computed `attack_skill`.
pub fn roll_to_hit(rng: &mut dyn RollSource, attack_skill: i32) -> RollOutcome {
    band(rng.percentile(), attack_skill.min(MAX_HIT_CHANCE))
}

/// Dodge roll.  An immobilized or incapacitated defender fails without
/// rolling.
pub fn roll_dodge(rng: &mut dyn RollSource, defender: &Agent, attack_skill: i32) -> RollOutcome {
    if defender.state.is_helpless() {
        return RollOutcome::Failure;
    }
    let mut skill = dodge_skill(defender);
    if !defender.state.awake {
        skill /= 4;
    }
    let modifier = ((attack_skill - 50) / 5).max(0);
    let threshold = (skill - modifier).max(MIN_CHANCE);
    let out = band(rng.percentile(), threshold);
    tracing::debug!(defender = %defender.id, threshold, outcome = %out, "dodge");
    out
}

/// Parry roll.  Fails without rolling against a heavier weapon class or
/// when the defender cannot move.
pub fn roll_parry(
    rng:                   &mut dyn RollSource,
    defender:              &Agent,
    attack_skill:          i32,
    defender_weapon_class: i32,
    attacker_weapon_class: i32,
) -> RollOutcome {
    if defender_weapon_class < attacker_weapon_class {
        tracing::debug!(
            defender = %defender.id,
            defender_weapon_class,
            attacker_weapon_class,
            "cannot parry a heavier weapon"
        );
        return RollOutcome::Failure;
    }
    if defender.state.is_helpless() {
        return RollOutcome::Failure;
    }
    let parry = parry_skill(defender);
    let modifier = parry - attack_skill;
    let min_to_parry = (parry - modifier).clamp(MIN_CHANCE, MAX_HIT_CHANCE);
    band(rng.percentile(), min_to_parry)
}

pub fn roll_critical(rng: &mut dyn RollSource) -> CriticalLevel {
    CriticalLevel::from_percentage(rng.percentile())
}

/// Split `base_damage` between target and armor.
///
/// | Roll                             | Result                               |
/// |----------------------------------|--------------------------------------|
/// | `≤ max(5, absorption × 0.05)`    | critical penetration: target full, armor half, pierced |
/// | `≤ absorption`                   | armor only: armor full               |
/// | `≤ max(5, skill − absorption)`   | partial: target half, armor quarter  |
/// | otherwise                        | deflected                            |
///
/// The armor is also pierced whenever the armor's share reaches its stress.
pub fn calculate_armor_damage(
    rng:          &mut dyn RollSource,
    attack_skill: i32,
    base_damage:  i32,
    armor:        &ArmorProfile,
) -> ArmorDamage {
    let base = base_damage.max(0);
    let effective = (attack_skill - armor.absorption).max(MIN_CHANCE);
    let critical = ((armor.absorption as f64 * ARMOR_CRITICAL_SHARE) as i32).max(MIN_CHANCE);
    let roll = rng.percentile();

    let mut dmg = ArmorDamage::default();
    if roll <= critical {
        dmg.pierced    = true;
        dmg.to_target  = base;
        dmg.to_armor   = base / 2;
        tracing::debug!(roll, critical, "ADS: critical penetration");
    } else if roll <= armor.absorption {
        dmg.to_armor = base;
        tracing::debug!(roll, absorption = armor.absorption, "ADS: armor absorbed");
    } else if roll <= effective {
        dmg.to_target = base / 2;
        dmg.to_armor  = base / 4;
        tracing::debug!(roll, effective, "ADS: partial penetration");
    } else {
        tracing::debug!(roll, effective, "ADS: deflected");
    }

    if dmg.to_armor >= armor.stress {
        dmg.pierced = true;
    }
    dmg
}

// ── Exchange ──────────────────────────────────────────────────────────────────

/// Resolve one attack of `attacker` on `defender`.
pub fn resolve_combat(
    rng:        &mut dyn RollSource,
    attacker:   &Agent,
    defender:   &Agent,
    engagement: &Engagement,
) -> CombatResult {
    let attack_skill = fight_skill(attacker) + engagement.weapon_skill_bonus;
    let attack_roll = roll_to_hit(rng, attack_skill);
    let mut result = CombatResult::new(attack_roll);

    match attack_roll {
        RollOutcome::CatastrophicFailure => {
            result.description = format!("{} critically fumbles the attack!", attacker.name);
            return result;
        }
        RollOutcome::Failure | RollOutcome::InvalidStatistic => {
            result.description = format!("{} misses {}.", attacker.name, defender.name);
            return result;
        }
        RollOutcome::Success | RollOutcome::NaturalSuccess => {}
    }

    let mut desc = format!("{} attacks {}. ", attacker.name, defender.name);

    let (defense, defense_roll) = if engagement.prefer_parry && engagement.defender_weapon_class > 0 {
        let roll = roll_parry(
            rng,
            defender,
            attack_skill,
            engagement.defender_weapon_class,
            engagement.weapon_class,
        );
        (DefenseKind::Parry, roll)
    } else {
        (DefenseKind::Dodge, roll_dodge(rng, defender, attack_skill))
    };
    result.defense      = defense;
    result.defense_roll = Some(defense_roll);

    if defense_roll.is_success() {
        result.defended = true;
        let verb = if defense == DefenseKind::Parry { "parries" } else { "dodges" };
        result.description = format!("{desc}{} {verb} the attack!", defender.name);
        return result;
    }

    result.attack_hit = true;
    if attack_roll == RollOutcome::NaturalSuccess {
        result.critical = roll_critical(rng);
    }

    let weapon = if engagement.weapon_damage > 0 {
        engagement.weapon_damage
    } else {
        BASE_UNARMED_DAMAGE
    };
    let base_damage = weapon * result.critical.multiplier();

    match engagement.armor.as_ref().filter(|a| a.is_intact()) {
        Some(armor) => {
            let ads = calculate_armor_damage(rng, attack_skill, base_damage, armor);
            result.damage_to_target = ads.to_target;
            result.damage_to_armor  = ads.to_armor;
            result.armor_pierced    = ads.pierced
                || armor.cumulative_damage + ads.to_armor >= armor.stress;

            if result.armor_pierced {
                desc.push_str("The attack pierces armor! ");
            } else if result.damage_to_target == 0 {
                desc.push_str("Armor absorbs the blow. ");
            }
        }
        None => result.damage_to_target = base_damage,
    }

    if result.critical != CriticalLevel::Regular {
        desc.push_str(&format!("{} critical! ", result.critical.as_str().to_uppercase()));
    }
    if result.damage_to_target > 0 {
        desc.push_str(&format!("{} takes {} damage", defender.name, result.damage_to_target));
        if result.damage_to_armor > 0 {
            desc.push_str(&format!(" (armor: {})", result.damage_to_armor));
        }
        desc.push('.');
    } else {
        desc.push_str("No damage dealt.");
    }
    result.description = desc;
    result
}
