//! Built-in action providers.
//!
//! | Provider           | Name       | Needs                         | Steps                  |
//! |--------------------|------------|-------------------------------|------------------------|
//! | [`MoveProvider`]   | `move`     | none                          | one hop per step       |
//! | [`GatherProvider`] | `gather`   | food, water, resources        | one                    |
//! | [`HuntProvider`]   | `hunt`     | food                          | until the prey falls   |
//! | [`BuildProvider`]  | `build`    | shelter, property             | `steps` (default 4)    |
//! | [`CombatProvider`] | `combat`   | none                          | `rounds` (default 1)   |
//! | [`IdleProvider`]   | `idle`     | none                          | one                    |

mod build;
mod combat;
mod gather;
mod hunt;
mod idle;
mod movement;

pub use build::BuildProvider;
pub use combat::CombatProvider;
pub use gather::GatherProvider;
pub use hunt::HuntProvider;
pub use idle::IdleProvider;
pub use movement::MoveProvider;

use wsim_agent::Agent;
use wsim_core::{AgentId, LocationId};
use wsim_rules::{ArmorProfile, Engagement};

use crate::{ActionContext, ActionRegistry, ActionResult, ProviderError, ProviderResult};

pub fn register_builtins(registry: &mut ActionRegistry) {
    registry.register(MoveProvider);
    registry.register(GatherProvider);
    registry.register(HuntProvider);
    registry.register(BuildProvider);
    registry.register(CombatProvider);
    registry.register(IdleProvider);
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn actor<'c>(ctx: &'c ActionContext<'_>, action: &ActionResult) -> ProviderResult<&'c Agent> {
    ctx.agents
        .get(action.actor)
        .ok_or(ProviderError::UnknownAgent(action.actor))
}

fn actor_location(ctx: &ActionContext<'_>, action: &ActionResult) -> ProviderResult<LocationId> {
    actor(ctx, action)?
        .location()
        .ok_or(ProviderError::NoLocation(action.actor))
}

fn target_agent(action: &ActionResult) -> ProviderResult<AgentId> {
    action
        .target
        .and_then(|t| t.agent())
        .ok_or(ProviderError::MissingTarget(action.id))
}

/// Weapon, armor and parry parameters of `action`.  Absent parameters read
/// as zero, so a bare action is an unarmed attack on an unarmored target.
///
/// Armor wear from earlier rounds is carried in `armor_worn` and
/// `armor_pierced`; see [`record_armor_wear`].
fn engagement(action: &ActionResult) -> Engagement {
    let param = |name: &str| action.param(name).unwrap_or(0) as i32;
    let mut e = Engagement::with_weapon(param("weapon_damage"), param("weapon_bonus"), param("weapon_class"));
    if param("armor_hp") > 0 {
        e = e.against_armor(ArmorProfile {
            cumulative_damage: param("armor_worn"),
            pierced:           param("armor_pierced") > 0,
            ..ArmorProfile::new(param("armor_hp"), param("armor_stress"), param("armor_absorption"))
        });
    }
    if param("parry_class") > 0 {
        e = e.parried_with(param("parry_class"));
    }
    e
}

/// Write the defender's armor state back to `action` so the next round
/// starts from the worn armor.
fn record_armor_wear(action: &mut ActionResult, engagement: &Engagement) {
    let Some(armor) = &engagement.armor else {
        return;
    };
    action.params.insert("armor_hp".to_owned(), armor.hit_points.into());
    action.params.insert("armor_worn".to_owned(), armor.cumulative_damage.into());
    action.params.insert("armor_pierced".to_owned(), i64::from(armor.pierced));
}
