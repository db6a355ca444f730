//! How actions and interactions are written to the record store.

use serde_json::json;
use wsim_action::{ActionResult, ActionTarget, Interaction, InteractionSide};
use wsim_store::{Fields, Record};

pub const ACTION_KIND: &str = "action";
pub const INTERACTION_KIND: &str = "interaction";

/// Mutable fields of an action: what changes while it runs.
pub fn action_progress(action: &ActionResult) -> Fields {
    let mut f = Fields::new();
    f.insert("state".into(), json!(action.state.as_str()));
    f.insert("outcome".into(), json!(action.outcome.map(|o| o.as_str())));
    f.insert("interaction".into(), json!(action.interaction.map(|i| i.0)));
    f.insert("cost_ms".into(), json!(action.cost_ms));
    f.insert("steps".into(), json!(action.steps));
    f.insert("params".into(), json!(action.params));
    f
}

pub fn action_record(action: &ActionResult) -> Record {
    let (target_kind, target_id) = match action.target {
        Some(ActionTarget::Agent(a))    => (Some("agent"), Some(a.0)),
        Some(ActionTarget::Location(l)) => (Some("location"), Some(l.0)),
        None => (None, None),
    };
    let mut record = Record::new(ACTION_KIND, action.id.0)
        .with("action", action.action.as_str())
        .with("actor", action.actor.is_valid().then_some(action.actor.0))
        .with("need", action.need.map(|n| n.to_string()))
        .with("priority", action.priority)
        .with("target_kind", target_kind)
        .with("target_id", target_id);
    record.merge(action_progress(action));
    record
}

fn side(s: &InteractionSide) -> serde_json::Value {
    json!({
        "agent":     s.agent.0,
        "alignment": s.alignment.as_str(),
        "threat":    s.threat.as_str(),
        "role":      s.role.as_str(),
        "reason":    s.reason.as_str(),
        "outcome":   s.outcome.map(|o| o.as_str()),
    })
}

/// Outcome fields of an interaction.
pub fn interaction_outcome(interaction: &Interaction) -> Fields {
    let mut f = Fields::new();
    f.insert("actor".into(), side(&interaction.actor));
    f.insert("interactor".into(), side(&interaction.interactor));
    f.insert("resolved".into(), json!(interaction.is_resolved()));
    f
}

pub fn interaction_record(interaction: &Interaction) -> Record {
    let mut record = Record::new(INTERACTION_KIND, interaction.id.0)
        .with("kind", interaction.kind.as_str())
        .with("polarity", interaction.polarity().as_str())
        .with("start", interaction.start)
        .with("end", interaction.end)
        .with("description", interaction.description.as_str());
    record.merge(interaction_outcome(interaction));
    record
}
