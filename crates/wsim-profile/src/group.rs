//! Aggregate needs across a group.

use std::collections::BTreeMap;

use wsim_core::{AgentId, Esteem, Love, Need, NeedCategory, Physiological, Safety};

use crate::Profile;

/// Per-need counts for a group, each category ranked by descending count.
///
/// Ties keep the need's declaration order; needs no member has are left
/// out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupProfile {
    pub members:       usize,
    pub physiological: Vec<(Physiological, usize)>,
    pub safety:        Vec<(Safety, usize)>,
    pub love:          Vec<(Love, usize)>,
    pub esteem:        Vec<(Esteem, usize)>,
    /// Each member's item count divided by the group's largest.
    pub wealth:        BTreeMap<AgentId, f64>,
}

fn rank<T: Copy>(all: &[T], count: impl Fn(T) -> usize) -> Vec<(T, usize)> {
    let mut ranked: Vec<(T, usize)> = all
        .iter()
        .map(|n| (*n, count(*n)))
        .filter(|(_, c)| *c > 0)
        .collect();
    // Stable: equal counts stay in declaration order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

impl GroupProfile {
    pub fn from_profiles<'a, I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = &'a Profile>,
    {
        let members: Vec<&Profile> = profiles.into_iter().collect();
        let count = |need: Need| members.iter().filter(|p| p.needs.contains(need)).count();

        let max_items = members.iter().map(|p| p.items).max().unwrap_or(0);
        let wealth = members
            .iter()
            .map(|p| {
                let share = if max_items == 0 { 0.0 } else { p.items as f64 / max_items as f64 };
                (p.id, share)
            })
            .collect();

        Self {
            members:       members.len(),
            physiological: rank(Physiological::ALL, |n| count(n.into())),
            safety:        rank(Safety::ALL, |n| count(n.into())),
            love:          rank(Love::ALL, |n| count(n.into())),
            esteem:        rank(Esteem::ALL, |n| count(n.into())),
            wealth,
        }
    }

    /// Members with `need`.
    pub fn count(&self, need: Need) -> usize {
        fn find<T: PartialEq>(ranked: &[(T, usize)], n: T) -> usize {
            ranked.iter().find(|(x, _)| *x == n).map_or(0, |(_, c)| *c)
        }
        match need {
            Need::Physiological(n) => find(&self.physiological, n),
            Need::Safety(n)        => find(&self.safety, n),
            Need::Love(n)          => find(&self.love, n),
            Need::Esteem(n)        => find(&self.esteem, n),
        }
    }

    /// Fraction of members with `need`; 0 for an empty group.
    pub fn share(&self, need: Need) -> f64 {
        if self.members == 0 {
            return 0.0;
        }
        self.count(need) as f64 / self.members as f64
    }

    /// The ranked needs of one category.
    pub fn ranked(&self, category: NeedCategory) -> Vec<(Need, usize)> {
        match category {
            NeedCategory::Physiological => self.physiological.iter().map(|(n, c)| ((*n).into(), *c)).collect(),
            NeedCategory::Safety        => self.safety.iter().map(|(n, c)| ((*n).into(), *c)).collect(),
            NeedCategory::Love          => self.love.iter().map(|(n, c)| ((*n).into(), *c)).collect(),
            NeedCategory::Esteem        => self.esteem.iter().map(|(n, c)| ((*n).into(), *c)).collect(),
        }
    }

    /// Every ranked need, category by category in priority order.
    pub fn priorities(&self) -> Vec<(Need, usize)> {
        NeedCategory::ALL.iter().flat_map(|c| self.ranked(*c)).collect()
    }
}
