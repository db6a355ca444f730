//! The need hierarchy.
//!
//! Needs are grouped into four categories in priority order: physiological
//! needs outrank safety, safety outranks love, love outranks esteem.  Within
//! a category, the variant declaration order is the tie-break order used by
//! group rankings.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

label_enum! {
    /// Bodily needs: the highest-priority category.
    Physiological {
        Food         => "food",
        Water        => "water",
        Reproduction => "reproduction",
        Shelter      => "shelter",
        Clothing     => "clothing",
    }
}

label_enum! {
    Safety {
        Employment => "employment",
        Health     => "health",
        Property   => "property",
        Resources  => "resources",
        Security   => "security",
    }
}

label_enum! {
    Love {
        Connection => "connection",
        Family     => "family",
        Friendship => "friendship",
        Intimacy   => "intimacy",
    }
}

label_enum! {
    Esteem {
        Freedom     => "freedom",
        Recognition => "recognition",
        Respect     => "respect",
        SelfEsteem  => "self_esteem",
        Status      => "status",
        Strength    => "strength",
    }
}

label_enum! {
    /// The four need categories, highest priority first.
    NeedCategory {
        Physiological => "physiological",
        Safety        => "safety",
        Love          => "love",
        Esteem        => "esteem",
    }
}

// ── Need ──────────────────────────────────────────────────────────────────────

/// A specific need tagged with its category.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Need {
    Physiological(Physiological),
    Safety(Safety),
    Love(Love),
    Esteem(Esteem),
}

impl Need {
    pub fn category(self) -> NeedCategory {
        match self {
            Need::Physiological(_) => NeedCategory::Physiological,
            Need::Safety(_)        => NeedCategory::Safety,
            Need::Love(_)          => NeedCategory::Love,
            Need::Esteem(_)        => NeedCategory::Esteem,
        }
    }

    /// The specific need's lowercase label (`"food"`, `"security"`, …).
    pub fn as_str(self) -> &'static str {
        match self {
            Need::Physiological(n) => n.as_str(),
            Need::Safety(n)        => n.as_str(),
            Need::Love(n)          => n.as_str(),
            Need::Esteem(n)        => n.as_str(),
        }
    }
}

impl From<Physiological> for Need {
    fn from(n: Physiological) -> Self { Need::Physiological(n) }
}
impl From<Safety> for Need {
    fn from(n: Safety) -> Self { Need::Safety(n) }
}
impl From<Love> for Need {
    fn from(n: Love) -> Self { Need::Love(n) }
}
impl From<Esteem> for Need {
    fn from(n: Esteem) -> Self { Need::Esteem(n) }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category(), self.as_str())
    }
}

/// Parses `"category/need"`, e.g. `"physiological/food"`.
impl FromStr for Need {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cat, need) = s
            .split_once('/')
            .ok_or_else(|| CoreError::Parse(format!("need {s:?} is not category/need")))?;
        Ok(match cat.parse::<NeedCategory>()? {
            NeedCategory::Physiological => Need::Physiological(need.parse()?),
            NeedCategory::Safety        => Need::Safety(need.parse()?),
            NeedCategory::Love          => Need::Love(need.parse()?),
            NeedCategory::Esteem        => Need::Esteem(need.parse()?),
        })
    }
}
