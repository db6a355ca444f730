//! Interaction taxonomy shared by the evaluators, the scheduler, and the
//! action providers.
//!
//! Every [`InteractionKind`] carries a static [`Polarity`] and, for the
//! hostile kinds, the [`ThreatKind`] it represents.  [`Outcome`] is the
//! five-point scale an interaction side resolves to.

use crate::alignment::Comparator;

// ── Polarity ──────────────────────────────────────────────────────────────────

label_enum! {
    /// Static classification of an interaction kind.
    Polarity {
        Positive => "positive",
        Neutral  => "neutral",
        Negative => "negative",
    }
}

// ── InteractionKind ───────────────────────────────────────────────────────────

label_enum! {
    /// The closed set of dyadic exchanges between two agents.
    InteractionKind {
        Unknown          => "unknown",
        None             => "none",
        Accommodate      => "accommodate",
        Ally             => "ally",
        Barter           => "barter",
        Befriend         => "befriend",
        Betray           => "betray",
        BreakUp          => "break_up",
        Coerce           => "coerce",
        Combat           => "combat",
        Commerce         => "commerce",
        Communicate      => "communicate",
        Companionship    => "companionship",
        Compete          => "compete",
        Conflict         => "conflict",
        Congregate       => "congregate",
        Cooperate        => "cooperate",
        Correspond       => "correspond",
        Criticize        => "criticize",
        Date             => "date",
        Debate           => "debate",
        Defend           => "defend",
        Entertain        => "entertain",
        Exchange         => "exchange",
        ExpressGratitude => "express_gratitude",
        Help             => "help",
        Intimate         => "intimate",
        Investigate      => "investigate",
        Mentor           => "mentor",
        Negotiate        => "negotiate",
        Oppose           => "oppose",
        PeerPressure     => "peer_pressure",
        Recreate         => "recreate",
        Relate           => "relate",
        Romance          => "romance",
        Shun             => "shun",
        Socialize        => "socialize",
        Threaten         => "threaten",
    }
}

impl InteractionKind {
    pub fn polarity(self) -> Polarity {
        use InteractionKind::*;
        match self {
            Accommodate | Ally | Befriend | Companionship | Cooperate | Date | Entertain
            | ExpressGratitude | Intimate | Mentor | Recreate | Relate | Romance | Socialize
            | Congregate | Defend => Polarity::Positive,

            Betray | BreakUp | Coerce | Combat | Conflict | Criticize | Oppose | PeerPressure
            | Shun | Threaten => Polarity::Negative,

            _ => Polarity::Neutral,
        }
    }

    /// The threat this kind of exchange poses to its receiving side.
    pub fn threat(self) -> ThreatKind {
        match self {
            InteractionKind::Coerce                     => ThreatKind::PsychologicalThreat,
            InteractionKind::Combat
            | InteractionKind::Conflict
            | InteractionKind::Threaten                 => ThreatKind::PhysicalThreat,
            InteractionKind::Criticize                  => ThreatKind::VerbalThreat,
            InteractionKind::PeerPressure               => ThreatKind::SocialThreat,
            InteractionKind::Oppose                     => ThreatKind::IdeologicalThreat,
            _                                           => ThreatKind::None,
        }
    }
}

// ── ThreatKind ────────────────────────────────────────────────────────────────

label_enum! {
    /// What one agent represents to another.
    ///
    /// `*Threat` kinds are directed at the other side; `*Target` kinds mean
    /// the source has exposed itself and become the prey.
    ThreatKind {
        None                => "none",
        AnimalThreat        => "animal_threat",
        AnimalTarget        => "animal_target",
        PersonalThreat      => "personal_threat",
        PersonalTarget      => "personal_target",
        PhysicalThreat      => "physical_threat",
        PhysicalTarget      => "physical_target",
        PsychologicalThreat => "psychological_threat",
        PsychologicalTarget => "psychological_target",
        SocialThreat        => "social_threat",
        SocialTarget        => "social_target",
        IdeologicalThreat   => "ideological_threat",
        IdeologicalTarget   => "ideological_target",
        VerbalThreat        => "verbal_threat",
        VerbalTarget        => "verbal_target",
        ExistentialThreat   => "existential_threat",
    }
}

impl ThreatKind {
    /// The target counterpart of a threat kind.  Target kinds, `None`, and
    /// `ExistentialThreat` map to themselves.
    pub fn target(self) -> ThreatKind {
        use ThreatKind::*;
        match self {
            AnimalThreat        => AnimalTarget,
            PersonalThreat      => PersonalTarget,
            PhysicalThreat      => PhysicalTarget,
            PsychologicalThreat => PsychologicalTarget,
            SocialThreat        => SocialTarget,
            IdeologicalThreat   => IdeologicalTarget,
            VerbalThreat        => VerbalTarget,
            other               => other,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == ThreatKind::None
    }

    pub fn is_target(self) -> bool {
        self != ThreatKind::None && self.target() == self && self != ThreatKind::ExistentialThreat
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

label_enum! {
    /// Five-point resolution scale, worst first.
    Outcome {
        VeryUnfavorable => "very_unfavorable",
        Unfavorable     => "unfavorable",
        Equilibrium     => "equilibrium",
        Favorable       => "favorable",
        VeryFavorable   => "very_favorable",
    }
}

impl Outcome {
    /// Signed position on the scale: `-2..=2`.
    pub fn value(self) -> i8 {
        match self {
            Outcome::VeryUnfavorable => -2,
            Outcome::Unfavorable     => -1,
            Outcome::Equilibrium     => 0,
            Outcome::Favorable       => 1,
            Outcome::VeryFavorable   => 2,
        }
    }

    pub fn compare(self, other: Outcome) -> Comparator {
        Comparator::of(self.value(), other.value())
    }

    /// The mirror outcome for the opposite side of an exchange.
    pub fn inverse(self) -> Outcome {
        match self {
            Outcome::VeryUnfavorable => Outcome::VeryFavorable,
            Outcome::Unfavorable     => Outcome::Favorable,
            Outcome::Equilibrium     => Outcome::Equilibrium,
            Outcome::Favorable       => Outcome::Unfavorable,
            Outcome::VeryFavorable   => Outcome::VeryUnfavorable,
        }
    }
}

// ── Reason / Role ─────────────────────────────────────────────────────────────

label_enum! {
    /// Why a side took part in an interaction.
    Reason {
        Unknown             => "unknown",
        None                => "none",
        Attraction          => "attraction",
        AttractiveNarcissism => "attractive_narcissism",
        Immaturity          => "immaturity",
        Instinct            => "instinct",
        Intimacy            => "intimacy",
        LessAttractive      => "less_attractive",
        Machiavellianism    => "machiavellianism",
        Maturity            => "maturity",
        Psychopathy         => "psychopathy",
        Sane                => "sane",
        Senility            => "senility",
        Sensuality          => "sensuality",
    }
}

label_enum! {
    /// Narrative role of one side of an interaction.
    Role {
        Unknown       => "unknown",
        Indeterminate => "indeterminate",
        Protagonist   => "protagonist",
        Antagonist    => "antagonist",
        Supporting    => "supporting",
    }
}
