//! Static per-domain policy table.
//!
//! Every policy attribute hangs off this one table rather than branching at
//! call sites, so the two central invariants stay enforceable in one place:
//!
//! 1. Each "requires" flag is true for exactly one domain.
//! 2. Suggested cognitive load is strictly ordered
//!    `Obvious < Complicated < Disorder < Complex < Chaotic`.

use weir_core::model::taxonomy::{CynefinDomain, WorkParadigm};

/// Policy attributes of one complexity domain.
#[derive(Debug, Clone, Copy)]
pub struct DomainProfile {
    pub domain: CynefinDomain,
    /// Display description.
    pub description: &'static str,
    /// Recommended response pattern.
    pub approach: &'static str,
    /// True only for Complicated.
    pub requires_expert_analysis: bool,
    /// True only for Complex.
    pub requires_experimentation: bool,
    /// True only for Chaotic.
    pub requires_immediate_action: bool,
    /// True only for Disorder.
    pub requires_clarification: bool,
    /// Paradigms that make sense in this domain.
    pub compatible_paradigms: &'static [WorkParadigm],
    /// Suggested cognitive load on the 1–10 ordinal scale.
    pub suggested_load: u8,
}

/// Top of the cognitive-load scale (Chaotic sits here).
pub const MAX_LOAD: u8 = 10;

/// The full policy table, in `CynefinDomain::ALL` order.
pub const PROFILES: [DomainProfile; 5] = [
    DomainProfile {
        domain: CynefinDomain::Obvious,
        description: "Cause and effect are clear; best practice applies",
        approach: "sense, categorize, respond",
        requires_expert_analysis: false,
        requires_experimentation: false,
        requires_immediate_action: false,
        requires_clarification: false,
        compatible_paradigms: &[WorkParadigm::Task, WorkParadigm::Story],
        suggested_load: 2,
    },
    DomainProfile {
        domain: CynefinDomain::Complicated,
        description: "Cause and effect need analysis; good practice applies",
        approach: "sense, analyze, respond",
        requires_expert_analysis: true,
        requires_experimentation: false,
        requires_immediate_action: false,
        requires_clarification: false,
        compatible_paradigms: &[
            WorkParadigm::Task,
            WorkParadigm::Story,
            WorkParadigm::Epic,
            WorkParadigm::Research,
        ],
        suggested_load: 5,
    },
    DomainProfile {
        domain: CynefinDomain::Complex,
        description: "Cause and effect only visible in retrospect; emergent practice",
        approach: "probe, sense, respond",
        requires_expert_analysis: false,
        requires_experimentation: true,
        requires_immediate_action: false,
        requires_clarification: false,
        compatible_paradigms: &[
            WorkParadigm::Experiment,
            WorkParadigm::Research,
            WorkParadigm::Epic,
        ],
        suggested_load: 8,
    },
    DomainProfile {
        domain: CynefinDomain::Chaotic,
        description: "No cause and effect at system level; act to stabilize",
        approach: "act, sense, respond",
        requires_expert_analysis: false,
        requires_experimentation: false,
        requires_immediate_action: true,
        requires_clarification: false,
        compatible_paradigms: &[WorkParadigm::Incident],
        suggested_load: MAX_LOAD,
    },
    DomainProfile {
        domain: CynefinDomain::Disorder,
        description: "Not yet classified or ambiguous; resolve before acting",
        approach: "gather information, stabilize, reassess",
        requires_expert_analysis: false,
        requires_experimentation: false,
        requires_immediate_action: false,
        requires_clarification: true,
        // Nothing can be ruled out before classification resolves.
        compatible_paradigms: &WorkParadigm::ALL,
        suggested_load: 6,
    },
];

/// Look up the profile for `domain`.
#[must_use]
pub const fn profile(domain: CynefinDomain) -> &'static DomainProfile {
    match domain {
        CynefinDomain::Obvious => &PROFILES[0],
        CynefinDomain::Complicated => &PROFILES[1],
        CynefinDomain::Complex => &PROFILES[2],
        CynefinDomain::Chaotic => &PROFILES[3],
        CynefinDomain::Disorder => &PROFILES[4],
    }
}
