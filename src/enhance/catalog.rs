//! Fixed vocabularies the enhancement pipeline draws from

/// Milestone titles, taken in order. Every initiative starts with the first.
pub const MILESTONE_TITLES: [&str; 5] = [
    "Project Initiation",
    "Stakeholder Alignment",
    "Pilot Launch",
    "Scale-Up",
    "Impact Review",
];

pub const TEAM_NAMES: [&str; 10] = [
    "Amara Okafor",
    "Lukas Brandt",
    "Priya Raman",
    "Diego Alvarez",
    "Mei Lin",
    "Jonas Eriksson",
    "Fatima Zahra",
    "Noah Williams",
    "Sofia Rossi",
    "Kenji Watanabe",
];

/// The first role always goes to the first team member
pub const TEAM_ROLES: [&str; 4] = [
    "Project Lead",
    "Sustainability Analyst",
    "Community Manager",
    "Finance Partner",
];

pub const UPDATE_MESSAGES: [&str; 6] = [
    "Kick-off workshop completed with regional partners.",
    "Vendor shortlist agreed; procurement under way.",
    "First field results are in and tracking above baseline.",
    "Volunteer sign-ups exceeded the quarterly target.",
    "Budget review approved the next funding tranche.",
    "Reporting template shared with the steering group.",
];

/// Resource names paired with their kind
pub const RESOURCES: [(&str, &str); 5] = [
    ("Project Charter", "document"),
    ("Impact Dashboard", "dashboard"),
    ("Partner Toolkit", "toolkit"),
    ("Training Video", "video"),
    ("Quarterly Deck", "presentation"),
];

pub const REPORT_SUMMARIES: [&str; 4] = [
    "Emissions reduction on track against the annual plan.",
    "Beneficiary reach grew steadily across all pilot sites.",
    "Cost per outcome fell after process changes in the field.",
    "Partner engagement held steady; two new sponsors joined.",
];

/// Note attached to each lifecycle transition, indexed by status ordinal
pub const STATUS_NOTES: [&str; 5] = [
    "Initiative proposed and scoped",
    "Delivery plan approved",
    "Initiative live with partners",
    "Delivery objectives met",
    "Outcomes under evaluation",
];

pub const CURRENCY: &str = "USD";
