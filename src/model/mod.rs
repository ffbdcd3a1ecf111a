//! Data model: raw initiatives, their enhanced projection, and users

pub mod enhanced;
pub mod initiative;
pub mod user;

pub use enhanced::{
    Budget, EnhancedInitiative, ImpactReport, InitiativeStatus, Milestone, ProjectUpdate,
    Resource, StatusChange, TeamMember,
};
pub use initiative::{Initiative, InitiativeId};
pub use user::{NewUser, Participation, ParticipationKind, PublicUser, UserRecord};
