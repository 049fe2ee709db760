//! Business logic services

pub mod auth_service;
pub mod authorization;
pub mod invitation_service;
pub mod match_service;
pub mod medal_service;
pub mod role_service;
pub mod tournament_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use authorization::{AuthorizationService, PermissionStore, PgPermissionStore};
pub use invitation_service::{InvitationService, InviteOutcome};
pub use match_service::{MatchService, MatchSubmission, VerificationStatus};
pub use medal_service::MedalService;
pub use role_service::{RoleService, RoleWithPermissions};
pub use tournament_service::{StandingsEntry, StandingsView, TournamentService};
pub use user_service::{UserService, UserUpdate};
