//! Database repositories
//!
//! Repositories handle all direct database interactions. Functions that take
//! a generic `PgExecutor` can run against the pool or inside a transaction.

pub mod invitation_repo;
pub mod match_repo;
pub mod medal_repo;
pub mod role_repo;
pub mod token_repo;
pub mod tournament_repo;
pub mod user_repo;

pub use invitation_repo::InvitationRepository;
pub use match_repo::{MatchFilter, MatchRepository, NewMatch};
pub use medal_repo::MedalRepository;
pub use role_repo::RoleRepository;
pub use token_repo::TokenRepository;
pub use tournament_repo::TournamentRepository;
pub use user_repo::{UserChanges, UserRepository};
