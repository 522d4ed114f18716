/// Database models
///
/// One module per entity. Each model owns its SQL: a `FromRow` struct, the
/// input structs for create/update operations, and associated functions for
/// the lookups the API needs (point lookup, foreign-key listing, insert,
/// delete).
///
/// The ownership chain for authorization purposes is
/// Task -> Board -> Project -> Team -> (owner_id, team_members).

pub mod activity;
pub mod board;
pub mod comment;
pub mod invitation;
pub mod membership;
pub mod project;
pub mod task;
pub mod team;
pub mod user;
