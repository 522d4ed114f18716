/// Authentication and authorization
///
/// Split in two halves with a deliberate seam between them:
///
/// - **Who is calling**: `session` resolves a bearer token against the auth
///   provider's sessions table; `middleware` turns that into an
///   `AuthContext` in axum request extensions.
/// - **What they may do**: `scope` resolves any entity up its ancestor
///   chain to the owning team plus the caller's membership row, and
///   `authorization` is the pure decision function evaluated against that
///   pair. The decision function performs no I/O and holds no state.

pub mod authorization;
pub mod middleware;
pub mod scope;
pub mod session;
