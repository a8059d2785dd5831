// handlers/mod.rs - Three handler tiers
//
// Public (no token) → Protected (session token) → Elevated (admin session)
//
// Every tier sits behind `session_auth_middleware`; public paths get through
// it via the allow-list, elevated handlers additionally take `AdminAccount`.
pub mod elevated;
pub mod protected;
pub mod public;

mod validation;
