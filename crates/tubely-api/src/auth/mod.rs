//! Bearer-token authentication
//!
//! Callers present `Authorization: Bearer <jwt>`; the token is an HS256 JWT signed
//! with `JWT_SECRET` whose `sub` claim is the user's UUID.

pub mod extractor;
pub mod jwt;

pub use extractor::{authenticate, bearer_token, AuthUser};
pub use jwt::{Claims, JwtService};
