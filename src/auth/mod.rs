pub mod config;
mod extractors;
pub mod jwt;
mod middleware;
mod principal;

pub use extractors::{AuthedUser, CourierPrincipal, CustomerPrincipal};
pub use middleware::AuthLayer;
pub use principal::Principal;
