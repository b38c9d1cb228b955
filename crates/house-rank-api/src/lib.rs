pub mod auth;
pub mod cors;
pub mod geoip;
pub mod graphql;
pub mod routes;
pub mod schema;
pub mod server;
pub mod state;

#[cfg(test)]
pub mod test_helpers;

pub use routes::*;
pub use schema::*;
pub use server::*;
pub use state::*;
