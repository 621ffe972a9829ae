//! Fetch a Letterboxd profile's films from its RSS feed and its paginated
//! watched-films and watchlist pages.

pub mod client;
pub mod config;
pub mod error;
pub mod film;
pub mod paginate;
pub mod parser;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::Letterboxd;
pub use config::Config;
pub use error::{Error, Result};
pub use film::Film;
pub use paginate::ListingKind;
pub use transport::{HttpTransport, RequestOptions, Response, Transport};
