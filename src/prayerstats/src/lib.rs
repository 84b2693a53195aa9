#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;

pub mod api;
pub use api::AladhanClient;

pub mod geocode;
pub use geocode::{GeocodeError, GeocodingClient, Place};

pub mod render;

mod store;
pub use store::{ResultStore, StoredResults};

mod prayerstats;
pub use prayerstats::{Calculation, Location, PrayerStats, export};
