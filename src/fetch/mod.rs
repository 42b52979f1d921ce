pub mod offers;

pub use offers::{decode_offers, OfferFetcher};
