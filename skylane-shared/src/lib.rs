pub mod models;

pub use models::enums::{CabinClass, PassengerType, PlaceType, WireEnum};
pub use models::offers::{
    Airline, AvailableService, Offer, OfferPassenger, OfferRequestOffer, OfferSegment, OfferSlice,
};
pub use models::places::Place;
