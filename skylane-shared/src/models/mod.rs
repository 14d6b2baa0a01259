pub mod enums;
pub mod offers;
pub mod places;
