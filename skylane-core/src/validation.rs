//! Domain checks that the wire shapes deliberately do not enforce.
//!
//! Nothing here runs during decoding. Callers decide when to validate and
//! what to do with the report; in particular a passenger with both (or
//! neither) of `age` and `type` is flagged, not corrected.

use std::collections::HashSet;
use std::fmt;

use crate::offer_requests::{CreateOfferRequest, OfferRequest, PlaceRef};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    NoSlices,
    NoPassengers,
    PassengerAgeAndType { index: usize },
    PassengerMissingAgeAndType { index: usize },
    SameOriginAndDestination { index: usize, iata_code: String },
    DuplicatePassengerId { id: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoSlices => write!(f, "at least one slice is required"),
            ValidationIssue::NoPassengers => write!(f, "at least one passenger is required"),
            ValidationIssue::PassengerAgeAndType { index } => {
                write!(f, "passengers[{index}] sets both age and type")
            }
            ValidationIssue::PassengerMissingAgeAndType { index } => {
                write!(f, "passengers[{index}] sets neither age nor type")
            }
            ValidationIssue::SameOriginAndDestination { index, iata_code } => {
                write!(f, "slices[{index}] departs from and arrives at {iata_code}")
            }
            ValidationIssue::DuplicatePassengerId { id } => {
                write!(f, "passenger id {id} appears more than once")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_result(self) -> CoreResult<()> {
        if self.is_clean() {
            return Ok(());
        }
        let joined = self
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CoreError::ValidationError(joined))
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

pub trait Validate {
    fn validate(&self) -> ValidationReport;
}

fn check_passenger(report: &mut ValidationReport, index: usize, has_age: bool, has_type: bool) {
    match (has_age, has_type) {
        (true, true) => report.push(ValidationIssue::PassengerAgeAndType { index }),
        (false, false) => report.push(ValidationIssue::PassengerMissingAgeAndType { index }),
        _ => {}
    }
}

fn check_slices<'a>(
    report: &mut ValidationReport,
    slices: impl ExactSizeIterator<Item = (&'a PlaceRef, &'a PlaceRef)>,
) {
    if slices.len() == 0 {
        report.push(ValidationIssue::NoSlices);
    }
    for (index, (origin, destination)) in slices.enumerate() {
        if origin.same_place(destination) {
            report.push(ValidationIssue::SameOriginAndDestination {
                index,
                iata_code: origin.iata_code().to_string(),
            });
        }
    }
}

impl Validate for CreateOfferRequest {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        check_slices(
            &mut report,
            self.slices.iter().map(|s| (&s.origin, &s.destination)),
        );

        if self.passengers.is_empty() {
            report.push(ValidationIssue::NoPassengers);
        }
        for (index, passenger) in self.passengers.iter().enumerate() {
            check_passenger(
                &mut report,
                index,
                passenger.age.is_some(),
                passenger.passenger_type.is_some(),
            );
        }
        report
    }
}

impl Validate for OfferRequest {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        check_slices(
            &mut report,
            self.slices.iter().map(|s| (&s.origin, &s.destination)),
        );

        if self.passengers.is_empty() {
            report.push(ValidationIssue::NoPassengers);
        }
        let mut seen = HashSet::new();
        for (index, passenger) in self.passengers.iter().enumerate() {
            check_passenger(
                &mut report,
                index,
                passenger.age.is_some(),
                passenger.passenger_type.is_some(),
            );
            if !seen.insert(passenger.id.as_str()) {
                report.push(ValidationIssue::DuplicatePassengerId {
                    id: passenger.id.clone(),
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skylane_shared::{CabinClass, PassengerType};

    use crate::offer_requests::{CreateOfferRequestPassenger, CreateOfferRequestSlice};

    fn departure() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, 24).unwrap()
    }

    #[test]
    fn test_clean_request() {
        let request = CreateOfferRequest::new(CabinClass::Economy)
            .with_slice(CreateOfferRequestSlice::new("LHR", "JFK", departure()))
            .with_passenger(CreateOfferRequestPassenger::adult())
            .with_passenger(CreateOfferRequestPassenger::aged(9));

        let report = request.validate();
        assert!(report.is_clean());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_age_and_type_flags() {
        let both = CreateOfferRequestPassenger {
            age: Some(30),
            passenger_type: Some(PassengerType::Adult),
        };
        let neither = CreateOfferRequestPassenger {
            age: None,
            passenger_type: None,
        };
        let request = CreateOfferRequest::new(CabinClass::Economy)
            .with_slice(CreateOfferRequestSlice::new("LHR", "JFK", departure()))
            .with_passenger(both)
            .with_passenger(neither);

        let report = request.validate();
        assert_eq!(
            report.issues(),
            &[
                ValidationIssue::PassengerAgeAndType { index: 0 },
                ValidationIssue::PassengerMissingAgeAndType { index: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_request() {
        let report = CreateOfferRequest::new(CabinClass::First).validate();
        assert_eq!(
            report.issues(),
            &[ValidationIssue::NoSlices, ValidationIssue::NoPassengers]
        );

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("at least one slice"));
    }

    #[test]
    fn test_same_origin_and_destination() {
        let request = CreateOfferRequest::new(CabinClass::Economy)
            .with_slice(CreateOfferRequestSlice::new("LHR", "lhr", departure()))
            .with_passenger(CreateOfferRequestPassenger::adult());

        assert_eq!(
            request.validate().issues(),
            &[ValidationIssue::SameOriginAndDestination {
                index: 0,
                iata_code: "LHR".to_string()
            }]
        );
    }
}
