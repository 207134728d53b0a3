use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{FuelType, Transmission, Vehicle, VehicleCategory};

/// fleet search filters; every field optional, all set fields must match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub location: Option<String>,
    pub category: Option<VehicleCategory>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub min_seats: Option<u8>,
    pub max_daily_rate: Option<Money>,
}

impl SearchCriteria {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(location) = &self.location {
            if !vehicle.location.eq_ignore_ascii_case(location) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if vehicle.category != category {
                return false;
            }
        }
        if let Some(fuel) = self.fuel_type {
            if vehicle.fuel_type != fuel {
                return false;
            }
        }
        if let Some(transmission) = self.transmission {
            if vehicle.transmission != transmission {
                return false;
            }
        }
        if let Some(seats) = self.min_seats {
            if vehicle.seats < seats {
                return false;
            }
        }
        if let Some(max_rate) = self.max_daily_rate {
            if vehicle.daily_rate > max_rate {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn suv() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            daily_rate: Money::from_major(500),
            hourly_rate: Money::from_major(30),
            security_deposit: Money::from_major(1000),
            available: true,
            location: "Airport".to_string(),
            category: VehicleCategory::Suv,
            fuel_type: FuelType::Diesel,
            transmission: Transmission::Automatic,
            seats: 7,
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        assert!(SearchCriteria::default().matches(&suv()));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let criteria = SearchCriteria {
            location: Some("airport".to_string()), // case-insensitive
            category: Some(VehicleCategory::Suv),
            min_seats: Some(5),
            max_daily_rate: Some(Money::from_major(600)),
            ..Default::default()
        };
        assert!(criteria.matches(&suv()));

        // one failing filter rejects the vehicle
        let too_cheap = SearchCriteria {
            max_daily_rate: Some(Money::from_major(400)),
            ..criteria.clone()
        };
        assert!(!too_cheap.matches(&suv()));

        let wrong_fuel = SearchCriteria {
            fuel_type: Some(FuelType::Electric),
            ..criteria
        };
        assert!(!wrong_fuel.matches(&suv()));
    }

    #[test]
    fn test_seat_boundary() {
        let exactly = SearchCriteria {
            min_seats: Some(7),
            ..Default::default()
        };
        assert!(exactly.matches(&suv()));

        let more = SearchCriteria {
            min_seats: Some(8),
            ..Default::default()
        };
        assert!(!more.matches(&suv()));
    }
}
