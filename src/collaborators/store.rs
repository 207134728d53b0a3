use std::collections::HashMap;

use crate::errors::{EngineError, Result};
use crate::reservation::Reservation;
use crate::types::{Member, MemberId, ReservationId, Vehicle, VehicleId};

/// transactional repository boundary the engine reads and writes through.
///
/// implementations map missing rows to `NotFound` and transient failures to
/// `StoreUnavailable`. `create_reservation` and `extend_reservation` on the
/// engine must run inside a serializing scope (row lock or equivalent) that
/// the implementation's transaction provides; the engine never locks itself.
pub trait ReservationStore {
    fn vehicle(&self, id: VehicleId) -> Result<Vehicle>;
    fn member(&self, id: MemberId) -> Result<Member>;
    fn reservation(&self, id: ReservationId) -> Result<Reservation>;
    /// every reservation referencing the vehicle, regardless of status
    fn reservations_for_vehicle(&self, id: VehicleId) -> Result<Vec<Reservation>>;
    fn vehicles(&self) -> Result<Vec<Vehicle>>;
    fn insert_reservation(&mut self, reservation: Reservation) -> Result<()>;
    fn update_reservation(&mut self, reservation: Reservation) -> Result<()>;
    fn update_member(&mut self, member: Member) -> Result<()>;
}

/// in-memory store for tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    vehicles: HashMap<VehicleId, Vehicle>,
    members: HashMap<MemberId, Member>,
    reservations: HashMap<ReservationId, Reservation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.insert(member.id, member);
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }
}

impl ReservationStore for MemoryStore {
    fn vehicle(&self, id: VehicleId) -> Result<Vehicle> {
        self.vehicles
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { entity: "vehicle", id })
    }

    fn member(&self, id: MemberId) -> Result<Member> {
        self.members
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { entity: "member", id })
    }

    fn reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.reservations
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { entity: "reservation", id })
    }

    fn reservations_for_vehicle(&self, id: VehicleId) -> Result<Vec<Reservation>> {
        Ok(self
            .reservations
            .values()
            .filter(|r| r.vehicle_id == id)
            .cloned()
            .collect())
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.vehicles.values().cloned().collect())
    }

    fn insert_reservation(&mut self, reservation: Reservation) -> Result<()> {
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    fn update_reservation(&mut self, reservation: Reservation) -> Result<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(EngineError::NotFound {
                entity: "reservation",
                id: reservation.id,
            });
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    fn update_member(&mut self, member: Member) -> Result<()> {
        if !self.members.contains_key(&member.id) {
            return Err(EngineError::NotFound {
                entity: "member",
                id: member.id,
            });
        }
        self.members.insert(member.id, member);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_missing_rows_are_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.vehicle(id).unwrap_err(),
            EngineError::NotFound { entity: "vehicle", .. }
        ));
        assert!(matches!(
            store.member(id).unwrap_err(),
            EngineError::NotFound { entity: "member", .. }
        ));
        assert!(matches!(
            store.reservation(id).unwrap_err(),
            EngineError::NotFound { entity: "reservation", .. }
        ));
    }

    #[test]
    fn test_member_round_trip() {
        let mut store = MemoryStore::new();
        let mut member = Member::new(Uuid::new_v4());
        store.add_member(member.clone());

        member.loyalty_points = 500;
        store.update_member(member.clone()).unwrap();
        assert_eq!(store.member(member.id).unwrap().loyalty_points, 500);
    }
}
