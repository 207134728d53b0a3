mod search;
mod window;

pub use search::SearchCriteria;
pub use window::Window;

use crate::reservation::Reservation;

/// true when no reservation in a blocking status overlaps the window
pub fn is_window_free(existing: &[Reservation], window: &Window) -> bool {
    !existing
        .iter()
        .any(|r| r.status.blocks_availability() && r.window.overlaps(window))
}

/// stricter check used when claiming a slot (create, update, extend):
/// an unpaid pending hold also blocks, and the reservation being changed
/// must not block itself
pub fn is_window_claimable(
    existing: &[Reservation],
    window: &Window,
    exclude: Option<crate::types::ReservationId>,
) -> bool {
    !existing.iter().any(|r| {
        Some(r.id) != exclude && r.status.holds_slot() && r.window.overlaps(window)
    })
}
