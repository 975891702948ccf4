//! Display-order planning for event pages.
//!
//! Moves are single-step: a page swaps with its immediate neighbour in
//! display order. After the swap the whole sequence is re-normalized to
//! contiguous `0..N-1` positions, which also heals gaps or duplicate
//! positions left behind by earlier deletions.

use uuid::Uuid;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// One entry of an event's pages in display order.
#[derive(Debug, Clone, Copy)]
pub struct OrderEntry {
    pub id: Uuid,
    pub position: i32,
}

/// A position update that must be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionChange {
    pub id: Uuid,
    pub position: i32,
}

/// Plan a single-step move of the entry at `target` within `ordered`.
///
/// `ordered` must already be sorted by display order (`(position, title)`).
/// Moving the first entry up or the last entry down is a no-op for the
/// sequence itself; re-normalization still runs, so the result lists every
/// entry whose stored position differs from its index afterwards.
#[must_use]
pub fn plan_move(
    ordered: &[OrderEntry],
    target: usize,
    direction: MoveDirection,
) -> Vec<PositionChange> {
    let mut sequence = ordered.to_vec();

    match direction {
        MoveDirection::Up if target > 0 => sequence.swap(target - 1, target),
        MoveDirection::Down if target + 1 < sequence.len() => sequence.swap(target, target + 1),
        // Already at the boundary; not an error.
        _ => {}
    }

    sequence
        .iter()
        .enumerate()
        .filter(|(index, entry)| entry.position != *index as i32)
        .map(|(index, entry)| PositionChange {
            id: entry.id,
            position: index as i32,
        })
        .collect()
}
