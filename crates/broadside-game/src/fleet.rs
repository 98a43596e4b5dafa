//! Fleet placement validation.
//!
//! Pure and deterministic: the same inputs always produce the same
//! accept/reject decision and the same position list. The validator knows
//! nothing about the opponent's fleet.

use broadside_model::{grid, Direction, Ship, ShipClass};

use crate::PlacementError;

/// Validates a proposed placement against the ships already on the board
/// and, on success, returns the fully positioned [`Ship`].
///
/// The candidate occupies `class.length()` consecutive cells starting at
/// `anchor`, striding `+1` per step horizontally or `+GRID_WIDTH`
/// vertically. Rejections, in order of checking:
///
/// - [`PlacementError::OutOfBounds`] — any cell past the end of the board
/// - [`PlacementError::RowOverflow`] — a horizontal run leaving the
///   anchor's row
/// - [`PlacementError::Overlap`] — any cell already occupied by `existing`
pub fn place(
    existing: &[Ship],
    class: ShipClass,
    anchor: usize,
    direction: Direction,
) -> Result<Ship, PlacementError> {
    let stride = direction.stride();
    let mut positions = Vec::with_capacity(class.length());

    for step in 0..class.length() {
        let cell = anchor + step * stride;
        if !grid::in_bounds(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        positions.push(cell);
    }

    if direction == Direction::Horizontal
        && positions.iter().any(|&cell| grid::row(cell) != grid::row(anchor))
    {
        return Err(PlacementError::RowOverflow);
    }

    if positions
        .iter()
        .any(|&cell| existing.iter().any(|ship| ship.contains(cell)))
    {
        return Err(PlacementError::Overlap);
    }

    Ok(Ship {
        class,
        direction,
        positions,
    })
}

/// Roster classes not yet present in the fleet, in roster order.
pub fn missing_classes(ships: &[Ship]) -> Vec<ShipClass> {
    ShipClass::ROSTER
        .into_iter()
        .filter(|class| !ships.iter().any(|ship| ship.class == *class))
        .collect()
}

/// Full-fleet check used at setup confirmation.
///
/// The placed-ship class multiset must equal the roster exactly (one ship
/// per class), and every ship must re-validate from scratch: correct cell
/// run for its class and direction, on the board, no cross-ship overlap.
/// Re-deriving each ship from its anchor means a tampered or truncated
/// `positions` list is caught even if the class counts look right.
pub fn validate_fleet(ships: &[Ship]) -> Result<(), PlacementError> {
    for class in ShipClass::ROSTER {
        let count = ships.iter().filter(|ship| ship.class == class).count();
        if count > 1 {
            return Err(PlacementError::DuplicateClass(class));
        }
    }

    let missing = missing_classes(ships);
    if !missing.is_empty() {
        return Err(PlacementError::IncompleteFleet(missing));
    }

    let mut checked: Vec<Ship> = Vec::new();
    for ship in ships {
        let Some(&anchor) = ship.positions.first() else {
            return Err(PlacementError::MalformedShip(ship.class));
        };
        let rebuilt = place(&checked, ship.class, anchor, ship.direction)?;
        if rebuilt.positions != ship.positions {
            return Err(PlacementError::MalformedShip(ship.class));
        }
        checked.push(rebuilt);
    }

    Ok(())
}
