//! Recomputes the ship's derived fields from its source-of-truth collections.
//!
//! Mutating operations never touch `weapons`, `systems`, or `slots_used`
//! directly; they finish with [`sync_ship`] instead.

use crate::constants::{CARGO_SLOT_WEIGHT, HULL_MAX, SHIELDS_MAX};
use crate::numbers::{ceil_f64_to_u32, usize_to_u64, u64_to_u32};
use crate::state::{CargoStack, GameState, Ship};

/// Slots a single cargo stack occupies, batched by weight.
#[must_use]
pub fn cargo_slots(stack: &CargoStack) -> u32 {
    let total = f64::from(stack.qty) * stack.unit_weight;
    ceil_f64_to_u32(total / CARGO_SLOT_WEIGHT)
}

/// Slots the ship would occupy with the given contents.
#[must_use]
pub fn slots_for(ship: &Ship) -> u32 {
    let crew = u64_to_u32(usize_to_u64(ship.crew.len()));
    let gear = u64_to_u32(usize_to_u64(ship.equipment.len()));
    let cargo = ship
        .cargo
        .iter()
        .filter(|stack| stack.qty > 0)
        .map(cargo_slots)
        .fold(0_u32, u32::saturating_add);
    crew.saturating_add(gear).saturating_add(cargo)
}

/// Idempotent normalization pass over the ship.
pub fn sync_ship(ship: &mut Ship) {
    ship.stats.hull = ship.stats.hull.min(HULL_MAX);
    ship.stats.shields = ship.stats.shields.min(SHIELDS_MAX);
    ship.cargo.retain(|stack| stack.qty > 0);
    let (weapons, systems): (Vec<_>, Vec<_>) = ship
        .equipment
        .iter()
        .cloned()
        .partition(|part| part.kind.is_weapon());
    ship.weapons = weapons;
    ship.systems = systems;
    ship.stats.slots_used = slots_for(ship);
}

pub fn sync_state(state: &mut GameState) {
    sync_ship(&mut state.ship);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::part_spec;
    use crate::state::ShipPart;

    fn stack(qty: u32, unit_weight: f64) -> CargoStack {
        CargoStack {
            name: "Test Goods".to_string(),
            qty,
            unit_value: 10,
            unit_weight,
            kind: "Tech".to_string(),
        }
    }

    #[test]
    fn cargo_batches_round_up_per_stack() {
        assert_eq!(cargo_slots(&stack(5, 0.5)), 1);
        assert_eq!(cargo_slots(&stack(20, 1.0)), 1);
        assert_eq!(cargo_slots(&stack(21, 1.0)), 2);
        assert_eq!(cargo_slots(&stack(0, 1.0)), 0);
    }

    #[test]
    fn sync_is_idempotent() {
        let mut state = GameState::fresh();
        state.ship.cargo.push(stack(45, 1.0));
        sync_state(&mut state);
        let first = state.ship.clone();
        sync_state(&mut state);
        assert_eq!(state.ship, first);
        // captain + two parts + nutri-paste + three batches
        assert_eq!(state.ship.stats.slots_used, 1 + 2 + 1 + 3);
    }

    #[test]
    fn views_partition_equipment() {
        let mut state = GameState::fresh();
        for name in ["Railgun", "Hyperdrive", "Scanner Array"] {
            let spec = part_spec(name).expect("catalog part");
            state.ship.equipment.push(ShipPart::from(spec));
        }
        sync_state(&mut state);
        let ship = &state.ship;
        assert_eq!(ship.weapons().len(), 2);
        assert_eq!(ship.systems().len(), 3);
        assert_eq!(
            ship.weapons().len() + ship.systems().len(),
            ship.equipment.len()
        );
        assert!(ship.weapons().iter().all(|part| part.kind.is_weapon()));
    }

    #[test]
    fn sync_clamps_gauges_and_drops_empty_stacks() {
        let mut state = GameState::fresh();
        state.ship.stats.hull = 180;
        state.ship.stats.shields = 101;
        state.ship.cargo.push(stack(0, 1.0));
        sync_state(&mut state);
        assert_eq!(state.ship.stats.hull, HULL_MAX);
        assert_eq!(state.ship.stats.shields, SHIELDS_MAX);
        assert_eq!(state.ship.cargo.len(), 1);
    }
}
