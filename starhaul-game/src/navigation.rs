//! Orbit, landing, and inter-system movement.

use log::info;

use crate::command::CommandError;
use crate::constants::{DEEP_SPACE, LOG_ANOMALY, NEIGHBOR_COUNT, TRAVEL_ION_COST, WARP_FUEL_COST};
use crate::data::GALAXY_PLACEHOLDERS;
use crate::dice::Dice;
use crate::encounters::roll_encounter;
use crate::state::{GameState, LogKind, ViewMode};
use crate::sync::sync_ship;
use crate::world::{generate_neighbors, publish_current_system, regenerate_offerings};

/// Resolve a typed body name against the current system, keeping unknown
/// names as typed.
fn canonical_body(state: &GameState, target: &str) -> String {
    state
        .find_body(target)
        .map_or_else(|| target.to_string(), |body| body.name.clone())
}

/// Resolve a typed system name against the neighbor list and the cache.
fn canonical_system(state: &GameState, target: &str) -> String {
    state
        .map
        .neighbors
        .iter()
        .chain(state.known_systems.keys())
        .find(|name| name.eq_ignore_ascii_case(target))
        .cloned()
        .unwrap_or_else(|| target.to_string())
}

/// Burn ion fuel toward a body. Travel may be interdicted, leaving the ship
/// in deep space with a pending encounter.
///
/// # Errors
///
/// Rejects with [`CommandError::Capacity`] when ion fuel is short.
pub fn travel(
    state: &mut GameState,
    target: &str,
    interdiction_chance: f64,
    dice: &mut impl Dice,
) -> Result<(), CommandError> {
    if state.ship.stats.fuel_ion < TRAVEL_ION_COST {
        return Err(CommandError::capacity("Insufficient Ionic Fuel."));
    }
    let target = canonical_body(state, target);
    state.ship.stats.fuel_ion -= TRAVEL_ION_COST;
    if state.meta.landed {
        state.clear_local_offerings();
    }
    state.meta.landed = false;
    if dice.chance(interdiction_chance) {
        let encounter = roll_encounter(dice);
        info!("travel to {target} interdicted: {:?}", encounter.kind());
        state.meta.orbiting = DEEP_SPACE.to_string();
        state.record(LogKind::Error, LOG_ANOMALY);
        state.record(LogKind::System, encounter.text.clone());
        state.encounter = Some(encounter);
    } else {
        info!("orbit established at {target}");
        state.record(LogKind::System, format!("Orbit established: {target}"));
        state.meta.orbiting = target;
    }
    sync_ship(&mut state.ship);
    Ok(())
}

/// Jump to another system, generating it on first visit.
///
/// # Errors
///
/// Rejects when already in the target system or warp fuel is short.
pub fn warp(state: &mut GameState, target: &str, dice: &mut impl Dice) -> Result<(), CommandError> {
    let target = canonical_system(state, target);
    if target.eq_ignore_ascii_case(&state.meta.location) {
        return Err(CommandError::validation(format!("Already in {target}.")));
    }
    if state.ship.stats.fuel_warp < WARP_FUEL_COST {
        return Err(CommandError::capacity("Insufficient Warp Fuel."));
    }
    state.ship.stats.fuel_warp -= WARP_FUEL_COST;
    state.meta.location.clone_from(&target);
    state.meta.orbiting.clone_from(&target);
    state.meta.landed = false;
    state.clear_local_offerings();
    state.map.view_mode = ViewMode::Sector;
    publish_current_system(state, dice);
    state.map.neighbors = generate_neighbors(&target, dice);
    sync_ship(&mut state.ship);
    info!("warped to {target}");
    state.record(LogKind::System, format!("Warp complete. Arrived at {target}."));
    Ok(())
}

/// Set down on the orbited body and open its market, shipyard, and lounge.
///
/// # Errors
///
/// Rejects unless orbiting the named body, or when the body is a star,
/// deep space, or already landed on.
pub fn land(state: &mut GameState, target: &str, dice: &mut impl Dice) -> Result<(), CommandError> {
    let target = canonical_body(state, target);
    if !state.meta.orbiting.eq_ignore_ascii_case(&target) {
        return Err(CommandError::location(format!(
            "Must orbit {target} to land."
        )));
    }
    if state.meta.orbiting == DEEP_SPACE {
        return Err(CommandError::location("Nothing to land on in deep space."));
    }
    if state.find_body(&target).is_some_and(|body| body.is_star) {
        return Err(CommandError::location(format!("Cannot land on {target}.")));
    }
    if state.meta.landed {
        return Err(CommandError::validation(format!("Already landed on {target}.")));
    }
    state.meta.landed = true;
    regenerate_offerings(state, dice);
    sync_ship(&mut state.ship);
    info!("landed on {target}");
    state.record(LogKind::System, format!("Landed on {target}."));
    Ok(())
}

/// Return to orbit, closing the landing site's offerings.
///
/// Already in orbit is a logged no-op.
pub fn takeoff(state: &mut GameState) {
    if !state.meta.landed {
        let orbiting = state.meta.orbiting.clone();
        state.record(LogKind::System, format!("Already in orbit over {orbiting}."));
        return;
    }
    state.meta.landed = false;
    state.clear_local_offerings();
    sync_ship(&mut state.ship);
    let orbiting = state.meta.orbiting.clone();
    state.record(LogKind::System, format!("Lift-off. Holding orbit over {orbiting}."));
}

pub fn scan_sector(state: &mut GameState, dice: &mut impl Dice) {
    state.map.view_mode = ViewMode::Sector;
    publish_current_system(state, dice);
    let count = state.map.sector_bodies.len();
    let location = state.meta.location.clone();
    state.record(
        LogKind::System,
        format!("Sector scan of {location}: {count} bodies."),
    );
}

/// Switch to the galaxy view, padding the neighbor list with placeholders.
pub fn galaxy_map(state: &mut GameState) {
    state.map.view_mode = ViewMode::Galaxy;
    for placeholder in GALAXY_PLACEHOLDERS {
        if state.map.neighbors.len() >= NEIGHBOR_COUNT {
            break;
        }
        let listed = state
            .map
            .neighbors
            .iter()
            .any(|name| name.eq_ignore_ascii_case(placeholder));
        if !listed {
            state.map.neighbors.push(placeholder.to_string());
        }
    }
    state.record(LogKind::System, "Galaxy map online.");
}
