//! Currency and inventory transactions at a landing site.
//!
//! Each operation validates against a scratch copy of the ship before
//! committing, so a rejection leaves the state untouched.

use log::info;

use crate::command::CommandError;
use crate::constants::{
    ION_FUEL_ITEM, ION_PER_FUEL_UNIT, PURCHASED_UNIT_WEIGHT, RECRUIT_SALARY_DIVISOR,
    SELL_RATIO_DENOMINATOR, SELL_RATIO_NUMERATOR, WARP_FUEL_ITEM, WARP_PER_FUEL_UNIT,
};
use crate::state::{CargoStack, CrewMember, GameState, LogKind, Ship, ShipPart};
use crate::sync::{slots_for, sync_ship};

fn ensure_landed(state: &GameState) -> Result<(), CommandError> {
    if state.meta.landed {
        Ok(())
    } else {
        Err(CommandError::location("Must be landed to trade."))
    }
}

/// A hold already past its cap (loot, mining) may still take changes that
/// do not grow its footprint.
fn ensure_slots(current: &Ship, staged: &Ship) -> Result<(), CommandError> {
    let needed = slots_for(staged);
    let allowed = staged.stats.slots_max.max(slots_for(current));
    if needed > allowed {
        return Err(CommandError::capacity(format!(
            "Not enough free slots ({needed}/{}).",
            staged.stats.slots_max
        )));
    }
    Ok(())
}

/// Merge `qty` units into the stack with the same name, or open a new one.
pub(crate) fn stow(cargo: &mut Vec<CargoStack>, incoming: CargoStack) {
    if let Some(stack) = cargo
        .iter_mut()
        .find(|stack| stack.name.eq_ignore_ascii_case(&incoming.name))
    {
        stack.qty = stack.qty.saturating_add(incoming.qty);
    } else {
        cargo.push(incoming);
    }
}

/// Sale proceeds: `floor(unit_value * 0.8 * qty)`.
#[must_use]
pub fn sale_value(unit_value: u64, qty: u32) -> u64 {
    unit_value.saturating_mul(u64::from(qty)).saturating_mul(SELL_RATIO_NUMERATOR)
        / SELL_RATIO_DENOMINATOR
}

/// Buy `qty` units of a market commodity. Returns the amount paid.
///
/// # Errors
///
/// Rejects when not landed, the item is not listed, stock or hold space is
/// short, or the player cannot afford `price * qty`.
pub fn buy_commodity(state: &mut GameState, item: &str, qty: u32) -> Result<u64, CommandError> {
    ensure_landed(state)?;
    let index = state
        .local_market
        .iter()
        .position(|entry| entry.name.eq_ignore_ascii_case(item))
        .ok_or_else(|| CommandError::validation(format!("{item} is not sold here.")))?;
    let entry = &state.local_market[index];
    if qty > entry.qty {
        return Err(CommandError::capacity(format!(
            "Only {} {} in stock.",
            entry.qty, entry.name
        )));
    }
    let cost = entry.price.saturating_mul(u64::from(qty));
    CommandError::ensure_funds(cost, state.player.units)?;

    let mut ship = state.ship.clone();
    stow(
        &mut ship.cargo,
        CargoStack {
            name: entry.name.clone(),
            qty,
            unit_value: entry.price,
            unit_weight: PURCHASED_UNIT_WEIGHT,
            kind: entry.kind.clone(),
        },
    );
    ensure_slots(&state.ship, &ship)?;
    if entry.name == ION_FUEL_ITEM {
        ship.stats.fuel_ion = ship
            .stats
            .fuel_ion
            .saturating_add(qty.saturating_mul(ION_PER_FUEL_UNIT));
    } else if entry.name == WARP_FUEL_ITEM {
        ship.stats.fuel_warp = ship
            .stats
            .fuel_warp
            .saturating_add(qty.saturating_mul(WARP_PER_FUEL_UNIT));
    }
    let name = entry.name.clone();

    state.local_market[index].qty -= qty;
    state.player.units -= cost;
    state.ship = ship;
    sync_ship(&mut state.ship);
    info!("bought {qty}x {name} for {cost}");
    state.record(
        LogKind::Player,
        format!("Purchased {qty}x {name} for {cost} U."),
    );
    Ok(cost)
}

/// Sell `qty` units from the hold. Returns the amount credited.
///
/// # Errors
///
/// Rejects when not landed, the stack is absent, or `qty` exceeds the
/// quantity held.
pub fn sell_commodity(state: &mut GameState, item: &str, qty: u32) -> Result<u64, CommandError> {
    ensure_landed(state)?;
    let index = state
        .ship
        .cargo
        .iter()
        .position(|stack| stack.name.eq_ignore_ascii_case(item))
        .ok_or_else(|| CommandError::validation(format!("No {item} in the hold.")))?;
    let stack = &state.ship.cargo[index];
    if qty > stack.qty {
        return Err(CommandError::validation(format!(
            "Only {} {} in the hold.",
            stack.qty, stack.name
        )));
    }
    let proceeds = sale_value(stack.unit_value, qty);
    let name = stack.name.clone();

    state.ship.cargo[index].qty -= qty;
    if state.ship.cargo[index].qty == 0 {
        state.ship.cargo.remove(index);
    }
    state.player.units = state.player.units.saturating_add(proceeds);
    sync_ship(&mut state.ship);
    info!("sold {qty}x {name} for {proceeds}");
    state.record(
        LogKind::Player,
        format!("Sold {qty}x {name} for {proceeds} U."),
    );
    Ok(proceeds)
}

/// Buy and install a part from the local shipyard.
///
/// # Errors
///
/// Rejects when not landed, the part is not offered, it is unaffordable,
/// or the matching hardpoints or slots are full.
pub fn buy_part(state: &mut GameState, name: &str) -> Result<ShipPart, CommandError> {
    ensure_landed(state)?;
    let index = state
        .local_shipyard
        .iter()
        .position(|part| part.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CommandError::validation(format!("{name} is not offered here.")))?;
    let part = &state.local_shipyard[index];
    CommandError::ensure_funds(part.price, state.player.units)?;
    let (cap, label) = if part.kind.is_weapon() {
        (state.ship.caps.weapons, "Weapon hardpoints")
    } else {
        (state.ship.caps.systems, "System bays")
    };
    let installed = state.ship.installed_of_class(part.kind);
    if u32::try_from(installed).unwrap_or(u32::MAX) >= cap {
        return Err(CommandError::capacity(format!(
            "{label} full ({installed}/{cap})."
        )));
    }
    let mut ship = state.ship.clone();
    ship.equipment.push(part.clone());
    ensure_slots(&state.ship, &ship)?;

    let part = state.local_shipyard.remove(index);
    state.player.units -= part.price;
    state.ship = ship;
    sync_ship(&mut state.ship);
    info!("installed {}", part.name);
    state.record(
        LogKind::Player,
        format!("Installed {} for {} U.", part.name, part.price),
    );
    Ok(part)
}

/// Hire a recruit from the local lounge.
///
/// # Errors
///
/// Rejects when not landed, the recruit is not present, the fee is
/// unaffordable, or the crew quarters are full.
pub fn recruit(state: &mut GameState, name: &str) -> Result<CrewMember, CommandError> {
    ensure_landed(state)?;
    let index = state
        .local_lounge
        .recruits
        .iter()
        .position(|recruit| recruit.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CommandError::validation(format!("{name} is not in the lounge.")))?;
    let candidate = &state.local_lounge.recruits[index];
    CommandError::ensure_funds(candidate.cost, state.player.units)?;
    let crew = state.ship.crew.len();
    let cap = state.ship.caps.crew;
    if u32::try_from(crew).unwrap_or(u32::MAX) >= cap {
        return Err(CommandError::capacity(format!(
            "Crew quarters full ({crew}/{cap})."
        )));
    }
    let member = CrewMember {
        name: candidate.name.clone(),
        role: candidate.role,
        salary: candidate.cost / RECRUIT_SALARY_DIVISOR,
    };
    let mut ship = state.ship.clone();
    ship.crew.push(member.clone());
    ensure_slots(&state.ship, &ship)?;

    let hired = state.local_lounge.recruits.remove(index);
    state.player.units -= hired.cost;
    state.ship = ship;
    sync_ship(&mut state.ship);
    info!("recruited {} as {}", hired.name, hired.role);
    state.record(
        LogKind::Player,
        format!("{} ({}) joined the crew.", hired.name, hired.role),
    );
    Ok(member)
}
