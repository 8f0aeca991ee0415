//! Travel encounters: selection and resolution.
use log::{debug, info};

use crate::command::CommandError;
use crate::constants::{
    COMBAT_DAMAGE_MAX, COMBAT_DAMAGE_MIN, COMBAT_ITEM_CHANCE, COMBAT_LOOT_MAX, COMBAT_LOOT_MIN,
    DERELICT_BAND_END, HULL_FLOOR_AFTER_COMBAT, PIRATE_BAND_END, PIRATE_POWER_MAX,
    PIRATE_POWER_MIN, SALVAGE_ROLLS, SHIELD_POWER_DIVISOR, TRADER_BAND_END,
    TRADER_PRICE_MAX, TRADER_PRICE_MIN, TRADER_VALUE_MULTIPLIER, WEAPON_POWER,
};
use crate::data::{LOOT_TABLE, LootSpec};
use crate::dice::{Dice, pick};
use crate::ledger::stow;
use crate::mining::{MiningYield, mine};
use crate::numbers::{u64_to_f64, u64_to_u32, usize_to_u64};
use crate::state::{
    CargoStack, Encounter, EncounterDetail, EncounterKind, GameState, LogKind, Ship,
};
use crate::sync::sync_ship;

/// Encounter kind for a unit roll. The bands partition `[0, 1)`.
#[must_use]
pub fn kind_for_roll(roll: f64) -> EncounterKind {
    if roll < PIRATE_BAND_END {
        EncounterKind::Pirate
    } else if roll < DERELICT_BAND_END {
        EncounterKind::Derelict
    } else if roll < TRADER_BAND_END {
        EncounterKind::Trader
    } else {
        EncounterKind::Asteroid
    }
}

/// Spawn a fresh encounter. Pirates roll their power; traders roll an offer
/// and then its price.
pub fn roll_encounter(dice: &mut impl Dice) -> Encounter {
    let kind = kind_for_roll(dice.unit());
    debug!("encounter rolled: {kind:?}");
    match kind {
        EncounterKind::Pirate => Encounter {
            hostile: true,
            text: "Pirate Interceptor detected.".to_string(),
            detail: EncounterDetail::Pirate {
                power: u64_to_u32(dice.range(PIRATE_POWER_MIN, PIRATE_POWER_MAX)),
            },
        },
        EncounterKind::Derelict => Encounter {
            hostile: false,
            text: "A derelict hulk drifts across your bow.".to_string(),
            detail: EncounterDetail::Derelict,
        },
        EncounterKind::Trader => {
            let offer = pick(dice, &LOOT_TABLE).unwrap_or(&LOOT_TABLE[0]).name;
            let price = dice.range(TRADER_PRICE_MIN, TRADER_PRICE_MAX);
            Encounter {
                hostile: false,
                text: format!("A merchant vessel hails you: {offer} for {price} U."),
                detail: EncounterDetail::Trader {
                    offer: offer.to_string(),
                    price,
                },
            }
        }
        EncounterKind::Asteroid => Encounter {
            hostile: false,
            text: "Dense debris field.".to_string(),
            detail: EncounterDetail::Asteroid,
        },
    }
}

/// Weapons count for ten each; shields add a tenth of their level.
#[must_use]
pub fn ship_power(ship: &Ship) -> f64 {
    let weapons = u64_to_f64(usize_to_u64(ship.weapons().len()));
    weapons * WEAPON_POWER + f64::from(ship.stats.shields) / SHIELD_POWER_DIVISOR
}

#[must_use]
pub fn win_probability(ship: &Ship, enemy_power: u32) -> f64 {
    let own = ship_power(ship);
    let total = own + f64::from(enemy_power);
    if total <= 0.0 { 0.0 } else { own / total }
}

fn pending(state: &GameState) -> Result<&Encounter, CommandError> {
    state.encounter.as_ref().ok_or(CommandError::NoEncounter)
}

fn mismatch(action: &str, encounter: &Encounter) -> CommandError {
    CommandError::validation(format!(
        "Cannot {action} a {:?} contact.",
        encounter.kind()
    ))
}

fn stow_loot(state: &mut GameState, loot: &LootSpec, unit_value: u64) {
    stow(
        &mut state.ship.cargo,
        CargoStack {
            name: loot.name.to_string(),
            qty: 1,
            unit_value,
            unit_weight: loot.weight,
            kind: loot.kind.to_string(),
        },
    );
}

fn finish(state: &mut GameState) {
    state.encounter = None;
    sync_ship(&mut state.ship);
}

/// Fight the pending pirate.
///
/// # Errors
///
/// Rejects when nothing is pending or the contact is not a pirate.
pub fn attack(state: &mut GameState, dice: &mut impl Dice) -> Result<(), CommandError> {
    let encounter = pending(state)?;
    let EncounterDetail::Pirate { power } = encounter.detail else {
        return Err(mismatch("attack", encounter));
    };
    let odds = win_probability(&state.ship, power);
    if dice.chance(odds) {
        let loot = dice.range(COMBAT_LOOT_MIN, COMBAT_LOOT_MAX);
        state.player.units = state.player.units.saturating_add(loot);
        state.player.reputation = state.player.reputation.saturating_add(1);
        info!("combat won at odds {odds:.2}, loot {loot}");
        state.record(
            LogKind::Player,
            format!("Target Neutralized. Salvaged {loot} U."),
        );
        if dice.chance(COMBAT_ITEM_CHANCE)
            && let Some(item) = pick(dice, &LOOT_TABLE)
        {
            stow_loot(state, item, item.value);
            state.record(LogKind::Player, format!("Recovered {}.", item.name));
        }
    } else {
        let damage = u64_to_u32(dice.range(COMBAT_DAMAGE_MIN, COMBAT_DAMAGE_MAX));
        let hull = state.ship.stats.hull.saturating_sub(damage);
        state.ship.stats.hull = hull.max(HULL_FLOOR_AFTER_COMBAT);
        info!("combat lost at odds {odds:.2}, damage {damage}");
        state.record(LogKind::Error, format!("Taking Fire! Hull -{damage}%"));
    }
    finish(state);
    Ok(())
}

/// Break away from any contact.
///
/// # Errors
///
/// Rejects when nothing is pending.
pub fn flee(state: &mut GameState) -> Result<(), CommandError> {
    let hostile = pending(state)?.hostile;
    let text = if hostile {
        "Evasive maneuvers. Contact lost."
    } else {
        "Course resumed."
    };
    state.record(LogKind::Player, text);
    finish(state);
    Ok(())
}

/// Leave the contact alone.
///
/// # Errors
///
/// Rejects when nothing is pending.
pub fn ignore(state: &mut GameState) -> Result<(), CommandError> {
    pending(state)?;
    state.record(LogKind::Player, "Contact ignored.");
    finish(state);
    Ok(())
}

/// Accept the trader's offer. An unaffordable offer is logged and the
/// trader departs all the same.
///
/// # Errors
///
/// Rejects when nothing is pending or the contact is not a trader.
pub fn trade(state: &mut GameState) -> Result<(), CommandError> {
    let encounter = pending(state)?;
    let EncounterDetail::Trader { offer, price } = &encounter.detail else {
        return Err(mismatch("trade with", encounter));
    };
    let (offer, price) = (offer.clone(), *price);
    if state.player.units < price {
        state.record(
            LogKind::Error,
            format!("Cannot afford {offer} ({price} U). The trader departs."),
        );
    } else {
        let loot = LOOT_TABLE
            .iter()
            .find(|loot| loot.name == offer)
            .copied()
            .unwrap_or(LootSpec {
                name: "Trade Goods",
                value: 0,
                weight: 1.0,
                kind: "Material",
            });
        state.player.units -= price;
        stow(
            &mut state.ship.cargo,
            CargoStack {
                name: offer.clone(),
                qty: 1,
                unit_value: price.saturating_mul(TRADER_VALUE_MULTIPLIER),
                unit_weight: loot.weight,
                kind: loot.kind.to_string(),
            },
        );
        state.record(
            LogKind::Player,
            format!("Acquired {offer} for {price} U."),
        );
    }
    finish(state);
    Ok(())
}

/// Strip the derelict for two loot rolls.
///
/// # Errors
///
/// Rejects when nothing is pending or the contact is not a derelict.
pub fn salvage(state: &mut GameState, dice: &mut impl Dice) -> Result<(), CommandError> {
    let encounter = pending(state)?;
    if encounter.kind() != EncounterKind::Derelict {
        return Err(mismatch("salvage", encounter));
    }
    for _ in 0..SALVAGE_ROLLS {
        if let Some(item) = pick(dice, &LOOT_TABLE) {
            stow_loot(state, item, item.value);
            state.record(LogKind::Player, format!("Salvaged {}.", item.name));
        }
    }
    finish(state);
    Ok(())
}

/// Mine the debris field of a pending asteroid contact.
///
/// # Errors
///
/// Rejects when nothing is pending or the contact is not an asteroid field.
pub fn mine_asteroid(
    state: &mut GameState,
    dice: &mut impl Dice,
) -> Result<MiningYield, CommandError> {
    let encounter = pending(state)?;
    if encounter.kind() != EncounterKind::Asteroid {
        return Err(mismatch("mine", encounter));
    }
    let found = mine(state, dice);
    finish(state);
    Ok(found)
}
