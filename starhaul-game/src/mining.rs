use log::debug;

use crate::constants::{
    MINERAL_VALUE_MAX, MINERAL_VALUE_MIN, MINING_YIELD_MAX, MINING_YIELD_MIN, TIER1_BAND_END,
    TIER2_BAND_END, TIER3_BAND_END,
};
use crate::data::{MINERAL_KIND, MINERAL_TIERS};
use crate::dice::{Dice, pick};
use crate::ledger::stow;
use crate::numbers::u64_to_u32;
use crate::state::{CargoStack, GameState, LogKind};
use crate::sync::sync_ship;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MineralTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl MineralTier {
    /// Map a unit roll onto the tier ladder, weighted toward common ore.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < TIER1_BAND_END {
            Self::Tier1
        } else if roll < TIER2_BAND_END {
            Self::Tier2
        } else if roll < TIER3_BAND_END {
            Self::Tier3
        } else {
            Self::Tier4
        }
    }

    #[must_use]
    pub const fn minerals(self) -> &'static [&'static str] {
        match self {
            Self::Tier1 => MINERAL_TIERS[0],
            Self::Tier2 => MINERAL_TIERS[1],
            Self::Tier3 => MINERAL_TIERS[2],
            Self::Tier4 => MINERAL_TIERS[3],
        }
    }
}

/// What a single mining pass brought aboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningYield {
    pub tier: MineralTier,
    pub mineral: &'static str,
    pub qty: u32,
}

/// Extract ore into the hold.
///
/// Rolls are drawn in order: tier, mineral, quantity, and a unit value only
/// when the mineral opens a new stack.
pub fn mine(state: &mut GameState, dice: &mut impl Dice) -> MiningYield {
    let tier = MineralTier::from_roll(dice.unit());
    let minerals = tier.minerals();
    let mineral = pick(dice, minerals).copied().unwrap_or(minerals[0]);
    let qty = u64_to_u32(dice.range(MINING_YIELD_MIN, MINING_YIELD_MAX));
    let unit_value = if state.ship.cargo_stack(mineral).is_some() {
        0
    } else {
        dice.range(MINERAL_VALUE_MIN, MINERAL_VALUE_MAX)
    };
    stow(
        &mut state.ship.cargo,
        CargoStack {
            name: mineral.to_string(),
            qty,
            unit_value,
            unit_weight: 1.0,
            kind: MINERAL_KIND.to_string(),
        },
    );
    sync_ship(&mut state.ship);
    debug!("mined {qty}x {mineral} ({tier:?})");
    state.record(LogKind::System, format!("Mining Yield: {qty}x {mineral}"));
    MiningYield { tier, mineral, qty }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    #[test]
    fn tier_bands_partition_the_unit_interval() {
        assert_eq!(MineralTier::from_roll(0.0), MineralTier::Tier1);
        assert_eq!(MineralTier::from_roll(0.649), MineralTier::Tier1);
        assert_eq!(MineralTier::from_roll(0.65), MineralTier::Tier2);
        assert_eq!(MineralTier::from_roll(0.9), MineralTier::Tier3);
        assert_eq!(MineralTier::from_roll(0.96), MineralTier::Tier4);
        assert_eq!(MineralTier::from_roll(0.999), MineralTier::Tier4);
    }

    #[test]
    fn forced_tier_one_yield_lands_in_cargo() {
        let mut state = GameState::fresh();
        // tier, mineral index, qty (max), value
        let mut dice = ScriptedDice::new([0.1, 0.3, 0.99, 0.0]);
        let found = mine(&mut state, &mut dice);
        assert_eq!(found.tier, MineralTier::Tier1);
        assert_eq!(found.mineral, "Iron Ore");
        assert_eq!(found.qty, 4);
        let stack = state.ship.cargo_stack("Iron Ore").unwrap();
        assert_eq!(stack.qty, 4);
        assert_eq!(stack.unit_value, 20);
        assert_eq!(
            state.log.back().map(|entry| entry.text.as_str()),
            Some("Mining Yield: 4x Iron Ore")
        );
    }

    #[test]
    fn repeat_yields_merge_without_revaluing() {
        let mut state = GameState::fresh();
        let mut dice = ScriptedDice::new([0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5]);
        mine(&mut state, &mut dice);
        let value = state.ship.cargo_stack("Water Ice").unwrap().unit_value;
        mine(&mut state, &mut dice);
        let stack = state.ship.cargo_stack("Water Ice").unwrap();
        assert_eq!(stack.unit_value, value);
        assert_eq!(stack.qty, 1 + 3);
        assert_eq!(dice.draws(), 7);
    }

    #[test]
    fn yields_stay_in_range() {
        let mut state = GameState::fresh();
        let mut dice = SeededDice::from_user_seed(17);
        for _ in 0..100 {
            let found = mine(&mut state, &mut dice);
            assert!((1..=4).contains(&found.qty));
            assert!(found.tier.minerals().contains(&found.mineral));
        }
    }
}
