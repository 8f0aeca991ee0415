//! Centralized balance and tuning constants for Starhaul game logic.
//!
//! These values define the economy, navigation, and encounter math. Keeping
//! them together means gameplay can only be adjusted via reviewed code
//! changes, never through the persisted save or the fallback interpreter.

// World ----------------------------------------------------------------------
pub const HOME_SYSTEM: &str = "Veridia Prime";
pub const DEEP_SPACE: &str = "Deep Space";
pub const UNKNOWN_LOCATION: &str = "Unknown";
pub const START_DATE: &str = "2400.01.01";
pub(crate) const BODY_COUNT_MIN: u64 = 3;
pub(crate) const BODY_COUNT_MAX: u64 = 7;
pub(crate) const NEIGHBOR_COUNT: usize = 3;

// Player & ship --------------------------------------------------------------
pub const START_UNITS: u64 = 1_000;
pub const HULL_MAX: u32 = 100;
pub const SHIELDS_MAX: u32 = 100;
pub const HULL_FLOOR_AFTER_COMBAT: u32 = 1;
pub const CARGO_SLOT_WEIGHT: f64 = 20.0;

// Log feed -------------------------------------------------------------------
pub const LOG_CAPACITY_DEFAULT: usize = 40;
pub const LOG_CAPACITY_MAX: usize = 50;
pub(crate) const LOG_SYSTEM_ONLINE: &str = "System Online.";
pub(crate) const LOG_COMMS_UNCLEAR: &str = "Comms Interference. Command Unclear.";
pub(crate) const LOG_ANOMALY: &str = "ALERT: Anomaly Detected.";

// Navigation -----------------------------------------------------------------
pub const TRAVEL_ION_COST: u32 = 10;
pub const WARP_FUEL_COST: u32 = 1;
pub const INTERDICTION_CHANCE_DEFAULT: f64 = 0.25;

// Market & ledger ------------------------------------------------------------
pub const ION_FUEL_ITEM: &str = "Ionic Gel";
pub const WARP_FUEL_ITEM: &str = "Hyper-Crystals";
pub(crate) const ION_FUEL_PRICE: u64 = 10;
pub(crate) const ION_FUEL_STOCK: u32 = 200;
pub(crate) const WARP_FUEL_PRICE: u64 = 500;
pub(crate) const WARP_FUEL_STOCK: u32 = 5;
pub(crate) const ION_PER_FUEL_UNIT: u32 = 10;
pub(crate) const WARP_PER_FUEL_UNIT: u32 = 1;
pub(crate) const MARKET_COMMODITY_COUNT: usize = 15;
pub(crate) const COMMODITY_PRICE_MIN: u64 = 20;
pub(crate) const COMMODITY_PRICE_MAX: u64 = 500;
pub(crate) const COMMODITY_STOCK_MIN: u64 = 10;
pub(crate) const COMMODITY_STOCK_MAX: u64 = 100;
pub(crate) const PURCHASED_UNIT_WEIGHT: f64 = 1.0;
/// Sale price is `floor(unit_value * 4 / 5 * qty)`.
pub const SELL_RATIO_NUMERATOR: u64 = 4;
pub const SELL_RATIO_DENOMINATOR: u64 = 5;
pub(crate) const SHIPYARD_OFFER_MIN: u64 = 6;
pub(crate) const SHIPYARD_OFFER_MAX: u64 = 8;
pub(crate) const LOUNGE_RECRUIT_COUNT: usize = 3;
pub(crate) const RECRUIT_COST_MIN: u64 = 100;
pub(crate) const RECRUIT_COST_MAX: u64 = 600;
pub(crate) const RECRUIT_SALARY_DIVISOR: u64 = 10;

// Encounters -----------------------------------------------------------------
/// Upper bounds of the encounter-kind bands over `[0, 1)`:
/// pirate, derelict, trader; the remainder is an asteroid field.
pub const PIRATE_BAND_END: f64 = 0.30;
pub const DERELICT_BAND_END: f64 = 0.45;
pub const TRADER_BAND_END: f64 = 0.60;
pub(crate) const PIRATE_POWER_MIN: u64 = 5;
pub(crate) const PIRATE_POWER_MAX: u64 = 25;
pub(crate) const WEAPON_POWER: f64 = 10.0;
pub(crate) const SHIELD_POWER_DIVISOR: f64 = 10.0;
pub(crate) const COMBAT_LOOT_MIN: u64 = 100;
pub(crate) const COMBAT_LOOT_MAX: u64 = 800;
pub(crate) const COMBAT_ITEM_CHANCE: f64 = 0.5;
pub(crate) const COMBAT_DAMAGE_MIN: u64 = 5;
pub(crate) const COMBAT_DAMAGE_MAX: u64 = 20;
pub(crate) const TRADER_PRICE_MIN: u64 = 50;
pub(crate) const TRADER_PRICE_MAX: u64 = 300;
pub(crate) const TRADER_VALUE_MULTIPLIER: u64 = 2;
pub(crate) const SALVAGE_ROLLS: usize = 2;

// Mining ---------------------------------------------------------------------
/// Upper bounds of the mineral tier bands over `[0, 1)`; the rest is tier 4.
pub const TIER1_BAND_END: f64 = 0.65;
pub const TIER2_BAND_END: f64 = 0.87;
pub const TIER3_BAND_END: f64 = 0.96;
pub const MINING_YIELD_MIN: u64 = 1;
pub const MINING_YIELD_MAX: u64 = 4;
pub(crate) const MINERAL_VALUE_MIN: u64 = 20;
pub(crate) const MINERAL_VALUE_MAX: u64 = 500;
