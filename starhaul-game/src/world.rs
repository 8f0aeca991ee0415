//! Procedural generation of systems, bodies, and landing-site offerings.

use log::debug;

use crate::constants::{
    BODY_COUNT_MAX, BODY_COUNT_MIN, COMMODITY_PRICE_MAX, COMMODITY_PRICE_MIN, COMMODITY_STOCK_MAX,
    COMMODITY_STOCK_MIN, HOME_SYSTEM, ION_FUEL_ITEM, ION_FUEL_PRICE, ION_FUEL_STOCK,
    LOUNGE_RECRUIT_COUNT, MARKET_COMMODITY_COUNT, NEIGHBOR_COUNT, RECRUIT_COST_MAX,
    RECRUIT_COST_MIN, SHIPYARD_OFFER_MAX, SHIPYARD_OFFER_MIN, WARP_FUEL_ITEM, WARP_FUEL_PRICE,
    WARP_FUEL_STOCK,
};
use crate::data::{
    BODY_NUMERALS, NEIGHBOR_SYSTEMS, PLANET_TYPES, RECRUIT_DESC, RECRUIT_ROLES, RUMORS,
    SHIP_PARTS, STAR_TYPES, STARTER_BODIES, commodity_pool, names_for_role,
};
use crate::dice::{Dice, pick, sample};
use crate::numbers::u64_to_u32;
use crate::state::{
    CelestialBody, Economy, GameState, Lounge, MarketEntry, Rarity, Recruit, ShipPart,
};

const FUEL_KIND: &str = "Fuel";
const STAR_DESC: &str = "System Star.";
const FALLBACK_RECRUIT_NAME: &str = "Rookie";

/// The hand-authored home system.
#[must_use]
pub fn starter_bodies() -> Vec<CelestialBody> {
    STARTER_BODIES
        .iter()
        .map(|body| CelestialBody {
            name: body.name.to_string(),
            kind: body.kind.to_string(),
            economy: Some(body.economy),
            desc: body.desc.to_string(),
            is_star: false,
            mineable: body.mineable,
        })
        .collect()
}

/// Economy tag implied by a planetary type.
#[must_use]
pub fn economy_for(kind: &str) -> Economy {
    let kind = kind.to_ascii_lowercase();
    if kind.contains("gas") || kind.contains("jupiter") {
        Economy::Refinery
    } else if kind.contains("terran") {
        Economy::Agrarian
    } else if kind.contains("volcanic") || kind.contains("lava") {
        Economy::Industrial
    } else if kind.contains("ocean") || kind.contains("desert") || kind.contains("super-earth") {
        Economy::Colony
    } else {
        Economy::Research
    }
}

#[must_use]
pub fn is_mineable(kind: &str) -> bool {
    let kind = kind.to_ascii_lowercase();
    ["moon", "asteroid", "belt"]
        .iter()
        .any(|needle| kind.contains(needle))
}

/// Body list for a system. The home system is fixed; any other name gets a
/// star followed by 3 to 7 numbered bodies.
pub fn generate_system_bodies(system: &str, dice: &mut impl Dice) -> Vec<CelestialBody> {
    if system.eq_ignore_ascii_case(HOME_SYSTEM) {
        return starter_bodies();
    }
    let star = pick(dice, &STAR_TYPES).copied().unwrap_or(STAR_TYPES[0]);
    let mut bodies = vec![CelestialBody {
        name: system.to_string(),
        kind: star.to_string(),
        economy: None,
        desc: STAR_DESC.to_string(),
        is_star: true,
        mineable: false,
    }];
    let count = dice.range(BODY_COUNT_MIN, BODY_COUNT_MAX);
    for numeral in BODY_NUMERALS.iter().take(usize::try_from(count).unwrap_or(0)) {
        let kind = pick(dice, &PLANET_TYPES).copied().unwrap_or(PLANET_TYPES[0]);
        bodies.push(CelestialBody {
            name: format!("{system} {numeral}"),
            kind: kind.to_string(),
            economy: Some(economy_for(kind)),
            desc: format!("A {kind} world."),
            is_star: false,
            mineable: is_mineable(kind),
        });
    }
    debug!("generated {} bodies for {system}", bodies.len());
    bodies
}

/// Cache a system's bodies if absent. Existing entries are never replaced.
/// Returns `true` when generation ran.
pub fn ensure_system_cached(state: &mut GameState, system: &str, dice: &mut impl Dice) -> bool {
    if state.known_systems.contains_key(system) {
        debug!("system cache hit for {system}");
        return false;
    }
    let bodies = generate_system_bodies(system, dice);
    state.known_systems.insert(system.to_string(), bodies);
    true
}

/// Ensure the current system is cached and show it on the sector map.
pub fn publish_current_system(state: &mut GameState, dice: &mut impl Dice) {
    let location = state.meta.location.clone();
    ensure_system_cached(state, &location, dice);
    state.map.sector_bodies = state
        .known_systems
        .get(&location)
        .cloned()
        .unwrap_or_default();
}

/// Two fixed fuel lines followed by 15 distinct commodities.
pub fn generate_market(dice: &mut impl Dice) -> Vec<MarketEntry> {
    let mut items = vec![
        MarketEntry {
            name: ION_FUEL_ITEM.to_string(),
            kind: FUEL_KIND.to_string(),
            price: ION_FUEL_PRICE,
            qty: ION_FUEL_STOCK,
            rarity: Rarity::Common,
        },
        MarketEntry {
            name: WARP_FUEL_ITEM.to_string(),
            kind: FUEL_KIND.to_string(),
            price: WARP_FUEL_PRICE,
            qty: WARP_FUEL_STOCK,
            rarity: Rarity::Rare,
        },
    ];
    for (name, category) in sample(dice, commodity_pool(), MARKET_COMMODITY_COUNT) {
        let price = dice.range(COMMODITY_PRICE_MIN, COMMODITY_PRICE_MAX);
        let qty = dice.range(COMMODITY_STOCK_MIN, COMMODITY_STOCK_MAX);
        items.push(MarketEntry {
            name: name.to_string(),
            kind: category.to_string(),
            price,
            qty: u64_to_u32(qty),
            rarity: Rarity::Standard,
        });
    }
    items
}

/// Six to eight distinct parts from the catalog.
pub fn generate_shipyard(dice: &mut impl Dice) -> Vec<ShipPart> {
    let count = dice.range(SHIPYARD_OFFER_MIN, SHIPYARD_OFFER_MAX);
    sample(dice, &SHIP_PARTS, usize::try_from(count).unwrap_or(SHIP_PARTS.len()))
        .iter()
        .map(ShipPart::from)
        .collect()
}

pub fn generate_lounge(dice: &mut impl Dice) -> Lounge {
    let recruits = (0..LOUNGE_RECRUIT_COUNT)
        .map(|_| {
            let role = pick(dice, &RECRUIT_ROLES)
                .copied()
                .unwrap_or(RECRUIT_ROLES[0]);
            let names = names_for_role(role);
            let name = pick(dice, &names)
                .copied()
                .unwrap_or(FALLBACK_RECRUIT_NAME);
            Recruit {
                name: name.to_string(),
                role,
                cost: dice.range(RECRUIT_COST_MIN, RECRUIT_COST_MAX),
                desc: RECRUIT_DESC.to_string(),
            }
        })
        .collect();
    Lounge {
        recruits,
        rumors: RUMORS.iter().map(ToString::to_string).collect(),
    }
}

/// Fill the landing site's market, shipyard, and lounge.
pub fn regenerate_offerings(state: &mut GameState, dice: &mut impl Dice) {
    state.local_market = generate_market(dice);
    state.local_shipyard = generate_shipyard(dice);
    state.local_lounge = generate_lounge(dice);
}

/// Warp destinations reachable from `current`.
pub fn generate_neighbors(current: &str, dice: &mut impl Dice) -> Vec<String> {
    let pool: Vec<&str> = NEIGHBOR_SYSTEMS
        .iter()
        .copied()
        .filter(|name| !name.eq_ignore_ascii_case(current))
        .collect();
    sample(dice, &pool, NEIGHBOR_COUNT)
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};
    use std::collections::HashSet;

    #[test]
    fn home_system_is_fixed() {
        let mut dice = ScriptedDice::default();
        let bodies = generate_system_bodies(HOME_SYSTEM, &mut dice);
        assert_eq!(bodies, starter_bodies());
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn generated_system_has_star_and_bounded_body_count() {
        let mut dice = SeededDice::from_user_seed(7);
        for round in 0..50 {
            let bodies = generate_system_bodies(&format!("Test {round}"), &mut dice);
            assert!(bodies[0].is_star);
            let planets = bodies.len() - 1;
            assert!((3..=7).contains(&planets), "{planets} bodies");
            for body in &bodies[1..] {
                assert_eq!(body.mineable, is_mineable(&body.kind));
                assert!(body.economy.is_some());
            }
        }
    }

    #[test]
    fn forced_rolls_select_star_count_and_types() {
        // star index 0, count -> 3, then three planet picks: first, last, last
        let mut dice = ScriptedDice::new([0.0, 0.0, 0.0, 0.99, 0.99]);
        let bodies = generate_system_bodies("Sol", &mut dice);
        assert_eq!(bodies.len(), 4);
        assert_eq!(bodies[0].kind, "O-Type Blue");
        assert_eq!(bodies[1].name, "Sol I");
        assert_eq!(bodies[1].economy, Some(Economy::Refinery));
        assert_eq!(bodies[3].name, "Sol III");
        assert_eq!(bodies[3].kind, "Moon");
        assert!(bodies[3].mineable);
    }

    #[test]
    fn every_economy_tag_is_reachable() {
        let tags: HashSet<_> = PLANET_TYPES
            .iter()
            .map(|kind| format!("{:?}", economy_for(kind)))
            .collect();
        for expected in ["Refinery", "Agrarian", "Industrial", "Research", "Colony"] {
            assert!(tags.contains(expected), "{expected} unreachable");
        }
    }

    #[test]
    fn cache_is_never_overwritten() {
        let mut state = GameState::fresh();
        let mut dice = SeededDice::from_user_seed(3);
        assert!(ensure_system_cached(&mut state, "Tau Ceti", &mut dice));
        let first = state.known_systems["Tau Ceti"].clone();
        assert!(!ensure_system_cached(&mut state, "Tau Ceti", &mut dice));
        assert_eq!(state.known_systems["Tau Ceti"], first);
    }

    #[test]
    fn market_has_fuel_lines_and_distinct_goods() {
        let mut dice = SeededDice::from_user_seed(11);
        let market = generate_market(&mut dice);
        assert_eq!(market.len(), 17);
        assert_eq!(market[0].name, ION_FUEL_ITEM);
        assert_eq!(market[0].price, 10);
        assert_eq!(market[1].rarity, Rarity::Rare);
        let names: HashSet<_> = market.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names.len(), market.len());
        for entry in &market[2..] {
            assert!((20..=500).contains(&entry.price));
            assert!((10..=100).contains(&entry.qty));
        }
    }

    #[test]
    fn shipyard_offers_six_to_eight_distinct_parts() {
        let mut dice = SeededDice::from_user_seed(5);
        for _ in 0..20 {
            let yard = generate_shipyard(&mut dice);
            assert!((6..=8).contains(&yard.len()));
            let names: HashSet<_> = yard.iter().map(|part| part.name.as_str()).collect();
            assert_eq!(names.len(), yard.len());
        }
    }

    #[test]
    fn lounge_names_match_role_pools() {
        let mut dice = SeededDice::from_user_seed(9);
        let lounge = generate_lounge(&mut dice);
        assert_eq!(lounge.recruits.len(), 3);
        assert_eq!(lounge.rumors.len(), 2);
        for recruit in &lounge.recruits {
            assert!(names_for_role(recruit.role).contains(&recruit.name.as_str()));
            assert!((100..=600).contains(&recruit.cost));
        }
    }

    #[test]
    fn neighbors_exclude_current_system() {
        let mut dice = SeededDice::from_user_seed(13);
        let neighbors = generate_neighbors("Sector 4", &mut dice);
        assert_eq!(neighbors.len(), 3);
        assert!(!neighbors.iter().any(|name| name == "Sector 4"));
    }
}
