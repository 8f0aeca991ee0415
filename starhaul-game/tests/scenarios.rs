use starhaul_game::{
    Command, CommandError, EncounterDetail, EncounterKind, EngineConfig, GameSession, GameState,
    LogKind, NoFallback, ScriptedDice,
    constants::{DEEP_SPACE, HOME_SYSTEM},
    data::MINERAL_TIERS,
    sync_state,
};

fn session(rolls: &[f64]) -> GameSession<ScriptedDice> {
    GameSession::new(
        GameState::fresh(),
        ScriptedDice::new(rolls.iter().copied()).with_fallback(0.9),
        EngineConfig::default(),
    )
}

fn run(session: &mut GameSession<ScriptedDice>, input: &str) -> bool {
    session.execute(input, &NoFallback).accepted
}

fn last_entry(session: &GameSession<ScriptedDice>) -> (LogKind, String) {
    let entry = session.state().log.back().unwrap();
    (entry.kind, entry.text.clone())
}

#[test]
fn buying_five_fuel_units_from_fresh_state() {
    let mut session = session(&[]);
    assert_eq!(session.state().player.units, 1_000);
    assert!(run(&mut session, "Land on Veridia Prime"));
    let report = session.execute("Buy 5 Ionic Gel", &NoFallback);
    assert!(report.accepted);
    assert_eq!(report.entries[0].text, "Purchased 5x Ionic Gel for 50 U.");

    let state = session.state();
    assert_eq!(state.player.units, 950);
    assert_eq!(state.ship.cargo_stack("Ionic Gel").unwrap().qty, 5);
    assert_eq!(state.ship.stats.fuel_ion, 150);
}

#[test]
fn buying_one_hyper_crystal_adds_a_warp_unit() {
    let mut session = session(&[]);
    assert!(run(&mut session, "Land on Veridia Prime"));
    assert_eq!(session.state().ship.stats.fuel_warp, 2);
    let report = session.execute("Buy 1 Hyper-Crystals", &NoFallback);
    assert!(report.accepted);
    assert_eq!(report.entries[0].text, "Purchased 1x Hyper-Crystals for 500 U.");

    let state = session.state();
    assert_eq!(state.player.units, 500);
    assert_eq!(state.ship.stats.fuel_warp, 3);
    assert_eq!(state.ship.cargo_stack("Hyper-Crystals").unwrap().qty, 1);
    let stock = state
        .local_market
        .iter()
        .find(|entry| entry.name == "Hyper-Crystals")
        .unwrap();
    assert_eq!(stock.qty, 4);
}

#[test]
fn takeoff_while_orbiting_is_accepted_without_moving() {
    let mut session = session(&[]);
    let before = session.state().meta.clone();
    assert!(run(&mut session, "Takeoff"));
    assert_eq!(session.state().meta, before);
    assert_eq!(
        last_entry(&session),
        (LogKind::System, format!("Already in orbit over {HOME_SYSTEM}."))
    );
}

#[test]
fn selling_back_removes_the_emptied_stack() {
    let mut session = session(&[]);
    assert!(run(&mut session, "Land on Veridia Prime"));
    assert!(run(&mut session, "Buy 5 Ionic Gel"));
    assert!(!run(&mut session, "Sell 6 Ionic Gel"));
    assert!(run(&mut session, "Sell 5 Ionic Gel"));
    let state = session.state();
    assert_eq!(state.player.units, 950 + 40);
    assert!(state.ship.cargo_stack("Ionic Gel").is_none());
}

#[test]
fn unaffordable_purchase_is_a_logged_no_op() {
    let mut session = session(&[]);
    assert!(run(&mut session, "Land on Veridia Prime"));
    let before = session.state().clone();
    let report = session.execute("Buy 3 Hyper-Crystals", &NoFallback);
    assert!(!report.accepted);
    assert_eq!(
        report.entries[0].text,
        CommandError::Affordability {
            needed: 1_500,
            available: 1_000
        }
        .to_string()
    );
    assert_eq!(session.state().player, before.player);
    assert_eq!(session.state().ship, before.ship);
    assert_eq!(session.state().local_market, before.local_market);
}

#[test]
fn travel_without_interdiction_reaches_orbit() {
    let mut session = session(&[0.9]);
    assert!(run(&mut session, "Travel to X"));
    let state = session.state();
    assert_eq!(state.ship.stats.fuel_ion, 90);
    assert_eq!(state.meta.orbiting, "X");
    assert!(!state.meta.landed);
    assert!(state.encounter.is_none());
}

#[test]
fn travel_never_runs_dry() {
    let mut session = session(&[0.9]);
    session.with_state_mut(|state| state.ship.stats.fuel_ion = 9);
    assert!(!run(&mut session, "Travel to The Anvil"));
    assert_eq!(session.state().ship.stats.fuel_ion, 9);
    assert_eq!(session.state().meta.orbiting, HOME_SYSTEM);
    assert_eq!(
        last_entry(&session),
        (LogKind::Error, "Insufficient Ionic Fuel.".to_string())
    );
}

#[test]
fn landing_requires_matching_orbit() {
    let mut session = session(&[]);
    assert_eq!(session.state().meta.orbiting, "Veridia Prime");
    assert!(!run(&mut session, "Land on The Anvil"));
    assert!(!session.state().meta.landed);
    assert_eq!(
        last_entry(&session),
        (LogKind::Error, "Must orbit The Anvil to land.".to_string())
    );
}

#[test]
fn interdicted_travel_fights_a_pirate() {
    // interdiction, pirate band, weakest pirate, win, minimum loot, no item
    let mut session = session(&[0.1, 0.1, 0.0, 0.0, 0.0, 0.9]);
    assert!(run(&mut session, "Travel to Echo IV"));
    let state = session.state();
    assert_eq!(state.ship.stats.fuel_ion, 90);
    assert_eq!(state.meta.orbiting, DEEP_SPACE);
    let encounter = state.encounter.as_ref().unwrap();
    assert_eq!(encounter.kind(), EncounterKind::Pirate);
    assert!(encounter.hostile);
    assert_eq!(encounter.detail, EncounterDetail::Pirate { power: 5 });

    assert!(!run(&mut session, "Scan Sector"));
    assert!(!run(&mut session, "Salvage"));
    assert!(session.state().encounter.is_some());

    assert!(run(&mut session, "Attack"));
    let state = session.state();
    assert!(state.encounter.is_none());
    assert_eq!(state.player.units, 1_100);
    assert_eq!(state.player.reputation, 1);
}

#[test]
fn combat_defeat_never_destroys_the_ship() {
    let mut session = session(&[0.99, 0.99]);
    session.with_state_mut(|state| {
        state.ship.stats.hull = 3;
        state.encounter = Some(starhaul_game::Encounter {
            hostile: true,
            text: "Pirate Interceptor detected.".to_string(),
            detail: EncounterDetail::Pirate { power: 25 },
        });
    });
    assert!(run(&mut session, "Attack"));
    assert_eq!(session.state().ship.stats.hull, 1);
    assert_eq!(
        last_entry(&session),
        (LogKind::Error, "Taking Fire! Hull -20%".to_string())
    );
}

#[test]
fn warp_consumes_one_unit_and_caches_the_system() {
    let mut session = session(&[]);
    assert!(run(&mut session, "Warp to Sector 4"));
    let first_visit = session.state().known_systems["Sector 4"].clone();
    assert_eq!(session.state().ship.stats.fuel_warp, 1);
    assert_eq!(session.state().meta.location, "Sector 4");
    assert_eq!(session.state().map.sector_bodies, first_visit);
    assert!(!run(&mut session, "Warp to Sector 4"));

    assert!(run(&mut session, "Warp to Veridia Prime"));
    assert_eq!(session.state().ship.stats.fuel_warp, 0);
    assert!(!run(&mut session, "Warp to Sector 4"));
    assert_eq!(session.state().meta.location, HOME_SYSTEM);

    session.with_state_mut(|state| state.ship.stats.fuel_warp = 1);
    assert!(run(&mut session, "Warp to Sector 4"));
    assert_eq!(session.state().known_systems["Sector 4"], first_visit);
}

#[test]
fn tier_one_mining_yields_common_ore() {
    // no interdiction, then tier roll, mineral pick, quantity, unit value
    let mut session = session(&[0.9, 0.1, 0.0, 0.5, 0.0]);
    assert!(run(&mut session, "Travel to Frostbite"));
    let report = session.execute("Mine Frostbite", &NoFallback);
    assert!(report.accepted);

    let state = session.state();
    let mined = state
        .ship
        .cargo
        .iter()
        .find(|stack| MINERAL_TIERS[0].contains(&stack.name.as_str()))
        .unwrap();
    assert!((1..=4).contains(&mined.qty));
    assert_eq!(mined.name, "Water Ice");
    assert!(report.entries[0].text.starts_with("Mining Yield: "));
}

#[test]
fn restart_restores_the_starter_state() {
    let mut session = session(&[0.9]);
    assert!(run(&mut session, "Travel to The Anvil"));
    session.with_state_mut(|state| {
        state.player.units = 3;
        state.meta.location = "Nowhere".to_string();
    });
    assert!(run(&mut session, "RESTART_GAME"));
    let fresh = GameState::fresh();
    let state = session.state();
    assert_eq!(state.meta, fresh.meta);
    assert_eq!(state.player, fresh.player);
    assert_eq!(state.ship, fresh.ship);
    assert_eq!(state.known_systems, fresh.known_systems);
}

#[test]
fn derived_fields_survive_every_command() {
    let mut session = session(&[]);
    for input in [
        "Land on Veridia Prime",
        "Buy 10 Ionic Gel",
        "Takeoff",
        "Galaxy Map",
        "Scan Sector",
        "Travel to Frostbite",
    ] {
        session.execute(input, &NoFallback);
        let mut resynced = session.state().clone();
        sync_state(&mut resynced);
        assert_eq!(&resynced, session.state(), "after {input}");
    }
}

#[test]
fn grammar_covers_the_command_protocol() {
    assert_eq!(
        Command::parse("  buy   part   Plasma Cannon ").unwrap(),
        Command::BuyPart {
            name: "Plasma Cannon".to_string()
        }
    );
    assert_eq!(
        Command::parse("MINE ASTEROID").unwrap(),
        Command::Mine {
            target: "ASTEROID".to_string()
        }
    );
    assert!(matches!(
        Command::parse("   "),
        Err(CommandError::Validation(_))
    ));
}
