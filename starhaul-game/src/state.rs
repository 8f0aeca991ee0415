use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::constants::{
    HOME_SYSTEM, HULL_MAX, LOG_CAPACITY_MAX, LOG_SYSTEM_ONLINE, SHIELDS_MAX, START_DATE,
    START_UNITS,
};
use crate::data::{STARTER_CARGO, STARTER_EQUIPMENT, part_spec};
use crate::sync::sync_ship;
use crate::world::starter_bodies;

/// Root aggregate persisted after every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub meta: Meta,
    pub player: Player,
    pub ship: Ship,
    pub map: MapState,
    /// Memoized body lists keyed by system name. Entries are never overwritten.
    #[serde(default)]
    pub known_systems: BTreeMap<String, Vec<CelestialBody>>,
    #[serde(default)]
    pub local_market: Vec<MarketEntry>,
    #[serde(default)]
    pub local_shipyard: Vec<ShipPart>,
    #[serde(default)]
    pub local_lounge: Lounge,
    #[serde(default)]
    pub encounter: Option<Encounter>,
    #[serde(default)]
    pub log: VecDeque<LogEntry>,
    #[serde(skip)]
    log_written: u64,
}

impl GameState {
    /// The canonical starter state.
    #[must_use]
    pub fn fresh() -> Self {
        let bodies = starter_bodies();
        let mut known_systems = BTreeMap::new();
        known_systems.insert(HOME_SYSTEM.to_string(), bodies.clone());
        let mut state = Self {
            meta: Meta {
                location: HOME_SYSTEM.to_string(),
                landed: false,
                orbiting: HOME_SYSTEM.to_string(),
                date: START_DATE.to_string(),
            },
            player: Player {
                units: START_UNITS,
                reputation: 0,
            },
            ship: Ship::starter(),
            map: MapState {
                view_mode: ViewMode::Sector,
                sector_bodies: bodies,
                neighbors: vec!["Sector 4".to_string(), "The Void".to_string()],
            },
            known_systems,
            local_market: Vec::new(),
            local_shipyard: Vec::new(),
            local_lounge: Lounge::default(),
            encounter: None,
            log: VecDeque::new(),
            log_written: 0,
        };
        state.record(LogKind::System, LOG_SYSTEM_ONLINE);
        sync_ship(&mut state.ship);
        state
    }

    /// Append an entry to the log feed, evicting the oldest past the hard cap.
    pub fn record(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push_back(LogEntry {
            kind,
            text: text.into(),
        });
        self.log_written = self.log_written.saturating_add(1);
        self.trim_log(LOG_CAPACITY_MAX);
    }

    /// Evict the oldest entries until at most `capacity` remain.
    pub fn trim_log(&mut self, capacity: usize) {
        while self.log.len() > capacity {
            self.log.pop_front();
        }
    }

    /// Total entries recorded through this value, including evicted ones.
    #[must_use]
    pub const fn log_written(&self) -> u64 {
        self.log_written
    }

    /// Continue the write counter of a state this one replaces.
    pub(crate) const fn resume_log_count(&mut self, written: u64) {
        self.log_written = written;
    }

    /// Bodies of the current system, if scanned.
    #[must_use]
    pub fn current_bodies(&self) -> Option<&[CelestialBody]> {
        self.known_systems
            .get(&self.meta.location)
            .map(Vec::as_slice)
    }

    /// Find a body of the current system by case-insensitive name.
    #[must_use]
    pub fn find_body(&self, name: &str) -> Option<&CelestialBody> {
        self.current_bodies()?
            .iter()
            .find(|body| body.name.eq_ignore_ascii_case(name))
    }

    /// Drop the transient offerings of the last landing site.
    pub fn clear_local_offerings(&mut self) {
        self.local_market.clear();
        self.local_shipyard.clear();
        self.local_lounge = Lounge::default();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::fresh()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub location: String,
    #[serde(default)]
    pub landed: bool,
    #[serde(default)]
    pub orbiting: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub units: u64,
    #[serde(default)]
    pub reputation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub class: String,
    pub caps: ShipCaps,
    pub stats: ShipStats,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub equipment: Vec<ShipPart>,
    /// Derived view of `equipment`; rewritten by every sync.
    #[serde(default, skip_deserializing)]
    pub(crate) weapons: Vec<ShipPart>,
    /// Derived view of `equipment`; rewritten by every sync.
    #[serde(default, skip_deserializing)]
    pub(crate) systems: Vec<ShipPart>,
    #[serde(default)]
    pub cargo: Vec<CargoStack>,
}

impl Ship {
    fn starter() -> Self {
        let equipment = STARTER_EQUIPMENT
            .iter()
            .filter_map(|name| part_spec(name))
            .map(ShipPart::from)
            .collect();
        let cargo = STARTER_CARGO
            .iter()
            .map(|(name, qty, value, weight, kind)| CargoStack {
                name: (*name).to_string(),
                qty: *qty,
                unit_value: *value,
                unit_weight: *weight,
                kind: (*kind).to_string(),
            })
            .collect();
        Self {
            class: "Cutter".to_string(),
            caps: ShipCaps {
                crew: 6,
                weapons: 2,
                cargo: 20,
                systems: 4,
            },
            stats: ShipStats {
                hull: HULL_MAX,
                shields: SHIELDS_MAX,
                fuel_ion: 100,
                fuel_warp: 2,
                slots_used: 0,
                slots_max: 32,
            },
            crew: vec![CrewMember {
                name: "Shepard".to_string(),
                role: CrewRole::Captain,
                salary: 0,
            }],
            equipment,
            weapons: Vec::new(),
            systems: Vec::new(),
            cargo,
        }
    }

    /// Installed weapons, as of the last sync.
    #[must_use]
    pub fn weapons(&self) -> &[ShipPart] {
        &self.weapons
    }

    /// Installed non-weapon parts, as of the last sync.
    #[must_use]
    pub fn systems(&self) -> &[ShipPart] {
        &self.systems
    }

    #[must_use]
    pub fn cargo_stack(&self, name: &str) -> Option<&CargoStack> {
        self.cargo
            .iter()
            .find(|stack| stack.name.eq_ignore_ascii_case(name))
    }

    /// Count installed parts of the same slot class as `kind`.
    #[must_use]
    pub fn installed_of_class(&self, kind: PartKind) -> usize {
        self.equipment
            .iter()
            .filter(|part| part.kind.is_weapon() == kind.is_weapon())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipCaps {
    pub crew: u32,
    pub weapons: u32,
    /// Advertised hold rating; cargo is limited by slot usage.
    pub cargo: u32,
    pub systems: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipStats {
    pub hull: u32,
    pub shields: u32,
    pub fuel_ion: u32,
    pub fuel_warp: u32,
    #[serde(default)]
    pub slots_used: u32,
    pub slots_max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewRole {
    Captain,
    Pilot,
    Engineer,
    Marine,
    Medic,
    Scientist,
}

impl CrewRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Captain => "Captain",
            Self::Pilot => "Pilot",
            Self::Engineer => "Engineer",
            Self::Marine => "Marine",
            Self::Medic => "Medic",
            Self::Scientist => "Scientist",
        }
    }
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub name: String,
    pub role: CrewRole,
    #[serde(default)]
    pub salary: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Weapon,
    System,
}

impl PartKind {
    #[must_use]
    pub const fn is_weapon(self) -> bool {
        matches!(self, Self::Weapon)
    }
}

/// An installable part, either on offer at a shipyard or fitted to the ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipPart {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PartKind,
    pub tag: String,
    pub price: u64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoStack {
    pub name: String,
    pub qty: u32,
    pub unit_value: u64,
    pub unit_weight: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Sector,
    Galaxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub sector_bodies: Vec<CelestialBody>,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Economy {
    Agrarian,
    Industrial,
    Refinery,
    Mining,
    Research,
    Colony,
}

/// Cosmetic category the presentation layer renders a body with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyCategory {
    Star,
    Gas,
    Ice,
    Volcanic,
    Ocean,
    Toxic,
    Desert,
    Belt,
    Moon,
    Terran,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<Economy>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub is_star: bool,
    #[serde(default)]
    pub mineable: bool,
}

impl CelestialBody {
    #[must_use]
    pub fn category(&self) -> BodyCategory {
        if self.is_star {
            return BodyCategory::Star;
        }
        let kind = self.kind.to_ascii_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|needle| kind.contains(needle));
        if has(&["gas", "jupiter"]) {
            BodyCategory::Gas
        } else if has(&["ice", "frost"]) {
            BodyCategory::Ice
        } else if has(&["volcanic", "lava", "molten"]) {
            BodyCategory::Volcanic
        } else if has(&["ocean", "water"]) {
            BodyCategory::Ocean
        } else if has(&["toxic", "acid", "carbon"]) {
            BodyCategory::Toxic
        } else if has(&["desert", "arid"]) {
            BodyCategory::Desert
        } else if has(&["belt", "asteroid"]) {
            BodyCategory::Belt
        } else if has(&["moon", "dwarf"]) {
            BodyCategory::Moon
        } else {
            BodyCategory::Terran
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Standard,
    Rare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u64,
    pub qty: u32,
    pub rarity: Rarity,
}

impl MarketEntry {
    #[must_use]
    pub fn is_fuel(&self) -> bool {
        self.kind == "Fuel"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Lounge {
    #[serde(default)]
    pub recruits: Vec<Recruit>,
    #[serde(default)]
    pub rumors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recruit {
    pub name: String,
    pub role: CrewRole,
    pub cost: u64,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterKind {
    Pirate,
    Derelict,
    Trader,
    Asteroid,
}

/// An unresolved travel event; present only until the player resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub hostile: bool,
    pub text: String,
    #[serde(flatten)]
    pub detail: EncounterDetail,
}

impl Encounter {
    #[must_use]
    pub const fn kind(&self) -> EncounterKind {
        match self.detail {
            EncounterDetail::Pirate { .. } => EncounterKind::Pirate,
            EncounterDetail::Derelict => EncounterKind::Derelict,
            EncounterDetail::Trader { .. } => EncounterKind::Trader,
            EncounterDetail::Asteroid => EncounterKind::Asteroid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EncounterDetail {
    Pirate { power: u32 },
    Derelict,
    Trader { offer: String, price: u64 },
    Asteroid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    System,
    Player,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type", default)]
    pub kind: LogKind,
    pub text: String,
}
