//! Static content tables the world generator and resolvers draw from.

use std::sync::OnceLock;

use crate::state::{CrewRole, Economy, PartKind, ShipPart};

/// Catalog entry for an installable ship part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSpec {
    pub name: &'static str,
    pub kind: PartKind,
    pub tag: &'static str,
    pub price: u64,
    pub weight: f64,
}

impl From<&PartSpec> for ShipPart {
    fn from(spec: &PartSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            kind: spec.kind,
            tag: spec.tag.to_string(),
            price: spec.price,
            weight: spec.weight,
        }
    }
}

pub const SHIP_PARTS: [PartSpec; 10] = [
    part("Mining Laser", PartKind::Weapon, "LAS", 200, 2.0),
    part("Pulse Laser", PartKind::Weapon, "LAS", 500, 2.0),
    part("Railgun", PartKind::Weapon, "KIN", 1_500, 5.0),
    part("Plasma Torpedo", PartKind::Weapon, "MSL", 2_500, 4.0),
    part("Shield Gen Mk1", PartKind::System, "SHD", 1_000, 3.0),
    part("Nav-Computer", PartKind::System, "NAV", 800, 1.0),
    part("Hyperdrive", PartKind::System, "WRP", 5_000, 8.0),
    part("Scanner Array", PartKind::System, "SCN", 1_200, 2.0),
    part("Cargo Expander", PartKind::System, "CGO", 500, 2.0),
    part("Standard Fuel Tank", PartKind::System, "TNK", 300, 5.0),
];

const fn part(
    name: &'static str,
    kind: PartKind,
    tag: &'static str,
    price: u64,
    weight: f64,
) -> PartSpec {
    PartSpec {
        name,
        kind,
        tag,
        price,
        weight,
    }
}

#[must_use]
pub fn part_spec(name: &str) -> Option<&'static PartSpec> {
    SHIP_PARTS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// An item that encounters can drop into the hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootSpec {
    pub name: &'static str,
    pub value: u64,
    pub weight: f64,
    pub kind: &'static str,
}

pub const LOOT_TABLE: [LootSpec; 5] = [
    LootSpec {
        name: "Scrap Metal",
        value: 10,
        weight: 1.0,
        kind: "Material",
    },
    LootSpec {
        name: "Ship Parts",
        value: 150,
        weight: 2.0,
        kind: "Tech",
    },
    LootSpec {
        name: "Fuel Canister",
        value: 50,
        weight: 1.0,
        kind: "Fuel",
    },
    LootSpec {
        name: "Cipher Key",
        value: 500,
        weight: 0.1,
        kind: "Artifact",
    },
    LootSpec {
        name: "Rare Ore",
        value: 300,
        weight: 2.0,
        kind: "Mineral",
    },
];

/// Commodity categories and the goods traded under each.
pub const COMMODITIES: [(&str, &[&str]); 5] = [
    (
        "Food",
        &[
            "Nutri-Paste",
            "Syn-Meat",
            "Algae Bars",
            "Luxury Wine",
            "Void-Crab Legs",
            "Moon-Dust Spices",
        ],
    ),
    (
        "Tech",
        &[
            "Fusion Cells",
            "Holoprojectors",
            "Nano-Weave",
            "Positronic Brains",
            "Grav-Plating",
        ],
    ),
    (
        "Agri",
        &[
            "Fertilizer",
            "Gene-Seeds",
            "Alien Timber",
            "Medicinal Moss",
            "Terraforming Bacteria",
        ],
    ),
    (
        "Minerals",
        &[
            "Titanium Ore",
            "Liquid Hydrogen",
            "Dark Matter",
            "Uncut Gemstones",
            "Radioactive Waste",
        ],
    ),
    (
        "Medical",
        &[
            "Stasis Pods",
            "Pan-Cure Serums",
            "Isotopes",
            "Mind-Clouders",
            "Clone Vats",
        ],
    ),
];

/// Every tradeable good paired with its category, flattened once.
#[must_use]
pub fn commodity_pool() -> &'static [(&'static str, &'static str)] {
    static POOL: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    POOL.get_or_init(|| {
        COMMODITIES
            .iter()
            .flat_map(|(category, goods)| goods.iter().map(move |good| (*good, *category)))
            .collect()
    })
}

/// Mineral names by tier, most common first.
pub const MINERAL_TIERS: [&[&str]; 4] = [
    &["Water Ice", "Iron Ore", "Carbon Silicates", "Copper Deposits"],
    &["Titanium", "Cobalt", "Lithium", "Tungsten"],
    &["Platinum", "Gold", "Palladium", "Void Opals"],
    &["Neutronium", "Dark Matter", "Elerium-115", "Starheart"],
];

pub const MINERAL_KIND: &str = "Material";

pub const STAR_TYPES: [&str; 6] = [
    "O-Type Blue",
    "G-Type Yellow",
    "M-Type Red",
    "Neutron Star",
    "Red Giant",
    "White Dwarf",
];

pub const PLANET_TYPES: [&str; 15] = [
    "Gas Giant",
    "Ice Giant",
    "Hot Jupiter",
    "Silicate Planet",
    "Iron Planet",
    "Carbon Planet",
    "Super-Earth",
    "Desert Planet",
    "Ocean Planet",
    "Ice Planet",
    "Lava Planet",
    "Terran World",
    "Volcanic World",
    "Asteroid Belt",
    "Moon",
];

/// Suffixes for generated body names, one per possible body.
pub const BODY_NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

pub const RECRUIT_ROLES: [CrewRole; 5] = [
    CrewRole::Pilot,
    CrewRole::Engineer,
    CrewRole::Marine,
    CrewRole::Medic,
    CrewRole::Scientist,
];

pub const SPACER_NAMES: [&str; 8] = [
    "Jork", "Tali", "Garrus", "Wrex", "Mordin", "Thane", "Kasumi", "Zaeed",
];
pub const HIGHBORN_NAMES: [&str; 5] = [
    "Liara T'Soni",
    "Aurelius Vane",
    "Cassia Drummond",
    "Lord Ferris",
    "Octavia Marr",
];
pub const ALIEN_NAMES: [&str; 5] = ["Grunt", "Kal'Reegar", "Xik-Xik", "Oomlar", "Vorcha Bek"];
pub const SYNTHETIC_NAMES: [&str; 4] = ["Legion", "EDI-7", "Unit 42", "Cog"];

/// Name pool appropriate to a recruit's role.
#[must_use]
pub fn names_for_role(role: CrewRole) -> Vec<&'static str> {
    match role {
        CrewRole::Scientist => HIGHBORN_NAMES.to_vec(),
        CrewRole::Marine => SPACER_NAMES.iter().chain(&ALIEN_NAMES).copied().collect(),
        CrewRole::Engineer => SPACER_NAMES
            .iter()
            .chain(&SYNTHETIC_NAMES)
            .copied()
            .collect(),
        _ => SPACER_NAMES.to_vec(),
    }
}

pub const RUMORS: [&str; 2] = ["The void is quiet.", "Pirates in Sector 7."];

pub const RECRUIT_DESC: &str = "Ready for hire.";

/// Systems the galaxy map may list as warp destinations.
pub const NEIGHBOR_SYSTEMS: [&str; 10] = [
    "Sector 4",
    "The Void",
    "Kepler's Reach",
    "Tau Ceti",
    "Barnard's Star",
    "Sirius Drift",
    "Epsilon Eridani",
    "Vega Outpost",
    "Altair Expanse",
    "Gliese Hollow",
];

pub const GALAXY_PLACEHOLDERS: [&str; 3] = ["Alpha Centauri", "Proxima", "Wolf 359"];

/// Hand-authored bodies of the home system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarterBody {
    pub name: &'static str,
    pub kind: &'static str,
    pub economy: Economy,
    pub desc: &'static str,
    pub mineable: bool,
}

pub const STARTER_BODIES: [StarterBody; 4] = [
    StarterBody {
        name: "Veridia Prime",
        kind: "Terran",
        economy: Economy::Agrarian,
        desc: "Sector capital.",
        mineable: false,
    },
    StarterBody {
        name: "The Anvil",
        kind: "Volcanic",
        economy: Economy::Industrial,
        desc: "Smog world.",
        mineable: false,
    },
    StarterBody {
        name: "Echo IV",
        kind: "Gas Giant",
        economy: Economy::Mining,
        desc: "Gas giant.",
        mineable: false,
    },
    StarterBody {
        name: "Frostbite",
        kind: "Ice World",
        economy: Economy::Research,
        desc: "Frozen moon.",
        mineable: true,
    },
];

pub const STARTER_EQUIPMENT: [&str; 2] = ["Mining Laser", "Standard Fuel Tank"];

/// Starting hold: name, qty, unit value, unit weight, type.
pub const STARTER_CARGO: [(&str, u32, u64, f64, &str); 1] =
    [("Nutri-Paste Tubes", 5, 5, 0.5, "Food")];
