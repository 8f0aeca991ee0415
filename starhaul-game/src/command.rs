//! Text command grammar and the rejection taxonomy shared by every operation.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a command was rejected. Every variant is raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(String),
    #[error("Insufficient funds: need {needed} U, have {available} U.")]
    Affordability { needed: u64, available: u64 },
    #[error("{0}")]
    Capacity(String),
    #[error("{0}")]
    Location(String),
    #[error("Resolve the current encounter first.")]
    EncounterPending,
    #[error("No active encounter.")]
    NoEncounter,
}

impl CommandError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn capacity(message: impl Into<String>) -> Self {
        Self::Capacity(message.into())
    }

    pub(crate) fn location(message: impl Into<String>) -> Self {
        Self::Location(message.into())
    }

    /// Reject unless `available` covers `needed`.
    pub(crate) const fn ensure_funds(needed: u64, available: u64) -> Result<(), Self> {
        if available < needed {
            Err(Self::Affordability { needed, available })
        } else {
            Ok(())
        }
    }
}

/// A parsed player intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Travel { target: String },
    Warp { target: String },
    Land { target: String },
    Takeoff,
    ScanSector,
    GalaxyMap,
    Mine { target: String },
    BuyPart { name: String },
    Buy { qty: u32, item: String },
    Sell { qty: u32, item: String },
    Recruit { name: String },
    Attack,
    Flee,
    Ignore,
    Trade,
    Salvage,
    Restart,
    /// Anything outside the grammar; handed to the fallback interpreter.
    Freeform(String),
}

impl Command {
    /// Parse one line of player input. Case-insensitive, whitespace-normalized.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Validation`] for empty input, or when a known
    /// keyword is followed by a payload that does not fit its form.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let text = input.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Err(CommandError::validation("Empty command."));
        }
        if let Some(bare) = parse_bare(&text) {
            return Ok(bare);
        }
        let keyword = text
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let Some(form) = FORMS.iter().find(|form| form.keyword == keyword) else {
            return Ok(Self::Freeform(text));
        };
        let malformed = || CommandError::validation(format!("Usage: {}", form.usage));
        let grammar = grammar().ok_or_else(malformed)?;
        match form.keyword {
            "buy" => {
                if let Some(caps) = grammar.buy_part.captures(&text) {
                    return Ok(Self::BuyPart {
                        name: caps["name"].to_string(),
                    });
                }
                let caps = grammar.buy.captures(&text).ok_or_else(malformed)?;
                Ok(Self::Buy {
                    qty: parse_qty(&caps["qty"])?,
                    item: caps["item"].to_string(),
                })
            }
            "sell" => {
                let caps = grammar.sell.captures(&text).ok_or_else(malformed)?;
                Ok(Self::Sell {
                    qty: parse_qty(&caps["qty"])?,
                    item: caps["item"].to_string(),
                })
            }
            keyword => {
                let regex = match keyword {
                    "travel" => &grammar.travel,
                    "warp" => &grammar.warp,
                    "land" => &grammar.land,
                    "recruit" => &grammar.recruit,
                    _ => &grammar.mine,
                };
                let target = regex
                    .captures(&text)
                    .map(|caps| caps["target"].to_string())
                    .filter(|target| !is_connective(target))
                    .ok_or_else(malformed)?;
                Ok(match keyword {
                    "travel" => Self::Travel { target },
                    "warp" => Self::Warp { target },
                    "land" => Self::Land { target },
                    "recruit" => Self::Recruit { name: target },
                    _ => Self::Mine { target },
                })
            }
        }
    }

    /// Short name used in reports and diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Travel { .. } => "travel",
            Self::Warp { .. } => "warp",
            Self::Land { .. } => "land",
            Self::Takeoff => "takeoff",
            Self::ScanSector => "scan_sector",
            Self::GalaxyMap => "galaxy_map",
            Self::Mine { .. } => "mine",
            Self::BuyPart { .. } => "buy_part",
            Self::Buy { .. } => "buy",
            Self::Sell { .. } => "sell",
            Self::Recruit { .. } => "recruit",
            Self::Attack => "attack",
            Self::Flee => "flee",
            Self::Ignore => "ignore",
            Self::Trade => "trade",
            Self::Salvage => "salvage",
            Self::Restart => "restart",
            Self::Freeform(_) => "freeform",
        }
    }

    /// Commands allowed while an encounter is pending.
    #[must_use]
    pub const fn resolves_encounter(&self) -> bool {
        matches!(
            self,
            Self::Attack
                | Self::Flee
                | Self::Ignore
                | Self::Trade
                | Self::Salvage
                | Self::Mine { .. }
        )
    }
}

struct Form {
    keyword: &'static str,
    usage: &'static str,
}

const FORMS: [Form; 7] = [
    Form {
        keyword: "travel",
        usage: "Travel to <body>",
    },
    Form {
        keyword: "warp",
        usage: "Warp to <system>",
    },
    Form {
        keyword: "land",
        usage: "Land on <body>",
    },
    Form {
        keyword: "buy",
        usage: "Buy <qty> <item> | Buy Part <part>",
    },
    Form {
        keyword: "sell",
        usage: "Sell <qty> <item>",
    },
    Form {
        keyword: "recruit",
        usage: "Recruit <name>",
    },
    Form {
        keyword: "mine",
        usage: "Mine <target>",
    },
];

struct Grammar {
    travel: Regex,
    warp: Regex,
    land: Regex,
    buy_part: Regex,
    buy: Regex,
    sell: Regex,
    recruit: Regex,
    mine: Regex,
}

fn grammar() -> Option<&'static Grammar> {
    static GRAMMAR: OnceLock<Option<Grammar>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| {
            Some(Grammar {
                travel: Regex::new(r"(?i)^travel (?:to )?(?P<target>.+)$").ok()?,
                warp: Regex::new(r"(?i)^warp (?:to )?(?P<target>.+)$").ok()?,
                land: Regex::new(r"(?i)^land (?:on )?(?P<target>.+)$").ok()?,
                buy_part: Regex::new(r"(?i)^buy part (?P<name>.+)$").ok()?,
                buy: Regex::new(r"(?i)^buy (?P<qty>\d+) (?P<item>.+)$").ok()?,
                sell: Regex::new(r"(?i)^sell (?P<qty>\d+) (?P<item>.+)$").ok()?,
                recruit: Regex::new(r"(?i)^recruit (?P<target>.+)$").ok()?,
                mine: Regex::new(r"(?i)^mine (?P<target>.+)$").ok()?,
            })
        })
        .as_ref()
}

fn parse_bare(text: &str) -> Option<Command> {
    if text.eq_ignore_ascii_case("RESTART_GAME") {
        return Some(Command::Restart);
    }
    let command = match text.to_ascii_lowercase().as_str() {
        "takeoff" | "take off" => Command::Takeoff,
        "scan sector" => Command::ScanSector,
        "galaxy map" => Command::GalaxyMap,
        "attack" => Command::Attack,
        "flee" => Command::Flee,
        "ignore" => Command::Ignore,
        "trade" => Command::Trade,
        "salvage" => Command::Salvage,
        _ => return None,
    };
    Some(command)
}

fn parse_qty(raw: &str) -> Result<u32, CommandError> {
    match raw.parse::<u32>() {
        Ok(0) => Err(CommandError::validation("Quantity must be at least 1.")),
        Ok(qty) => Ok(qty),
        Err(_) => Err(CommandError::validation(format!(
            "Quantity {raw} is out of range."
        ))),
    }
}

fn is_connective(target: &str) -> bool {
    ["to", "on"]
        .iter()
        .any(|word| target.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_commands_case_insensitively() {
        assert_eq!(
            Command::parse("  travel   TO  The Anvil ").unwrap(),
            Command::Travel {
                target: "The Anvil".to_string()
            }
        );
        assert_eq!(
            Command::parse("Warp to Sector 4").unwrap(),
            Command::Warp {
                target: "Sector 4".to_string()
            }
        );
        assert_eq!(
            Command::parse("LAND ON Frostbite").unwrap(),
            Command::Land {
                target: "Frostbite".to_string()
            }
        );
        assert_eq!(Command::parse("Takeoff").unwrap(), Command::Takeoff);
        assert_eq!(Command::parse("scan sector").unwrap(), Command::ScanSector);
        assert_eq!(Command::parse("Galaxy Map").unwrap(), Command::GalaxyMap);
    }

    #[test]
    fn buy_part_wins_over_commodity_form() {
        assert_eq!(
            Command::parse("Buy Part Pulse Laser").unwrap(),
            Command::BuyPart {
                name: "Pulse Laser".to_string()
            }
        );
        assert_eq!(
            Command::parse("Buy 5 Ionic Gel").unwrap(),
            Command::Buy {
                qty: 5,
                item: "Ionic Gel".to_string()
            }
        );
        assert_eq!(
            Command::parse("sell 2 Rare Ore").unwrap(),
            Command::Sell {
                qty: 2,
                item: "Rare Ore".to_string()
            }
        );
    }

    #[test]
    fn encounter_commands_and_restart() {
        assert_eq!(Command::parse("ATTACK").unwrap(), Command::Attack);
        assert_eq!(Command::parse("flee").unwrap(), Command::Flee);
        assert_eq!(Command::parse("RESTART_GAME").unwrap(), Command::Restart);
        assert_eq!(
            Command::parse("Mine Asteroid").unwrap(),
            Command::Mine {
                target: "Asteroid".to_string()
            }
        );
        assert!(Command::parse("salvage").unwrap().resolves_encounter());
        assert!(!Command::parse("takeoff").unwrap().resolves_encounter());
    }

    #[test]
    fn malformed_payloads_are_validation_errors() {
        for input in [
            "",
            "   ",
            "Buy lots of Gel",
            "Sell 0 Gel",
            "Travel to",
            "Land",
            "Buy 99999999999 Gel",
        ] {
            let err = Command::parse(input).unwrap_err();
            assert!(
                matches!(err, CommandError::Validation(_)),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn unknown_text_is_freeform() {
        assert_eq!(
            Command::parse("hail the  station").unwrap(),
            Command::Freeform("hail the station".to_string())
        );
        assert_eq!(Command::parse("Recruit Tali").unwrap().label(), "recruit");
    }

    #[test]
    fn affordability_message_names_both_amounts() {
        let err = CommandError::ensure_funds(950, 100).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds: need 950 U, have 100 U.");
        assert!(CommandError::ensure_funds(10, 10).is_ok());
    }
}
