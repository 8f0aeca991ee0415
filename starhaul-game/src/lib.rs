//! Starhaul Game Engine
//!
//! Platform-agnostic core of the Starhaul space-trading game: the persistent
//! game state, the command grammar, world generation, and the economic and
//! encounter rules. Hosts supply persistence and the optional generative
//! fallback through the traits below.

pub mod command;
pub mod config;
pub mod constants;
pub mod data;
pub mod dice;
pub mod encounters;
pub mod fallback;
pub mod ledger;
pub mod mining;
pub mod navigation;
pub mod numbers;
pub mod persistence;
pub mod session;
pub mod state;
pub mod sync;
pub mod world;

use log::{info, warn};
use thiserror::Error;

pub use command::{Command, CommandError};
pub use config::{ConfigError, EngineConfig};
pub use dice::{Dice, ScriptedDice, SeededDice};
pub use encounters::{kind_for_roll, roll_encounter, ship_power, win_probability};
pub use fallback::{FallbackError, FallbackInterpreter, NoFallback};
pub use mining::{MineralTier, MiningYield};
pub use persistence::{LoadReport, MemoryStorage, SnapshotError, load_or_fresh, parse_snapshot};
pub use session::{CommandReport, GameSession};
pub use state::{
    BodyCategory, CargoStack, CelestialBody, CrewMember, CrewRole, Economy, Encounter,
    EncounterDetail, EncounterKind, GameState, LogEntry, LogKind, MarketEntry, PartKind, Rarity,
    Recruit, Ship, ShipPart, ViewMode,
};
pub use sync::{sync_ship, sync_state};

/// Save slot used by hosts that keep a single game.
pub const DEFAULT_SLOT: &str = "game_state";

/// Trait for abstracting save/load operations\
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw snapshot stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage medium cannot be read.
    fn load_snapshot(&self, slot: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite `slot` with a full snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_snapshot(&self, slot: &str, raw: &str) -> Result<(), Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, slot: &str) -> Result<(), Self::Error>;

    /// Keep a copy of a snapshot that failed validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy cannot be made.
    fn backup_corrupt(&self, _slot: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Failure writing the state back to storage.
#[derive(Debug, Error)]
pub enum PersistError<E>
where
    E: std::error::Error + 'static,
{
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage write failed: {0}")]
    Storage(#[source] E),
}

/// Main game engine: one session, persisted after every command.
pub struct GameEngine<S, F, D = SeededDice>
where
    S: GameStorage,
    F: FallbackInterpreter,
    D: Dice,
{
    storage: S,
    fallback: F,
    session: GameSession<D>,
    slot: String,
    load_report: LoadReport,
}

impl<S, F> GameEngine<S, F, SeededDice>
where
    S: GameStorage,
    F: FallbackInterpreter,
{
    /// Load the default slot (or start fresh) and roll from the configured seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn boot(storage: S, fallback: F, config: EngineConfig) -> Result<Self, ConfigError> {
        let dice = config
            .seed
            .map_or_else(SeededDice::from_entropy, SeededDice::from_user_seed);
        Self::boot_with_dice(storage, fallback, config, dice)
    }
}

impl<S, F, D> GameEngine<S, F, D>
where
    S: GameStorage,
    F: FallbackInterpreter,
    D: Dice,
{
    /// Load the default slot (or start fresh) with an explicit roll source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn boot_with_dice(
        storage: S,
        fallback: F,
        config: EngineConfig,
        dice: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (state, load_report) = load_or_fresh(&storage, DEFAULT_SLOT);
        info!("engine boot: {load_report}");
        let session = GameSession::new(state, dice, config);
        let engine = Self {
            storage,
            fallback,
            session,
            slot: DEFAULT_SLOT.to_string(),
            load_report,
        };
        if engine.load_report != LoadReport::Loaded {
            engine.persist_or_warn();
        }
        Ok(engine)
    }

    /// Run one command and persist the resulting snapshot.
    pub fn handle_command(&mut self, input: &str) -> CommandReport {
        let report = self.session.execute(input, &self.fallback);
        if report.accepted
            && report.command == Command::Restart.label()
            && let Err(err) = self.storage.delete_save(&self.slot)
        {
            warn!("deleting slot {} failed: {err}", self.slot);
        }
        self.persist_or_warn();
        report
    }

    /// Write the current state to the engine's slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or stored.
    pub fn persist(&self) -> Result<(), PersistError<S::Error>> {
        let raw = persistence::to_snapshot(self.session.state())?;
        self.storage
            .save_snapshot(&self.slot, &raw)
            .map_err(PersistError::Storage)
    }

    fn persist_or_warn(&self) {
        if let Err(err) = self.persist() {
            warn!("state not persisted: {err}");
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.session.state()
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession<D> {
        &self.session
    }

    #[must_use]
    pub const fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn fallback(&self) -> &F {
        &self.fallback
    }
}
