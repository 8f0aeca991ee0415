use log::{error, info, warn};
use serde::Serialize;

use crate::command::{Command, CommandError};
use crate::config::EngineConfig;
use crate::constants::LOG_COMMS_UNCLEAR;
use crate::dice::{Dice, SeededDice};
use crate::encounters;
use crate::fallback::{FallbackError, FallbackInterpreter, accept_rewrite, build_prompt};
use crate::ledger;
use crate::mining::mine;
use crate::navigation;
use crate::numbers::usize_to_u64;
use crate::state::{GameState, LogEntry, LogKind};
use crate::sync::sync_state;
use crate::world::publish_current_system;

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub accepted: bool,
    /// Log entries the command appended, oldest first.
    pub entries: Vec<LogEntry>,
}

/// Owns the game state and the roll source; every command flows through here.
#[derive(Debug, Clone)]
pub struct GameSession<D: Dice> {
    state: GameState,
    dice: D,
    config: EngineConfig,
}

impl GameSession<SeededDice> {
    /// Session rolling from the configured seed, or OS entropy without one.
    #[must_use]
    pub fn seeded(state: GameState, config: EngineConfig) -> Self {
        let dice = config
            .seed
            .map_or_else(SeededDice::from_entropy, SeededDice::from_user_seed);
        Self::new(state, dice, config)
    }
}

impl<D: Dice> GameSession<D> {
    /// Wrap a state, normalizing it first: derived fields are recomputed and
    /// the current system is cached and published to the map.
    #[must_use]
    pub fn new(mut state: GameState, mut dice: D, config: EngineConfig) -> Self {
        sync_state(&mut state);
        publish_current_system(&mut state, &mut dice);
        state.trim_log(config.log_capacity);
        Self {
            state,
            dice,
            config,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply a closure to the mutable game state, then resynchronize.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let result = f(&mut self.state);
        sync_state(&mut self.state);
        result
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn dice(&self) -> &D {
        &self.dice
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Parse and run one line of player input. Rejections never escape:
    /// they become error entries in the log feed.
    pub fn execute<F: FallbackInterpreter>(&mut self, input: &str, fallback: &F) -> CommandReport {
        let before = self.state.log_written();
        let (label, accepted) = match Command::parse(input) {
            Err(err) => {
                self.reject(&err);
                ("invalid", false)
            }
            Ok(command) => {
                let label = command.label();
                let outcome = self.gate(&command).and_then(|()| match &command {
                    Command::Freeform(text) => Ok(self.consult_fallback(text, fallback)),
                    other => self.apply(other).map(|()| true),
                });
                match outcome {
                    Ok(accepted) => (label, accepted),
                    Err(err) => {
                        self.reject(&err);
                        (label, false)
                    }
                }
            }
        };
        sync_state(&mut self.state);
        self.state.trim_log(self.config.log_capacity);
        if accepted {
            info!("command {label} applied");
        }
        CommandReport {
            command: label.to_string(),
            accepted,
            entries: self.entries_since(before),
        }
    }

    /// Route a parsed grammar command to its component.
    ///
    /// # Errors
    ///
    /// Returns the component's rejection; the state is unchanged in that case.
    pub fn apply(&mut self, command: &Command) -> Result<(), CommandError> {
        let state = &mut self.state;
        let dice = &mut self.dice;
        match command {
            Command::Travel { target } => {
                navigation::travel(state, target, self.config.interdiction_chance, dice)
            }
            Command::Warp { target } => navigation::warp(state, target, dice),
            Command::Land { target } => navigation::land(state, target, dice),
            Command::Takeoff => {
                navigation::takeoff(state);
                Ok(())
            }
            Command::ScanSector => {
                navigation::scan_sector(state, dice);
                Ok(())
            }
            Command::GalaxyMap => {
                navigation::galaxy_map(state);
                Ok(())
            }
            Command::Mine { target } => {
                if state.encounter.is_some() {
                    encounters::mine_asteroid(state, dice).map(drop)
                } else {
                    mine_body(state, target, dice)
                }
            }
            Command::BuyPart { name } => ledger::buy_part(state, name).map(drop),
            Command::Buy { qty, item } => ledger::buy_commodity(state, item, *qty).map(drop),
            Command::Sell { qty, item } => ledger::sell_commodity(state, item, *qty).map(drop),
            Command::Recruit { name } => ledger::recruit(state, name).map(drop),
            Command::Attack => encounters::attack(state, dice),
            Command::Flee => encounters::flee(state),
            Command::Ignore => encounters::ignore(state),
            Command::Trade => encounters::trade(state),
            Command::Salvage => encounters::salvage(state, dice),
            Command::Restart => {
                self.restart();
                Ok(())
            }
            Command::Freeform(text) => Err(CommandError::validation(format!(
                "Command not recognized: {text}"
            ))),
        }
    }

    /// Replace the state with the canonical starter state.
    pub fn restart(&mut self) {
        let written = self.state.log_written();
        let mut fresh = GameState::fresh();
        publish_current_system(&mut fresh, &mut self.dice);
        fresh.resume_log_count(written.saturating_add(usize_to_u64(fresh.log.len())));
        self.state = fresh;
        info!("game restarted");
    }

    fn gate(&self, command: &Command) -> Result<(), CommandError> {
        let pending = self.state.encounter.is_some();
        if pending && !command.resolves_encounter() && *command != Command::Restart {
            return Err(CommandError::EncounterPending);
        }
        Ok(())
    }

    fn reject(&mut self, err: &CommandError) {
        warn!("command rejected: {err}");
        self.state.record(LogKind::Error, err.to_string());
    }

    /// Hand an out-of-grammar command to the collaborator. Returns whether
    /// its rewrite was accepted.
    fn consult_fallback<F: FallbackInterpreter>(&mut self, text: &str, fallback: &F) -> bool {
        if !fallback.is_enabled() {
            self.state
                .record(LogKind::Error, format!("Command not recognized: {text}"));
            return false;
        }
        let rewritten = build_prompt(&self.state, text).and_then(|prompt| {
            let reply = fallback
                .rewrite(&prompt)
                .map_err(|err| FallbackError::Transport(err.to_string()))?;
            accept_rewrite(&reply)
        });
        match rewritten {
            Ok(mut next) => {
                // cached systems are never replaced
                for (name, bodies) in &self.state.known_systems {
                    next.known_systems.insert(name.clone(), bodies.clone());
                }
                publish_current_system(&mut next, &mut self.dice);
                next.resume_log_count(self.state.log_written());
                next.record(LogKind::System, format!("Directive processed: {text}"));
                self.state = next;
                true
            }
            Err(err) => {
                error!("fallback failed for {text:?}: {err}");
                self.state.record(LogKind::Error, LOG_COMMS_UNCLEAR);
                false
            }
        }
    }

    fn entries_since(&self, before: u64) -> Vec<LogEntry> {
        let appended = self.state.log_written().saturating_sub(before);
        let appended = usize::try_from(appended).unwrap_or(usize::MAX);
        let skip = self.state.log.len().saturating_sub(appended);
        self.state.log.iter().skip(skip).cloned().collect()
    }
}

/// Mine a body of the current system outside of any encounter.
fn mine_body(
    state: &mut GameState,
    target: &str,
    dice: &mut impl Dice,
) -> Result<(), CommandError> {
    let body = state
        .find_body(target)
        .filter(|body| body.mineable)
        .ok_or_else(|| {
            CommandError::location(format!("{target} is not a mineable body in this system."))
        })?;
    if !state.meta.orbiting.eq_ignore_ascii_case(&body.name) {
        return Err(CommandError::location(format!(
            "Must orbit {} to mine.",
            body.name
        )));
    }
    mine(state, dice);
    Ok(())
}
