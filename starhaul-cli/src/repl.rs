use colored::Colorize;
use starhaul_game::{Dice, FallbackInterpreter, GameEngine, GameState, GameStorage, LogEntry, LogKind};
use std::io::{self, BufRead, Write};

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// Interactive loop: one command per line until EOF or `quit`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run<S, F, D>(
    engine: &mut GameEngine<S, F, D>,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()>
where
    S: GameStorage,
    F: FallbackInterpreter,
    D: Dice,
{
    writeln!(out, "{}", "Starhaul Command Console".bright_cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;
    for entry in &engine.state().log {
        print_entry(out, entry)?;
    }
    print_status(out, engine.state())?;
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        if command.is_empty() {
            prompt(out)?;
            continue;
        }
        if QUIT_WORDS.iter().any(|word| command.eq_ignore_ascii_case(word)) {
            break;
        }
        let report = engine.handle_command(command);
        for entry in &report.entries {
            print_entry(out, entry)?;
        }
        print_status(out, engine.state())?;
        prompt(out)?;
    }
    writeln!(out, "{}", "Channel closed.".dimmed())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{} ", ">".bright_white().bold())?;
    out.flush()
}

fn print_entry(out: &mut impl Write, entry: &LogEntry) -> io::Result<()> {
    let line = match entry.kind {
        LogKind::System => entry.text.cyan(),
        LogKind::Player => entry.text.green(),
        LogKind::Error => entry.text.red(),
    };
    writeln!(out, "  {line}")
}

fn print_status(out: &mut impl Write, state: &GameState) -> io::Result<()> {
    let stats = &state.ship.stats;
    let place = if state.meta.landed {
        format!("landed on {}", state.meta.orbiting)
    } else {
        format!("orbiting {}", state.meta.orbiting)
    };
    writeln!(
        out,
        "{} {} | {} U | hull {}% shields {}% | ion {} warp {} | slots {}/{}",
        state.meta.location.bold(),
        place,
        state.player.units.to_string().yellow(),
        stats.hull,
        stats.shields,
        stats.fuel_ion,
        stats.fuel_warp,
        stats.slots_used,
        stats.slots_max
    )?;
    if let Some(encounter) = &state.encounter {
        let label = format!("CONTACT: {}", encounter.text);
        let label = if encounter.hostile {
            label.red().bold()
        } else {
            label.yellow()
        };
        writeln!(out, "{label}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use starhaul_game::{EngineConfig, MemoryStorage, NoFallback, ScriptedDice};

    fn play(script: &str) -> (String, GameEngine<MemoryStorage, NoFallback, ScriptedDice>) {
        let mut engine = GameEngine::boot_with_dice(
            MemoryStorage::default(),
            NoFallback,
            EngineConfig::default(),
            ScriptedDice::default().with_fallback(0.9),
        )
        .unwrap();
        let mut out = Vec::new();
        run(&mut engine, script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), engine)
    }

    #[test]
    fn commands_are_applied_until_quit() {
        let (out, engine) = play("Travel to Echo IV\n\nquit\nTravel to Frostbite\n");
        assert!(out.contains("System Online."));
        assert!(out.contains("Orbit established: Echo IV"));
        assert!(out.contains("Channel closed."));
        assert_eq!(engine.state().meta.orbiting, "Echo IV");
    }

    #[test]
    fn rejections_are_shown() {
        let (out, _) = play("Land on Frostbite\n");
        assert!(out.contains("Must orbit Frostbite to land."));
    }
}
