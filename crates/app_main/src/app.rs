//! Line-driven host for a triage session
//!
//! Each input line is either a key name (browse or route the displayed
//! image) or a `:` command that edits the binding table.

use anyhow::Result;
use app_core::{AppError, KeyOutcome, OperationMode, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
keys:      <name>           browse (Right/Left/Space/Backspace) or route via a bound key
bindings:  :add | :rm N | :key N K | :clear N | :name N FOLDER | :mode N copy|move
session:   :open PATH | :list | :help | :quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Key(String),
    Add,
    Remove(usize),
    AssignKey(usize, String),
    ClearKey(usize),
    Subfolder(usize, String),
    Mode(usize, OperationMode),
    Open(PathBuf),
    List,
    Help,
    Quit,
}

fn parse_index(arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or("missing binding number")?;
    arg.parse()
        .map_err(|_| format!("not a binding number: {}", arg))
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(Input::Key(line.to_string())));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    // index first, free text after it
    let (index_arg, text) = match rest.split_once(char::is_whitespace) {
        Some((index, text)) => (Some(index), text.trim()),
        None if rest.is_empty() => (None, ""),
        None => (Some(rest), ""),
    };

    let input = match name {
        "add" => Input::Add,
        "rm" => Input::Remove(parse_index(index_arg)?),
        "key" => {
            if text.is_empty() {
                return Err("usage: :key N KEY".into());
            }
            Input::AssignKey(parse_index(index_arg)?, text.to_string())
        }
        "clear" => Input::ClearKey(parse_index(index_arg)?),
        // an empty name is allowed; routing rejects it later
        "name" => Input::Subfolder(parse_index(index_arg)?, text.to_string()),
        "mode" => Input::Mode(parse_index(index_arg)?, text.parse()?),
        "open" if !rest.is_empty() => Input::Open(PathBuf::from(rest)),
        "open" => return Err("usage: :open PATH".into()),
        "list" | "ls" => Input::List,
        "help" | "?" => Input::Help,
        "quit" | "q" => Input::Quit,
        other => return Err(format!("unknown command: :{}", other)),
    };
    Ok(Some(input))
}

/// Apply one input to the session. Returns `false` when the host should exit.
fn execute(session: &mut Session, input: Input, out: &mut impl Write) -> io::Result<bool> {
    let result: Result<(), AppError> = match input {
        Input::Key(key) => session.on_key_pressed(&key).map(|outcome| match outcome {
            KeyOutcome::Ignored => {
                tracing::debug!("Ignored key {}", key);
            }
            KeyOutcome::Navigated(_) => {}
            KeyOutcome::Routed(routed) => {
                let verb = if routed.copied { "copied to" } else { "already in" };
                let _ = writeln!(out, "{} {} ({})", verb, routed.destination.display(), routed.mode);
            }
        }),
        Input::Add => session.on_add_binding().map(|added| {
            let _ = match added {
                Some(index) => writeln!(out, "added binding {}", index),
                None => writeln!(out, "all {} bindings in use", session.registry().max_bindings()),
            };
        }),
        Input::Remove(index) => session.on_remove_binding(index),
        Input::AssignKey(index, key) => session.on_assign_key(index, &key).map(|assigned| {
            if !assigned {
                let _ = writeln!(out, "binding {} keeps its key (clear it first, or the key is taken)", index);
            }
        }),
        Input::ClearKey(index) => session.on_clear_key(index),
        Input::Subfolder(index, name) => session.on_subfolder_edited(index, &name),
        Input::Mode(index, mode) => session.on_mode_changed(index, mode),
        Input::Open(path) => session.on_open_folder(&path).map(|paths| {
            let _ = writeln!(out, "{} images", paths.len());
        }),
        Input::List => {
            write_bindings(session, out)?;
            Ok(())
        }
        Input::Help => {
            writeln!(out, "{}", HELP)?;
            Ok(())
        }
        Input::Quit => return Ok(false),
    };

    if let Err(e) = result {
        if e.is_io() {
            tracing::warn!("Route failed: {}", e);
        } else if e.is_contract_violation() {
            tracing::debug!("Rejected: {}", e);
        }
        writeln!(out, "error: {}", e.user_message())?;
    }
    write_current(session, out)?;
    Ok(true)
}

fn write_bindings(session: &Session, out: &mut impl Write) -> io::Result<()> {
    if session.bindings().is_empty() {
        return writeln!(out, "no bindings (:add creates one)");
    }
    for binding in session.bindings() {
        let key = binding.key.as_ref().map_or("-", |k| k.as_str());
        writeln!(
            out,
            "{:>2}  {:<10} {:<5} {}",
            binding.index, key, binding.operation_mode, binding.subfolder_name
        )?;
    }
    Ok(())
}

fn write_current(session: &Session, out: &mut impl Write) -> io::Result<()> {
    match session.current_image() {
        Some(path) => {
            let position = session
                .images()
                .paths()
                .iter()
                .position(|p| p == path)
                .map_or(0, |i| i + 1);
            writeln!(out, "[{}/{}] {}", position, session.images().len(), path.display())
        }
        None => writeln!(out, "[no image]"),
    }
}

/// Drive `session` from `input` until it ends or `:quit`
fn run_with(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    write_current(session, out)?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(parsed)) => {
                if !execute(session, parsed, out)? {
                    break;
                }
            }
            Err(message) => writeln!(out, "{}", message)?,
        }
        out.flush()?;
    }

    Ok(())
}

pub fn run(mut session: Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(&mut session, stdin.lock(), &mut stdout)?;

    tracing::info!("ImageTriage exiting");
    Ok(())
}
