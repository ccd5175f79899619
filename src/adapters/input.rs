//! Line-oriented input adapter.
//!
//! Stands in for the pointer, drag-and-drop and status-menu surfaces of a
//! windowed build.  One command per line:
//!
//! | Line                                   | Meaning                       |
//! |----------------------------------------|-------------------------------|
//! | `click` / `double-click`               | feed / dance                  |
//! | `drag-start`, `drag <dx> <dy>`, `drag-end` | option-drag               |
//! | `drop <path>...`                       | files dropped on the pet      |
//! | `click-through`, `lock`                | toggle the setting            |
//! | `reset`, `show`, `hide`, `quit`        | status menu items             |
//! | `screen <x> <y> <w> <h> [<vx> <vy> <vw> <vh>]` | display reconfigured  |
//!
//! A reader thread parses lines and forwards them over a channel; the main
//! loop drains it with `try_recv` each iteration.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::{info, warn};

use crate::app::commands::AppCommand;
use crate::error::InputError;
use crate::geometry::{Rect, ScreenGeometry};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    /// A command for the application service.
    App(AppCommand),
    /// The display changed to this geometry.
    Screen(ScreenGeometry),
}

fn number(token: Option<&str>, name: &'static str) -> Result<f64, InputError> {
    let token = token.ok_or(InputError::MissingArgument(name))?;
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::BadNumber(token.to_string()))
}

fn rect<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Rect, InputError> {
    Ok(Rect::new(
        number(tokens.next(), "x")?,
        number(tokens.next(), "y")?,
        number(tokens.next(), "width")?,
        number(tokens.next(), "height")?,
    ))
}

/// Parse one line.  Verbs are case-insensitive.
pub fn parse_line(line: &str) -> Result<InputLine, InputError> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().ok_or(InputError::Empty)?.to_ascii_lowercase();

    let cmd = match verb.as_str() {
        "click" => AppCommand::Click,
        "double-click" => AppCommand::DoubleClick,
        "drag-start" => AppCommand::DragStart,
        "drag" => AppCommand::DragMove {
            dx: number(tokens.next(), "dx")?,
            dy: number(tokens.next(), "dy")?,
        },
        "drag-end" => AppCommand::DragEnd,
        "drop" => {
            let paths: Vec<PathBuf> = tokens.map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err(InputError::MissingArgument("path"));
            }
            AppCommand::DropFiles(paths)
        }
        "click-through" => AppCommand::ToggleClickThrough,
        "lock" => AppCommand::ToggleLockPosition,
        "reset" => AppCommand::ResetPosition,
        "show" => AppCommand::ShowPet,
        "hide" => AppCommand::HidePet,
        "quit" => AppCommand::Quit,
        "screen" => {
            let frame = rect(&mut tokens)?;
            let visible = match tokens.next() {
                None => frame,
                Some(first) => {
                    let mut rest = std::iter::once(first).chain(&mut tokens);
                    rect(&mut rest)?
                }
            };
            return Ok(InputLine::Screen(ScreenGeometry::new(frame, visible)));
        }
        _ => return Err(InputError::UnknownCommand(verb)),
    };
    Ok(InputLine::App(cmd))
}

/// Spawn a thread that parses `reader` line by line into `tx`.  Blank
/// and `#` comment lines are skipped; bad lines are logged and skipped.
/// The thread ends at EOF, on a read error, or when `tx` has no receiver.
pub fn spawn_reader<R>(reader: R, tx: Sender<InputLine>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Input: read failed: {}", e);
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_line(trimmed) {
                Ok(parsed) => {
                    if tx.send(parsed).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Input: {}", e),
            }
        }
        info!("Input: reader finished");
    })
}

/// Spawn the stdin reader and return the receiving end.
pub fn spawn_stdin_reader() -> (Receiver<InputLine>, thread::JoinHandle<()>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = spawn_reader(std::io::BufReader::new(std::io::stdin()), tx);
    (rx, handle)
}
