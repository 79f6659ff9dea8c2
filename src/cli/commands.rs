//! Line commands for the interactive dashboard loop

use hexroute::{Action, CameraState, Error, Result};

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Synchronous state change
    Dispatch(Action),
    /// Request a route between the selected cells
    Draw,
    /// Print the camera, or apply a gesture when values are given
    View,
    /// Print the current render frame
    Layers,
    /// List origin and destination identifiers
    Options,
    /// Tooltip of the cell with this destination id
    Pick(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  origin [ID]            select the origin cell (no ID clears it)
  destination [ID]       select the destination cell (alias: dest)
  draw                   fetch and draw the route between the selected cells
  remove                 clear the route, markers and trip stats
  toggle | cells on|off  show or hide the hexagon cells
  flat                   set pitch to 0
  rotate DEG             add DEG to the bearing
  reset                  restore the initial camera
  view [LNG LAT ZOOM PITCH BEARING]
                         print the camera, or move it as a drag/zoom would
  layers                 print the render frame as JSON
  options                list origin and destination identifiers
  pick ID                show the tooltip of a destination cell
  help                   show this text
  quit                   leave";

fn number(word: Option<&str>, what: &str) -> Result<f64> {
    let word = word.ok_or_else(|| Error::InvalidInput(format!("missing {what}")))?;
    word.parse()
        .map_err(|_| Error::InvalidInput(format!("'{word}' is not a valid {what}")))
}

/// Parse one input line; blank lines give `None`
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let id = rest.first().map(|s| s.to_string());

    let command = match head.to_lowercase().as_str() {
        "origin" | "o" => Command::Dispatch(Action::SelectOrigin(id)),
        "destination" | "dest" | "d" => Command::Dispatch(Action::SelectDestination(id)),
        "draw" | "route" => Command::Draw,
        "remove" | "clear" => Command::Dispatch(Action::RemoveRoute),
        "toggle" => Command::Dispatch(Action::ToggleCells),
        "cells" => match rest.first().copied() {
            Some("on") => Command::Dispatch(Action::ShowCells(true)),
            Some("off") => Command::Dispatch(Action::ShowCells(false)),
            None => Command::Dispatch(Action::ToggleCells),
            Some(other) => {
                return Err(Error::InvalidInput(format!("cells expects on or off, got '{other}'")))
            }
        },
        "flat" => Command::Dispatch(Action::SetFlat),
        "rotate" => Command::Dispatch(Action::Rotate(number(rest.first().copied(), "angle")?)),
        "reset" => Command::Dispatch(Action::ResetCamera),
        "view" if rest.is_empty() => Command::View,
        "view" => {
            let mut values = rest.iter().copied();
            let state = CameraState {
                longitude: number(values.next(), "longitude")?,
                latitude: number(values.next(), "latitude")?,
                zoom: number(values.next(), "zoom")?,
                pitch: number(values.next(), "pitch")?,
                bearing: number(values.next(), "bearing")?,
            };
            Command::Dispatch(Action::ViewChanged(state))
        }
        "layers" | "frame" => Command::Layers,
        "options" | "list" => Command::Options,
        "pick" => match id {
            Some(id) => Command::Pick(id),
            None => return Err(Error::InvalidInput("pick expects a destination id".to_string())),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(Error::InvalidInput(format!(
                "unknown command '{other}' (type 'help')"
            )))
        }
    };

    Ok(Some(command))
}
