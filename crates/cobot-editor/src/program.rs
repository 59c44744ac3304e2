//! Program documents exchanged with the host storage API.
//!
//! ```json
//! {
//!   "points": { "0": [90, 45, 30, 0] },
//!   "commands": [
//!     { "type": "move", "params": { "point": 0, "mode": "Linear", "speed": 50 } },
//!     { "type": "gripper", "params": { "acao": 1 } },
//!     { "type": "delay", "params": { "delay": 1.5 } }
//!   ]
//! }
//! ```
//!
//! `points` belongs to the point-management glue and is carried through
//! untouched. Command order is execution order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::{BlockParams, CommandKind};

/// One serialized command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramCommand {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub params: BlockParams,
}

/// Serializable program: opaque points plus the ordered command list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgramDocument {
    pub points: Map<String, Value>,
    pub commands: Vec<ProgramCommand>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    points: Map<String, Value>,
    #[serde(default)]
    commands: Vec<RawCommand>,
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: Value,
}

impl ProgramDocument {
    /// Parse a document produced by [`to_json_string`](Self::to_json_string)
    /// or by earlier versions of the editor.
    pub fn from_json_str(json: &str) -> Result<Self, ProgramError> {
        let raw: RawDocument = serde_json::from_str(json).map_err(ProgramError::Json)?;
        Self::from_raw(raw)
    }

    /// Parse from an already decoded JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, ProgramError> {
        let raw: RawDocument = serde_json::from_value(value).map_err(ProgramError::Json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> Result<Self, ProgramError> {
        let commands = raw
            .commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| {
                let kind = document_kind(&command.kind).ok_or_else(|| {
                    ProgramError::UnknownCommand {
                        index,
                        marker: command.kind.clone(),
                    }
                })?;
                let params = match command.params {
                    Value::Null => BlockParams::new(),
                    Value::Object(map) => map,
                    _ => return Err(ProgramError::ParamsNotObject { index }),
                };
                Ok(ProgramCommand { kind, params })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            points: raw.points,
            commands,
        })
    }

    /// Encode as compact JSON.
    pub fn to_json_string(&self) -> Result<String, ProgramError> {
        serde_json::to_string(self).map_err(ProgramError::Json)
    }
}

// Documents are machine written, so markers must match exactly.
fn document_kind(marker: &str) -> Option<CommandKind> {
    match marker {
        "move" | "mover" => Some(CommandKind::Move),
        "gripper" | "garra" => Some(CommandKind::Gripper),
        "delay" => Some(CommandKind::Delay),
        _ => None,
    }
}

/// Errors while decoding or encoding program documents.
#[derive(Debug)]
pub enum ProgramError {
    Json(serde_json::Error),
    UnknownCommand { index: usize, marker: String },
    ParamsNotObject { index: usize },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(error) => write!(f, "program JSON error: {error}"),
            Self::UnknownCommand { index, marker } => {
                write!(f, "command {index} has unknown type {marker:?}")
            }
            Self::ParamsNotObject { index } => {
                write!(f, "command {index} params must be a JSON object")
            }
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Json(error) = self {
            return Some(error);
        }
        None
    }
}
