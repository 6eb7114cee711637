//! Wire protocol: framed binary messages from the server, newline-delimited
//! text commands to it.
//!
//! Every server message starts with an 8-byte little-endian header (message
//! type, then a type-dependent payload word) followed by an optional body.
//! Planet ids are not on the wire; they are assigned by receive order and
//! stay stable until the next wholesale planet update.

use std::fmt;
use std::io::{self, Read};

use duel_core::{Planet, Vec2};

/// Protocol generation this bot speaks. Message types 4 and 7 died in
/// earlier generations and are rejected outright.
pub const PROTOCOL_VERSION: u32 = 9;

const MSG_WELCOME: u32 = 1;
const MSG_PLAYER_LEFT: u32 = 2;
const MSG_PLAYER_POS: u32 = 3;
const MSG_SHOT_FINISHED_LEGACY: u32 = 4;
const MSG_SHOT_BEGIN: u32 = 5;
const MSG_SHOT_END: u32 = 6;
const MSG_GAME_MODE_LEGACY: u32 = 7;
const MSG_ENERGY: u32 = 8;
const MSG_PLANETS: u32 = 9;

#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Our assigned player id.
    Welcome { id: u32 },
    PlayerLeft { id: u32 },
    /// Join, move and reset all arrive as a position report.
    PlayerPos { id: u32, position: Vec2 },
    ShotBegin {
        shooter: u32,
        angle: f64,
        velocity: f64,
    },
    /// Completed shot with its traced path. Consumed for diagnostics only.
    ShotEnd {
        angle: f64,
        velocity: f64,
        trace: Vec<Vec2>,
    },
    /// Our current energy budget as the server sees it.
    Energy { value: f64 },
    /// Wholesale replacement of the planet set.
    Planets { planets: Vec<Planet> },
}

#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    /// A message type this protocol generation does not define.
    UnknownMessage { kind: u32, payload: u32 },
    /// A message type from a retired protocol generation; the server and
    /// bot disagree about the version.
    Deprecated { kind: u32 },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "protocol i/o: {err}"),
            Self::UnknownMessage { kind, payload } => {
                write!(f, "unknown message type {kind} (payload {payload})")
            }
            Self::Deprecated { kind } => write!(
                f,
                "deprecated message type {kind}: server speaks an older protocol than v{PROTOCOL_VERSION}"
            ),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Read one full message, header included.
pub fn read_message<R: Read>(reader: &mut R) -> Result<ServerMessage, ProtocolError> {
    let kind = read_u32(reader)?;
    let payload = read_u32(reader)?;
    decode_body(kind, payload, reader)
}

/// Decode the body of a message whose header has already been read.
pub fn decode_body<R: Read>(
    kind: u32,
    payload: u32,
    reader: &mut R,
) -> Result<ServerMessage, ProtocolError> {
    match kind {
        MSG_WELCOME => Ok(ServerMessage::Welcome { id: payload }),
        MSG_PLAYER_LEFT => Ok(ServerMessage::PlayerLeft { id: payload }),
        MSG_PLAYER_POS => {
            let x = read_f32(reader)?;
            let y = read_f32(reader)?;
            Ok(ServerMessage::PlayerPos {
                id: payload,
                position: Vec2::new(x as f64, y as f64),
            })
        }
        MSG_SHOT_BEGIN => {
            let angle = read_f64(reader)?;
            let velocity = read_f64(reader)?;
            Ok(ServerMessage::ShotBegin {
                shooter: payload,
                angle,
                velocity,
            })
        }
        MSG_SHOT_END => {
            let angle = read_f64(reader)?;
            let velocity = read_f64(reader)?;
            let count = read_u32(reader)? as usize;
            let mut trace = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                let x = read_f32(reader)?;
                let y = read_f32(reader)?;
                trace.push(Vec2::new(x as f64, y as f64));
            }
            Ok(ServerMessage::ShotEnd {
                angle,
                velocity,
                trace,
            })
        }
        MSG_ENERGY => Ok(ServerMessage::Energy {
            value: read_f64(reader)?,
        }),
        MSG_PLANETS => {
            // The byte count duplicates what the planet count already
            // implies; read and drop it.
            let _byte_count = read_u32(reader)?;
            let mut planets = Vec::with_capacity((payload as usize).min(4096));
            for id in 0..payload {
                let x = read_f64(reader)?;
                let y = read_f64(reader)?;
                let radius = read_f64(reader)?;
                let mass = read_f64(reader)?;
                planets.push(Planet {
                    id,
                    position: Vec2::new(x, y),
                    radius,
                    mass,
                });
            }
            Ok(ServerMessage::Planets { planets })
        }
        MSG_SHOT_FINISHED_LEGACY | MSG_GAME_MODE_LEGACY => {
            Err(ProtocolError::Deprecated { kind })
        }
        _ => Err(ProtocolError::UnknownMessage { kind, payload }),
    }
}

/// Client-to-server commands, each a newline-terminated text line. A shot
/// is two consecutive lines: the energy, then the launch angle.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientCommand {
    /// Protocol handshake; must be the first command on a connection.
    Handshake { version: u32 },
    SetName { name: String },
    /// Ask the server to report our energy (answered with `Energy`).
    QueryEnergy,
    /// Fire. `angle` is in the wire/launch convention.
    Shoot { angle: f64, energy: f64 },
}

impl ClientCommand {
    pub fn encode(&self) -> String {
        match self {
            Self::Handshake { version } => format!("b {version}\n"),
            Self::SetName { name } => format!("n {}\n", name.trim()),
            Self::QueryEnergy => "u\n".to_string(),
            Self::Shoot { angle, energy } => format!("v {energy}\n{angle}\n"),
        }
    }
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}
