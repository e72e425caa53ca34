//! Protocol module - JSON message types for the block-blast adapter
//!
//! Line-delimited JSON. Every message has `type`, `seq` (sequence number)
//! and `ts` (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::engine::{GameSnapshot, PlaceError, RoundResult};
use crate::types::Coord;

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[default]
    #[serde(rename = "command")]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    #[serde(rename = "control")]
    Control,
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive observations and phase events as they happen
    #[serde(default = "default_true")]
    pub stream_observations: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedRole {
    Controller,
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub mode: CommandMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandMode {
    Place,
    Restart,
}

impl<'de> Deserialize<'de> for CommandMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("place") {
            Ok(Self::Place)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("invalid command mode"))
        }
    }
}

impl Serialize for CommandMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CommandMode::Place => serializer.serialize_str("place"),
            CommandMode::Restart => serializer.serialize_str("restart"),
        }
    }
}

/// Target of a place command. `x`/`y` are where the piece was dropped; the
/// engine may snap to a nearby origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCommand {
    pub piece_id: u32,
    pub x: i8,
    pub y: i8,
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ControlType,
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Claim,
    Release,
}

impl<'de> Deserialize<'de> for ControlAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("claim") {
            Ok(Self::Claim)
        } else if s.eq_ignore_ascii_case("release") {
            Ok(Self::Release)
        } else {
            Err(serde::de::Error::custom("invalid control action"))
        }
    }
}

impl Serialize for ControlAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ControlAction::Claim => serializer.serialize_str("claim"),
            ControlAction::Release => serializer.serialize_str("release"),
        }
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    ControllerActive,
    InvalidCommand,
    NoValidPlacement,
    GameOver,
    Busy,
    Backpressure,
}

impl From<PlaceError> for ErrorCode {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::UnknownPiece(_) | PlaceError::SlotEmpty(_) => ErrorCode::InvalidCommand,
            PlaceError::NoValidPlacement { .. } => ErrorCode::NoValidPlacement,
            PlaceError::GameOver => ErrorCode::GameOver,
            PlaceError::RoundInProgress => ErrorCode::Busy,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub formats: Vec<String>,
    pub command_modes: Vec<CommandMode>,
    pub features: Vec<CapabilityFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFeature {
    Snap,
    Squares,
    PhaseEvents,
    HighScore,
    StateHash,
}

/// Acknowledgment. Place commands carry the round report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundReport>,
}

/// What one placement did, as reported on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub piece_id: u32,
    pub x: i8,
    pub y: i8,
    pub snapped: bool,
    pub cells_placed: u32,
    pub rows: u32,
    pub cols: u32,
    pub squares: u32,
    pub multiplier_percent: u32,
    pub score_delta: u32,
    pub score: u32,
    pub tray_refilled: bool,
    pub game_over: bool,
    /// Rank on the high score table when this round ended the game and made it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score_rank: Option<usize>,
}

impl From<&RoundResult> for RoundReport {
    fn from(result: &RoundResult) -> Self {
        Self {
            piece_id: result.piece_id.0,
            x: result.origin.0,
            y: result.origin.1,
            snapped: result.snapped,
            cells_placed: result.placed.len() as u32,
            rows: result.clear.counts.rows,
            cols: result.clear.counts.cols,
            squares: result.clear.counts.squares,
            multiplier_percent: result.score.multiplier_percent,
            score_delta: result.score.total,
            score: result.total_score,
            tray_refilled: result.tray_refilled,
            game_over: result.game_over,
            high_score_rank: None,
        }
    }
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Game state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub round: u32,
    pub seed: u32,
    pub rules: String,
    pub board: BoardSnapshot,
    pub tray: Vec<Option<TrayPieceSnapshot>>,
    pub score: u32,
    pub high_score: u32,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: u8,
    /// Rows top to bottom: 0 = empty, 1..=8 = palette index
    pub cells: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayPieceSnapshot {
    pub id: u32,
    pub shape: String,
    pub color: String,
    pub cells: Vec<[u8; 2]>,
    pub width: u8,
    pub height: u8,
    pub placeable: bool,
}

/// Deterministic state hash serialized as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    WillPlace,
    WillClear,
}

/// Phase boundary inside a round. `settle_ms` is how long a renderer should
/// let the transition play out; the engine itself does not wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub ts: u64,
    pub phase: EventPhase,
    pub cells: Vec<[u8; 2]>,
    pub settle_ms: u32,
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            // An unknown type is answered, not treated as garbage.
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            let known = matches!(
                envelope.msg_type.as_deref(),
                Some("hello") | Some("command") | Some("control")
            );
            if !known {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Best-effort `seq` from a line that failed to parse
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

/// Create a place command
pub fn create_place(seq: u64, piece_id: u32, x: i8, y: i8) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        mode: CommandMode::Place,
        place: Some(PlaceCommand { piece_id, x, y }),
    }
}

/// Create a restart command
pub fn create_restart(seq: u64) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        mode: CommandMode::Restart,
        place: None,
    }
}

/// Create a control message
pub fn create_control(seq: u64, action: ControlAction) -> ControlMessage {
    ControlMessage {
        msg_type: ControlType::Control,
        seq,
        ts: current_timestamp_ms(),
        action,
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        controller_id,
        game_id: "block-blast".to_string(),
        capabilities: ServerCapabilities {
            formats: vec!["json".to_string()],
            command_modes: vec![CommandMode::Place, CommandMode::Restart],
            features: vec![
                CapabilityFeature::Snap,
                CapabilityFeature::Squares,
                CapabilityFeature::PhaseEvents,
                CapabilityFeature::HighScore,
                CapabilityFeature::StateHash,
            ],
        },
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        round: None,
    }
}

/// Create an acknowledgment carrying a round report
pub fn create_round_ack(seq: u64, report: RoundReport) -> AckMessage {
    AckMessage {
        round: Some(report),
        ..create_ack(seq)
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Create the error for a rejected placement
pub fn create_place_error(seq: u64, err: PlaceError) -> ErrorMessage {
    create_error(seq, ErrorCode::from(err), &err.to_string())
}

/// Create a phase event
pub fn create_event(seq: u64, phase: EventPhase, cells: &[Coord], settle_ms: u32) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        ts: current_timestamp_ms(),
        phase,
        cells: cells.iter().map(|&(x, y)| [x, y]).collect(),
        settle_ms,
    }
}

/// Build an observation from a session snapshot
pub fn build_observation(seq: u64, snap: &GameSnapshot, high_score: u32) -> ObservationMessage {
    let size = snap.board_size as usize;
    let cells = if size == 0 {
        Vec::new()
    } else {
        snap.board.chunks(size).map(<[u8]>::to_vec).collect()
    };

    let tray = snap
        .tray
        .iter()
        .map(|slot| {
            slot.as_ref().map(|p| TrayPieceSnapshot {
                id: p.id.0,
                shape: p.kind.as_str().to_string(),
                color: p.color.hex().to_string(),
                cells: p.cells.iter().map(|&(dx, dy)| [dx, dy]).collect(),
                width: p.width,
                height: p.height,
                placeable: p.placeable,
            })
        })
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: !snap.game_over,
        game_over: snap.game_over,
        episode_id: snap.episode_id,
        round: snap.rounds,
        seed: snap.seed,
        rules: snap.rules.as_str().to_string(),
        board: BoardSnapshot {
            size: snap.board_size,
            cells,
        },
        tray,
        score: snap.score,
        high_score,
        state_hash: state_hash(snap),
    }
}

/// FNV-1a over the game-visible state. Stable across platforms and Rust versions.
pub fn state_hash(snap: &GameSnapshot) -> StateHash {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    let mut feed = |bytes: &[u8]| {
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(PRIME);
        }
    };

    feed(&[snap.board_size]);
    feed(&snap.board);
    for slot in &snap.tray {
        match slot {
            Some(p) => {
                feed(&p.id.0.to_le_bytes());
                feed(&[p.color.index()]);
                for &(dx, dy) in &p.cells {
                    feed(&[dx, dy]);
                }
            }
            None => feed(&[0xff]),
        }
    }
    feed(&snap.score.to_le_bytes());
    feed(&snap.episode_id.to_le_bytes());
    feed(&snap.rounds.to_le_bytes());
    feed(&[snap.game_over as u8]);

    StateHash(h)
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Session;
    use crate::types::{PieceId, SessionConfig};

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":false}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "bot");
                assert_eq!(msg.protocol_version, "1.0.0");
                assert!(!msg.requested.stream_observations);
            }
            other => panic!("Expected Hello message, got {other:?}"),
        }
    }

    #[test]
    fn test_hello_streams_by_default() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"1"},"protocol_version":"1.0.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => assert!(msg.requested.stream_observations),
            other => panic!("Expected Hello message, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_place_command() {
        let json = r#"{"type":"command","seq":2,"ts":1,"mode":"place","place":{"piece_id":4,"x":8,"y":-1}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.mode, CommandMode::Place);
                assert_eq!(msg.place, Some(PlaceCommand { piece_id: 4, x: 8, y: -1 }));
            }
            other => panic!("Expected Command message, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_restart_and_control() {
        let json = r#"{"type":"command","seq":3,"ts":1,"mode":"RESTART"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => assert_eq!(msg.mode, CommandMode::Restart),
            other => panic!("Expected Command message, got {other:?}"),
        }

        let json = r#"{"type":"control","seq":4,"ts":1,"action":"release"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Control(msg) => assert_eq!(msg.action, ControlAction::Release),
            other => panic!("Expected Control message, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_error() {
        match parse_message(r#"{"type":"dance","seq":9}"#).unwrap() {
            ParsedMessage::Unknown(u) => assert_eq!(u.seq, 9),
            other => panic!("Expected Unknown message, got {other:?}"),
        }
        assert!(parse_message(r#"{"type":"command","seq":9,"mode":"jump"}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 12, "type": "#), Some(12));
        assert_eq!(extract_seq_best_effort(r#"{"type":"x"}"#), None);
    }

    #[test]
    fn test_error_codes_follow_place_errors() {
        let err = create_place_error(5, PlaceError::SlotEmpty(PieceId(3)));
        assert_eq!(err.code, ErrorCode::InvalidCommand);
        assert_eq!(err.message, "piece #3 was already placed");

        let json = serde_json::to_value(create_place_error(6, PlaceError::RoundInProgress)).unwrap();
        assert_eq!(json["code"], "busy");
        let json = serde_json::to_value(create_place_error(
            7,
            PlaceError::NoValidPlacement { piece: PieceId(1), x: 0, y: 0 },
        ))
        .unwrap();
        assert_eq!(json["code"], "no_valid_placement");
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, "1.0.0", 7, AssignedRole::Controller, Some(7));
        let json = serde_json::to_value(&welcome).unwrap();
        assert_eq!(json["type"], "welcome");
        assert_eq!(json["role"], "controller");
        assert_eq!(json["controller_id"], 7);
        assert_eq!(json["game_id"], "block-blast");
        assert_eq!(json["capabilities"]["command_modes"][1], "restart");
    }

    #[test]
    fn test_ack_omits_empty_round() {
        let json = serde_json::to_value(create_ack(10)).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json.get("round").is_none());
    }

    #[test]
    fn test_event_cells_are_pairs() {
        let event = create_event(3, EventPhase::WillClear, &[(0, 4), (1, 4)], 350);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "will_clear");
        assert_eq!(json["cells"][1][0], 1);
        assert_eq!(json["cells"][1][1], 4);
        assert_eq!(json["settle_ms"], 350);
    }

    #[test]
    fn test_observation_shapes_board_rows() {
        let session = Session::new(SessionConfig::blast(5)).unwrap();
        let obs = build_observation(1, &session.snapshot(), 120);
        assert_eq!(obs.board.size, 9);
        assert_eq!(obs.board.cells.len(), 9);
        assert!(obs.board.cells.iter().all(|row| row.len() == 9));
        assert_eq!(obs.tray.len(), 3);
        assert_eq!(obs.high_score, 120);
        assert!(obs.playable);

        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["state_hash"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn test_state_hash_tracks_moves() {
        let mut session = Session::new(SessionConfig::blast(5)).unwrap();
        let before = state_hash(&session.snapshot());
        assert_eq!(before, state_hash(&session.snapshot()));

        let piece = session.tray().pieces().next().unwrap().id;
        session.attempt_placement(piece, 0, 0).unwrap();
        assert_ne!(before, state_hash(&session.snapshot()));
    }
}
