//! TCP server for the adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::config::ServerConfig;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::PieceId;

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    async fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn broadcast(&self, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
            let _ = c.tx.send(msg.clone());
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn client_name(&self, client_id: usize) -> String {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub name: String,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
    Event(EventMessage),
}

impl ClientOutbound {
    /// Serialize into `buf` (without the trailing newline)
    fn write_json(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Welcome(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Ack(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Error(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Observation(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Event(v) => serde_json::to_writer(buf, v),
        }
    }
}

/// Spawn the wire log writer. Each record is one line.
fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<Vec<u8>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Adapter] cannot open wire log {}: {}", path, e);
                return;
            }
        };

        while let Some(mut rec) = rx.recv().await {
            rec.push(b'\n');
            if file.write_all(&rec).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        state.send_to(client_id, ClientOutbound::Error(err)).await;
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state.send_to(client_id, ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        state.broadcast(ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastEvent { event } => {
                        state.broadcast(ClientOutbound::Event(event)).await;
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        println!("[Adapter] Client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx, wire_log_tx).await {
                eprintln!("[Adapter] Client {} error: {}", client_id, e);
            }
            println!("[Adapter] Client {} disconnected", client_id);
        });
    }
}

/// Drop a client and hand control to the lowest remaining id if it was the controller
async fn remove_client(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;

    let was_controller = *controller == Some(client_id);
    clients.retain(|c| c.id != client_id);

    if was_controller {
        let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
        *controller = next_id;
        match next_id {
            Some(new_id) => println!("[Adapter] Client {} promoted to controller", new_id),
            None => println!("[Adapter] Controller {} released", client_id),
        }
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            name: String::new(),
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let wire_log_out = wire_log_tx.clone();
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.write_json(&mut buf).is_err() {
                continue;
            }
            if let Some(log) = wire_log_out.as_ref() {
                let _ = log.send(buf.clone());
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply = |msg: ClientOutbound| {
        let _ = tx.send(msg);
    };

    let mut result = Ok(());
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = match reader.read_line(&mut line).await {
            Ok(n) => n,
            Err(e) => {
                result = Err(e.into());
                break;
            }
        };
        if bytes_read == 0 {
            break;
        }

        let raw_line = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(log) = wire_log_tx.as_ref() {
            let _ = log.send(raw_line.as_bytes().to_vec());
        }

        let parsed = match parse_message(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply(ClientOutbound::Error(create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                )));
                continue;
            }
        };

        let seq = match &parsed {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Command(m) => m.seq,
            ParsedMessage::Control(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        };
        let handshaken = state.is_handshaken(client_id).await;

        if !handshaken && !matches!(parsed, ParsedMessage::Hello(_)) {
            reply(ClientOutbound::Error(create_error(
                seq,
                ErrorCode::HandshakeRequired,
                "Send hello first",
            )));
            continue;
        }

        if handshaken && !state.check_and_update_seq(client_id, seq).await {
            reply(ClientOutbound::Error(create_error(
                seq,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            )));
            continue;
        }

        match parsed {
            ParsedMessage::Hello(hello) => {
                if handshaken {
                    reply(ClientOutbound::Error(create_error(
                        seq,
                        ErrorCode::InvalidCommand,
                        "Already said hello",
                    )));
                    continue;
                }
                if !version_compatible(&hello.protocol_version, &state.config.protocol_version) {
                    reply(ClientOutbound::Error(create_error(
                        seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    )));
                    break;
                }

                let role = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(seq);
                        client.name = hello.client.name.clone();
                        client.stream_observations = hello.requested.stream_observations;
                    }
                    if controller.is_none() {
                        *controller = Some(client_id);
                        println!("[Adapter] Client {} is now controller", client_id);
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    }
                };
                let controller_id = state.controller.read().await.map(|id| id as u64);

                reply(ClientOutbound::Welcome(create_welcome(
                    seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id,
                )));

                let _ = command_tx.try_send(InboundCommand {
                    client_id,
                    client_name: hello.client.name,
                    seq,
                    payload: InboundPayload::SnapshotRequest,
                });
            }

            ParsedMessage::Command(cmd) => {
                if !state.is_controller(client_id).await {
                    reply(ClientOutbound::Error(create_error(
                        seq,
                        ErrorCode::NotController,
                        "Only controller may send commands",
                    )));
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err(message) => {
                        reply(ClientOutbound::Error(create_error(
                            seq,
                            ErrorCode::InvalidCommand,
                            &message,
                        )));
                        continue;
                    }
                };

                // Backpressure: bounded queue. The game loop acks once applied.
                let inbound = InboundCommand {
                    client_id,
                    client_name: state.client_name(client_id).await,
                    seq,
                    payload: InboundPayload::Command(mapped),
                };
                if command_tx.try_send(inbound).is_err() {
                    reply(ClientOutbound::Error(create_error(
                        seq,
                        ErrorCode::Backpressure,
                        "Command queue is full",
                    )));
                }
            }

            ParsedMessage::Control(ctrl) => {
                let mut controller = state.controller.write().await;
                match ctrl.action {
                    ControlAction::Claim => {
                        if controller.is_none() || *controller == Some(client_id) {
                            *controller = Some(client_id);
                            println!("[Adapter] Client {} claimed control", client_id);
                            reply(ClientOutbound::Ack(create_ack(seq)));
                        } else {
                            reply(ClientOutbound::Error(create_error(
                                seq,
                                ErrorCode::ControllerActive,
                                "Controller already assigned",
                            )));
                        }
                    }
                    ControlAction::Release => {
                        if *controller == Some(client_id) {
                            *controller = None;
                            println!("[Adapter] Client {} released control", client_id);
                            reply(ClientOutbound::Ack(create_ack(seq)));
                        } else {
                            reply(ClientOutbound::Error(create_error(
                                seq,
                                ErrorCode::NotController,
                                "Only controller may release",
                            )));
                        }
                    }
                }
            }

            ParsedMessage::Unknown(_) => {
                reply(ClientOutbound::Error(create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    "Unknown message type",
                )));
            }
        }
    }

    // The stored handle owns a sender too; the writer only drains once it is gone.
    remove_client(&state, client_id).await;
    drop(reply);
    drop(tx);
    let _ = write_task.await;

    result
}

/// Same major version
fn version_compatible(requested: &str, ours: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::trim).map(str::to_string);
    major(requested).is_some_and(|m| !m.is_empty() && Some(m) == major(ours))
}

/// Map a protocol command into a game-loop command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, String> {
    match cmd.mode {
        CommandMode::Place => {
            let Some(place) = cmd.place else {
                return Err("Missing place".to_string());
            };
            Ok(ClientCommand::Place {
                piece_id: PieceId(place.piece_id),
                x: place.x,
                y: place.y,
            })
        }
        CommandMode::Restart => Ok(ClientCommand::Restart),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_compatible() {
        assert!(version_compatible("1.0.0", "1.0.0"));
        assert!(version_compatible("1.4", "1.0.0"));
        assert!(!version_compatible("2.0.0", "1.0.0"));
        assert!(!version_compatible("", "1.0.0"));
    }

    #[test]
    fn test_map_command() {
        let cmd = create_place(1, 9, 3, 4);
        assert_eq!(
            map_command(&cmd),
            Ok(ClientCommand::Place { piece_id: PieceId(9), x: 3, y: 4 })
        );
        assert_eq!(map_command(&create_restart(2)), Ok(ClientCommand::Restart));

        let mut missing = create_place(3, 1, 0, 0);
        missing.place = None;
        assert!(map_command(&missing).is_err());
    }

    #[test]
    fn test_outbound_serializes_one_object() {
        let mut buf = Vec::new();
        ClientOutbound::Ack(create_ack(4)).write_json(&mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["type"], "ack");
        assert_eq!(v["seq"], 4);
    }
}
