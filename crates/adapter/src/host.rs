//! Game loop side of the adapter: applies inbound commands to a [`Session`]
//! and produces the messages the server should deliver.

use crate::config::GameConfig;
use crate::engine::{ConfigError, HighScores, RoundObserver, Session};
use crate::protocol::{
    build_observation, create_ack, create_event, create_place_error, create_round_ack, EventMessage,
    EventPhase, RoundReport,
};
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::{Coord, SettleDelays};

/// Forwards will-place / will-clear hooks as protocol events
struct EventForwarder<'a> {
    settle: SettleDelays,
    seq: &'a mut u64,
    events: Vec<EventMessage>,
}

impl EventForwarder<'_> {
    fn push(&mut self, phase: EventPhase, cells: &[Coord], settle_ms: u32) {
        *self.seq += 1;
        self.events.push(create_event(*self.seq, phase, cells, settle_ms));
    }
}

impl RoundObserver for EventForwarder<'_> {
    fn on_will_place(&mut self, cells: &[Coord]) {
        self.push(EventPhase::WillPlace, cells, self.settle.place_ms);
    }

    fn on_will_clear(&mut self, cells: &[Coord]) {
        self.push(EventPhase::WillClear, cells, self.settle.clear_ms);
    }
}

/// Owns the session and the high score table for one server
pub struct GameHost {
    session: Session,
    high_scores: HighScores,
    settle: SettleDelays,
    /// Sequence for server-originated messages (observations, events)
    out_seq: u64,
}

impl GameHost {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_session(Session::new(config.session)?, config.settle))
    }

    pub fn with_session(session: Session, settle: SettleDelays) -> Self {
        Self {
            session,
            high_scores: HighScores::default(),
            settle,
            out_seq: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Apply one inbound command. Returned messages are in delivery order.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let client_id = inbound.client_id;
        let mut out = Vec::new();

        match inbound.payload {
            InboundPayload::SnapshotRequest => {
                out.push(OutboundMessage::ToClientObservation {
                    client_id,
                    obs: self.observation(),
                });
            }
            InboundPayload::Command(ClientCommand::Restart) => {
                self.session.restart();
                println!(
                    "[block-blast] restart requested by client {}, episode {}",
                    client_id,
                    self.session.episode_id()
                );
                out.push(OutboundMessage::ToClientAck {
                    client_id,
                    ack: create_ack(inbound.seq),
                });
                out.push(OutboundMessage::BroadcastObservation {
                    obs: self.observation(),
                });
            }
            InboundPayload::Command(ClientCommand::Place { piece_id, x, y }) => {
                let mut forwarder = EventForwarder {
                    settle: self.settle,
                    seq: &mut self.out_seq,
                    events: Vec::new(),
                };
                let result = self
                    .session
                    .attempt_placement_with(piece_id, x, y, &mut forwarder);
                let events = forwarder.events;

                match result {
                    Ok(round) => {
                        out.extend(
                            events
                                .into_iter()
                                .map(|event| OutboundMessage::BroadcastEvent { event }),
                        );

                        let mut report = RoundReport::from(&round);
                        if round.game_over {
                            report.high_score_rank =
                                self.high_scores.submit(&inbound.client_name, round.total_score);
                            println!(
                                "[block-blast] game over: {} scored {} (rank {:?})",
                                inbound.client_name, round.total_score, report.high_score_rank
                            );
                        }

                        out.push(OutboundMessage::ToClientAck {
                            client_id,
                            ack: create_round_ack(inbound.seq, report),
                        });
                        out.push(OutboundMessage::BroadcastObservation {
                            obs: self.observation(),
                        });
                    }
                    Err(err) => {
                        out.push(OutboundMessage::ToClientError {
                            client_id,
                            err: create_place_error(inbound.seq, err),
                        });
                    }
                }
            }
        }

        out
    }

    fn observation(&mut self) -> crate::protocol::ObservationMessage {
        self.out_seq += 1;
        build_observation(
            self.out_seq,
            &self.session.snapshot(),
            self.high_scores.best_score(),
        )
    }
}
