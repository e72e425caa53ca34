//! Round coordination for the block-placement puzzle.
//!
//! [`Session`] turns the pure rules in `block_blast_core` into a game: it owns
//! the board, tray and score, runs each placement through the round state
//! machine, and reports game over. Presentation layers attach to a round
//! through [`RoundObserver`].
//!
//! # Example
//!
//! ```
//! use block_blast_engine::{Session, RecordingObserver};
//! use block_blast_engine::types::SessionConfig;
//!
//! let mut session = Session::new(SessionConfig::blast(7)).unwrap();
//! let piece = session.tray().pieces().next().unwrap().id;
//!
//! let mut observer = RecordingObserver::default();
//! let result = session.attempt_placement_with(piece, 0, 0, &mut observer).unwrap();
//!
//! assert_eq!(observer.will_place.len(), 1);
//! assert_eq!(result.total_score, session.score());
//! ```

pub mod autoplay;
pub mod error;
pub mod high_score;
pub mod phase;
pub mod session;
pub mod snapshot;

pub use block_blast_core as core;
pub use block_blast_types as types;

pub use error::{ConfigError, PlaceError};
pub use high_score::{HighScoreEntry, HighScores};
pub use phase::{NoopObserver, RecordingObserver, RoundObserver, RoundPhase};
pub use session::{RoundResult, Session};
pub use snapshot::{GameSnapshot, PieceSnapshot};
