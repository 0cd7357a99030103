//! Engine facade: `MatchEngine` and its uniform `Response`.

mod checkpoint;
mod match_engine;
mod response;

pub use checkpoint::MatchCheckpoint;
pub use match_engine::{MatchEngine, MANUAL_POSITION_SOURCE};
pub use response::{Response, ResponseData, TurnReport};
