pub mod ping;
pub mod trace;

pub use ping::PingResult;
pub use trace::{TraceHop, TracerouteResult, NO_REPLY_HOST};
