//! Text-to-structure transformation for the tools' unstructured output.
//! Parsers are pure and stateless; each flavor carries its own grammar,
//! compiled once at construction.

mod ping;
mod trace;

pub use ping::PingParser;
pub use trace::TraceParser;
