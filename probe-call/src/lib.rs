pub mod caller;
pub mod flavor;
pub mod locate;
pub mod parse;
pub mod service;

pub use flavor::Flavor;
pub use service::ProbeService;
