pub mod backend;
pub mod message;
pub mod offset;
pub mod session;
pub mod topic;

pub use backend::BrokerClient;
pub use session::{Activity, Session, SessionState, Tail};

#[cfg(test)]
pub(crate) mod fake;
