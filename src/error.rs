use crate::RouterId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("protocol violation: {receiver} received a distance vector from non-neighbor {sender}")]
    ProtocolViolation { receiver: RouterId, sender: RouterId },
    #[error("{router} has no link to {peer}")]
    NotNeighbor { router: RouterId, peer: RouterId },
    #[error("unknown router {0}")]
    UnknownRouter(RouterId),
    #[error("a link cannot connect {0} to itself")]
    SelfLoop(RouterId),
    #[error("invalid link cost {0} (expected a non-negative integer or -1)")]
    InvalidCost(i64),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("input ended before {0}")]
    UnexpectedEof(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
