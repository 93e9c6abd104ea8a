use std::borrow::Cow;

/// A record read from a partition.
///
/// The payload is kept as raw bytes; ordering is the broker's append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub offset: i64,
    pub payload: Vec<u8>,
    /// Broker or producer timestamp in milliseconds, when the broker reports one.
    pub timestamp: Option<i64>,
}

impl Message {
    pub fn new(offset: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            payload: payload.into(),
            timestamp: None,
        }
    }

    /// A zero-length payload marks the end of a tail.
    pub fn is_end_marker(&self) -> bool {
        self.payload.is_empty()
    }

    /// Payload decoded as UTF-8, invalid sequences replaced.
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
