/// Offsets bounding the readable part of a partition.
///
/// `latest` is the offset the next appended message will get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetWindow {
    pub earliest: i64,
    pub latest: i64,
}

impl OffsetWindow {
    pub fn new(earliest: i64, latest: i64) -> Self {
        Self { earliest, latest }
    }

    /// Offset to start reading from so that at most `max_messages` are read.
    ///
    /// Never goes below `earliest`; a window larger than the log is clamped.
    pub fn tail_start(&self, max_messages: u64) -> i64 {
        let back = i64::try_from(max_messages).unwrap_or(i64::MAX);
        self.latest.saturating_sub(back).max(self.earliest)
    }
}
