use serde::{Deserialize, Serialize};

/// A closed interval `[start, end]` of UTC timestamps in millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    /// The span reaching `radius_millis` to both sides of `center_ts`
    pub fn around(center_ts: i64, radius_millis: i64) -> Self {
        Self::new(center_ts - radius_millis, center_ts + radius_millis)
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    pub fn duration(&self) -> i64 {
        self.end_ts - self.start_ts
    }

    /// Both ends are inclusive
    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts <= self.end_ts
    }
}
