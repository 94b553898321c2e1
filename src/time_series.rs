use serde::Serialize;

/// One WPM sample at `t` seconds into a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<(f64, f64)> for TimeSeriesPoint {
    fn from(v: (f64, f64)) -> Self {
        TimeSeriesPoint { t: v.0, wpm: v.1 }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// Records at most one sample per whole elapsed second
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmSampler {
    points: Vec<TimeSeriesPoint>,
    last_second: Option<u64>,
}

impl WpmSampler {
    /// Returns true when a new sample was taken
    pub fn record(&mut self, elapsed_secs: f64, wpm: u32) -> bool {
        if elapsed_secs < 1.0 {
            return false;
        }
        let second = elapsed_secs.floor() as u64;
        if self.last_second.is_some_and(|last| second <= last) {
            return false;
        }
        self.last_second = Some(second);
        self.points
            .push(TimeSeriesPoint::new(second as f64, wpm as f64));
        true
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.last_second = None;
    }
}
