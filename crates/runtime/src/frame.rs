use foundation::time::Time;

/// Frame metadata for one animation tick.
///
/// The page drives ticks from its animation-frame callback; tests drive them
/// with explicit times so every run is reproducible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Time at the start of the frame.
    pub time: Time,
    /// Seconds since the previous frame.
    pub dt_s: f64,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            time,
            dt_s: 0.0,
        }
    }

    /// Advances to `now`. Time never runs backwards: a stale timestamp keeps
    /// the previous frame time.
    pub fn advance(self, now: Time) -> Self {
        let time = if now.0 >= self.time.0 { now } else { self.time };
        Self {
            index: self.index + 1,
            time,
            dt_s: time.since(self.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn advance_increments_index_and_dt() {
        let f0 = Frame::first(Time(1.0));
        let f1 = f0.advance(Time(1.25));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(1.25));
        assert_eq!(f1.dt_s, 0.25);
    }

    #[test]
    fn stale_timestamps_do_not_rewind() {
        let f1 = Frame::first(Time(2.0)).advance(Time(1.0));
        assert_eq!(f1.time, Time(2.0));
        assert_eq!(f1.dt_s, 0.0);
    }
}
