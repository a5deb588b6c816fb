use shared::{Timeline, YearRange};

/// Process-wide settings shared by every request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub year: YearRange,
    pub timeline: Timeline,
    pub membership_url: Option<String>,
}

impl Settings {
    pub fn new(year: Option<i32>, fps: Option<u64>, membership_url: Option<String>) -> Self {
        Self {
            year: year.map(YearRange::new).unwrap_or_default(),
            timeline: fps.map(Timeline::new).unwrap_or_default(),
            membership_url,
        }
    }
}
