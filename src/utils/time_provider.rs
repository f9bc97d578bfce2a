use chrono::{DateTime, Duration, Utc};

///
/// An overridable clock - tests pin it to check password stamps and reset-token expiry.
///
#[derive(Debug, Default)]
pub struct TimeProvider {
    fixed: Option<DateTime<Utc>>
}

impl TimeProvider {
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed.unwrap_or_else(Utc::now)
    }

    pub fn fix(&mut self, fixed: Option<DateTime<Utc>>) {
        self.fixed = fixed;
    }

    ///
    /// Move a fixed clock forwards. A clock that isn't fixed becomes fixed at now + duration.
    ///
    pub fn advance(&mut self, duration: Duration) {
        self.fixed = Some(self.now() + duration);
    }
}
