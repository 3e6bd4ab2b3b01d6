use std::time::Duration;

/// Debounces global-search keystrokes. The text box always shows
/// [`SearchDebounce::latest`]; only the newest ticket is allowed to reach the
/// controller, so the last keystroke always lands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchDebounce {
    delay_ms: u64,
    latest: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub value: String,
}

impl SearchDebounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }

    pub fn input(&mut self, value: impl Into<String>) -> SearchTicket {
        self.generation += 1;
        self.latest = value.into();
        SearchTicket {
            generation: self.generation,
            value: self.latest.clone(),
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Resets the box, e.g. when the table context changes.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.latest.clear();
    }
}
