/// Identifies one in-flight request issued through a [`RequestTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Hands out request tokens so a superseded response can be recognised and dropped.
///
/// Only the most recently issued token is current. Invalidating (for example
/// after the data a request was computed from has changed) makes every
/// outstanding token stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }
}
