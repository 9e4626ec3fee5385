//! Photo load sequencing.

/// Ticket handed out when a photo load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    /// Site path of the photo being loaded.
    pub path: String,
}

/// Tracks which photo load is the latest one.
///
/// Every new load supersedes the previous ones; a load that completes late
/// carries an old ticket and is ignored.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    pending: Option<LoadTicket>,
}

impl LoadTracker {
    /// Creates a tracker with no load in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load and returns its ticket.
    pub fn begin(&mut self, path: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            path: path.into(),
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Whether `ticket` belongs to the most recent load.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.generation == ticket.generation)
    }

    /// Forgets the pending load, e.g. when leaving the viewer.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The most recent load still considered current.
    pub fn pending(&self) -> Option<&LoadTicket> {
        self.pending.as_ref()
    }
}
