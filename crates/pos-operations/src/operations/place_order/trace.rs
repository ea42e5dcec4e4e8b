use pos_core::OrderId;

/// Where an order placement got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlacementPhase {
    /// Validation has not finished; nothing was written.
    NotStarted,
    /// The transaction is open and the header insert is next.
    HeaderPending,
    /// The header is written and line items are being persisted.
    ItemsPending,
    Committed,
    RolledBack,
}

impl PlacementPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::HeaderPending => "header-pending",
            Self::ItemsPending => "items-pending",
            Self::Committed => "committed",
            Self::RolledBack => "rolled-back",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

/// Record of one placement attempt.
#[derive(Debug, Clone)]
pub struct PlacementTrace {
    phases: Vec<PlacementPhase>,
    order_id: Option<OrderId>,
    lines_attempted: u32,
    failed_line: Option<u32>,
}

impl Default for PlacementTrace {
    fn default() -> Self {
        Self {
            phases: vec![PlacementPhase::NotStarted],
            order_id: None,
            lines_attempted: 0,
            failed_line: None,
        }
    }
}

impl PlacementTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent phase.
    #[must_use]
    pub fn phase(&self) -> PlacementPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(PlacementPhase::NotStarted)
    }

    /// Every phase entered, in order, starting with `NotStarted`.
    #[must_use]
    pub fn phases(&self) -> &[PlacementPhase] {
        &self.phases
    }

    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Number of line inserts that were attempted.
    #[must_use]
    pub fn lines_attempted(&self) -> u32 {
        self.lines_attempted
    }

    /// The line being processed when the placement failed, if any.
    #[must_use]
    pub fn failed_line(&self) -> Option<u32> {
        self.failed_line
    }

    pub(crate) fn enter(&mut self, phase: PlacementPhase) {
        if self.phase() != phase {
            self.phases.push(phase);
        }
    }

    pub(crate) fn record_order_id(&mut self, id: OrderId) {
        self.order_id = Some(id);
    }

    pub(crate) fn record_line_attempt(&mut self, line_no: u32) {
        self.lines_attempted += 1;
        self.failed_line = Some(line_no);
    }

    pub(crate) fn record_line_done(&mut self) {
        self.failed_line = None;
    }

    /// Closes the trace after the transaction ended; `NotStarted` traces stay
    /// as they are because nothing was opened.
    pub(crate) fn finish(&mut self, committed: bool) {
        if self.phase() == PlacementPhase::NotStarted {
            return;
        }
        self.enter(if committed {
            PlacementPhase::Committed
        } else {
            PlacementPhase::RolledBack
        });
    }
}
