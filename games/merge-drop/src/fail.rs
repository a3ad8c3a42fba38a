//! Fail monitor: debounced scans of settled pieces against the fail line.

use crate::piece::Piece;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct FailMonitor {
    fail_line_y: f32,
    scan_pending: bool,
}

impl FailMonitor {
    pub fn new(fail_line_y: f32) -> Self {
        Self {
            fail_line_y,
            scan_pending: false,
        }
    }

    pub fn fail_line_y(&self) -> f32 {
        self.fail_line_y
    }

    pub fn scan_pending(&self) -> bool {
        self.scan_pending
    }

    /// Called every simulation tick. Returns `true` when the caller should schedule a scan,
    /// which happens only if none is pending already.
    pub fn request_scan(&mut self) -> bool {
        if self.scan_pending {
            return false;
        }
        self.scan_pending = true;
        true
    }

    /// Run a scheduled scan. `top_of` maps a piece's id to its current top edge
    /// (`center.y - radius`); pieces it cannot place are skipped.
    ///
    /// Only settled pieces count. Returns whether some settled piece reaches strictly above
    /// the fail line. The pending flag is cleared either way.
    pub fn scan(
        &mut self,
        session: &Session,
        top_of: impl Fn(&Piece) -> Option<f32>,
    ) -> bool {
        self.scan_pending = false;
        session
            .pieces()
            .filter(|piece| piece.is_settled())
            .filter_map(top_of)
            .any(|top| top < self.fail_line_y)
    }

    pub fn reset(&mut self) {
        self.scan_pending = false;
    }
}
