//! Input focus arbitration.
//!
//! The host decides whether the HUD receives keyboard/mouse input. Panels
//! claim focus by name while open; the HUD keeps focus as long as at least
//! one claim is held.

/// Grants and releases focus claims by claimant name.
pub trait FocusArbiter {
    fn request(&mut self, claimant: &str);
    fn release(&mut self, claimant: &str);
    fn release_all(&mut self);
}

/// Process-wide claim table.
///
/// Claims are kept in request order without duplicates. `take_change`
/// reports when the table flips between empty and non-empty so the runtime
/// can forward the new focus state to the host.
#[derive(Debug, Default)]
pub struct FocusTable {
    claims: Vec<String>,
    reported: bool,
}

impl FocusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_focus(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Most recent claimant, if any.
    pub fn holder(&self) -> Option<&str> {
        self.claims.last().map(String::as_str)
    }

    pub fn is_claimed(&self, claimant: &str) -> bool {
        self.claims.iter().any(|c| c == claimant)
    }

    pub fn claims(&self) -> &[String] {
        &self.claims
    }

    /// Returns the new focus state if it changed since the last call.
    pub fn take_change(&mut self) -> Option<bool> {
        let now = self.has_focus();
        if now == self.reported {
            return None;
        }
        self.reported = now;
        Some(now)
    }
}

impl FocusArbiter for FocusTable {
    fn request(&mut self, claimant: &str) {
        if self.is_claimed(claimant) {
            return;
        }
        tracing::debug!(claimant, "focus requested");
        self.claims.push(claimant.to_string());
    }

    fn release(&mut self, claimant: &str) {
        let before = self.claims.len();
        self.claims.retain(|c| c != claimant);
        if self.claims.len() != before {
            tracing::debug!(claimant, "focus released");
        }
    }

    fn release_all(&mut self) {
        if !self.claims.is_empty() {
            tracing::debug!(count = self.claims.len(), "releasing all focus claims");
        }
        self.claims.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_deduplicated() {
        let mut focus = FocusTable::new();
        focus.request("inventory");
        focus.request("inventory");
        assert_eq!(focus.claims(), ["inventory".to_string()]);
    }

    #[test]
    fn test_holder_is_latest_claim() {
        let mut focus = FocusTable::new();
        focus.request("inventory");
        focus.request("admin");
        assert_eq!(focus.holder(), Some("admin"));

        focus.release("admin");
        assert_eq!(focus.holder(), Some("inventory"));
        assert!(!focus.is_claimed("admin"));
    }

    #[test]
    fn test_release_unknown_is_noop() {
        let mut focus = FocusTable::new();
        focus.request("garage");
        focus.release("ghost");
        assert!(focus.is_claimed("garage"));
    }

    #[test]
    fn test_take_change_reports_transitions_only() {
        let mut focus = FocusTable::new();
        assert_eq!(focus.take_change(), None);

        focus.request("inventory");
        focus.request("admin");
        assert_eq!(focus.take_change(), Some(true));
        assert_eq!(focus.take_change(), None);

        focus.release("inventory");
        assert_eq!(focus.take_change(), None);

        focus.release_all();
        assert!(!focus.has_focus());
        assert_eq!(focus.take_change(), Some(false));
    }
}
