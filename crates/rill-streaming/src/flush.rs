//! Explicit flush control - no implicit buffering.

/// Flush policy for the streamed portion of a response.
///
/// The shell always gets its own flush: it is the first chunk by
/// protocol, so the earliest possible paint never waits on a boundary.
/// The policy decides what happens to the resolution chunks after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Flush each boundary resolution chunk as it lands.
    #[default]
    AfterEachBoundary,
    /// Coalesce resolution chunks into the closing flush: the client sees
    /// the shell, then one final chunk carrying every resolution and the
    /// document close.
    AfterShell,
}

impl FlushPolicy {
    /// Whether each boundary resolution chunk gets its own flush.
    pub fn flush_after_boundary(&self) -> bool {
        matches!(self, Self::AfterEachBoundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_flushes_per_boundary() {
        assert!(FlushPolicy::default().flush_after_boundary());
    }

    #[test]
    fn test_after_shell_coalesces_resolutions() {
        assert!(!FlushPolicy::AfterShell.flush_after_boundary());
    }
}
