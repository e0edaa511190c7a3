//! Message batching - coalesces rapid appends into one display update

/// Default number of lines that forces an immediate flush
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// What the caller should do after adding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    /// First line of a new batch: arm a deferred flush
    ScheduleFlush,
    /// Size threshold reached: flush right away
    FlushNow,
    /// A flush is already pending
    Wait,
}

/// Formatted lines waiting to be written to the display
///
/// Lines stay here until the display accepts them, so a failed flush can be
/// retried with nothing lost.
#[derive(Debug)]
pub struct MessageBatcher {
    pending: Vec<String>,
    max_size: usize,
}

impl Default for MessageBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl MessageBatcher {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            pending: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Add a formatted line to the batch
    pub fn add(&mut self, line: String) -> BatchAction {
        self.pending.push(line);
        if self.pending.len() >= self.max_size {
            BatchAction::FlushNow
        } else if self.pending.len() == 1 {
            BatchAction::ScheduleFlush
        } else {
            BatchAction::Wait
        }
    }

    /// Lines waiting, oldest first
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Drop pending lines after they were written; returns how many
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_schedules_flush() {
        let mut batcher = MessageBatcher::default();
        assert_eq!(batcher.add("a".into()), BatchAction::ScheduleFlush);
        assert_eq!(batcher.add("b".into()), BatchAction::Wait);
        assert_eq!(batcher.pending_count(), 2);
    }

    #[test]
    fn test_threshold_forces_flush() {
        let mut batcher = MessageBatcher::new(3);
        batcher.add("a".into());
        batcher.add("b".into());
        assert_eq!(batcher.add("c".into()), BatchAction::FlushNow);
    }

    #[test]
    fn test_lines_kept_until_cleared() {
        let mut batcher = MessageBatcher::default();
        batcher.add("a".into());
        batcher.add("b".into());

        assert_eq!(batcher.pending(), ["a", "b"]);
        assert!(batcher.has_pending());
        assert_eq!(batcher.clear(), 2);
        assert!(!batcher.has_pending());
    }

    #[test]
    fn test_size_one_flushes_every_line() {
        let mut batcher = MessageBatcher::new(0);
        assert_eq!(batcher.max_size(), 1);
        assert_eq!(batcher.add("a".into()), BatchAction::FlushNow);
    }

    #[test]
    fn test_growing_after_failed_flush_still_forces_flush() {
        let mut batcher = MessageBatcher::new(2);
        batcher.add("a".into());
        batcher.add("b".into());
        // Flush failed, lines retained
        assert_eq!(batcher.add("c".into()), BatchAction::FlushNow);
    }
}
