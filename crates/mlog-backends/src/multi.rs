//! Fan-out logger
//!
//! Applies its own threshold first, then hands the same record to every
//! child, each of which applies its own threshold.

use std::sync::{Arc, RwLock};

use mlog_core::prelude::*;
use mlog_core::{AtomicLevel, LogLevel, LogRecord, Logger};

/// Logger that writes to several destinations
pub struct MultiLogger {
    name: String,
    level: AtomicLevel,
    loggers: RwLock<Vec<Arc<dyn Logger>>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::with_loggers(Vec::new())
    }

    pub fn with_loggers(loggers: Vec<Arc<dyn Logger>>) -> Self {
        Self {
            name: "multi".to_string(),
            level: AtomicLevel::default(),
            loggers: RwLock::new(loggers),
        }
    }

    /// Add a destination unless this exact logger is already present
    pub fn add_logger(&self, logger: Arc<dyn Logger>) {
        let Ok(mut loggers) = self.loggers.write() else {
            return;
        };
        if loggers.iter().any(|l| Arc::ptr_eq(l, &logger)) {
            debug!("Logger {:?} already registered", logger.name());
            return;
        }
        loggers.push(logger);
    }

    /// Remove every destination with the given name; returns how many were removed
    pub fn remove_logger(&self, name: &str) -> usize {
        let Ok(mut loggers) = self.loggers.write() else {
            return 0;
        };
        let before = loggers.len();
        loggers.retain(|l| l.name() != name);
        before - loggers.len()
    }

    pub fn len(&self) -> usize {
        self.loggers.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a destination by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Logger>> {
        self.loggers
            .read()
            .ok()?
            .iter()
            .find(|l| l.name() == name)
            .cloned()
    }
}

impl Default for MultiLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MultiLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> LogLevel {
        self.level.get()
    }

    fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn write_record(&self, record: &LogRecord) {
        let Ok(loggers) = self.loggers.read() else {
            warn!("multi logger lock poisoned, dropping record");
            return;
        };
        for logger in loggers.iter() {
            logger.log_record(record);
        }
    }

    fn close(&self) {
        if let Ok(loggers) = self.loggers.read() {
            for logger in loggers.iter() {
                logger.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect {
        name: &'static str,
        level: AtomicLevel,
        seen: Mutex<Vec<String>>,
        closed: Mutex<bool>,
    }

    impl Collect {
        fn new(name: &'static str, level: LogLevel) -> Arc<Self> {
            Arc::new(Self {
                name,
                level: AtomicLevel::new(level),
                seen: Mutex::new(Vec::new()),
                closed: Mutex::new(false),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Logger for Collect {
        fn name(&self) -> &str {
            self.name
        }

        fn level(&self) -> LogLevel {
            self.level.get()
        }

        fn set_level(&self, level: LogLevel) {
            self.level.set(level);
        }

        fn write_record(&self, record: &LogRecord) {
            self.seen.lock().unwrap().push(record.text.clone());
        }

        fn close(&self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    #[test]
    fn test_children_apply_own_thresholds() {
        let verbose = Collect::new("verbose", LogLevel::Debug);
        let quiet = Collect::new("quiet", LogLevel::Error);
        let multi = MultiLogger::with_loggers(vec![
            verbose.clone() as Arc<dyn Logger>,
            quiet.clone() as Arc<dyn Logger>,
        ]);
        multi.set_level(LogLevel::Debug);

        multi.debug("trace me");
        multi.error("page me");

        assert_eq!(verbose.seen(), vec!["trace me", "page me"]);
        assert_eq!(quiet.seen(), vec!["page me"]);
    }

    #[test]
    fn test_own_threshold_applies_first() {
        let child = Collect::new("child", LogLevel::Debug);
        let multi = MultiLogger::with_loggers(vec![child.clone() as Arc<dyn Logger>]);

        multi.debug("filtered by multi");
        multi.info("passes");

        assert_eq!(child.seen(), vec!["passes"]);
    }

    #[test]
    fn test_add_is_idempotent_per_instance() {
        let child = Collect::new("child", LogLevel::Info);
        let multi = MultiLogger::new();
        multi.add_logger(child.clone());
        multi.add_logger(child.clone());
        assert_eq!(multi.len(), 1);

        multi.info("once");
        assert_eq!(child.seen(), vec!["once"]);
    }

    #[test]
    fn test_remove_by_name() {
        let a = Collect::new("a", LogLevel::Info);
        let b = Collect::new("b", LogLevel::Info);
        let multi = MultiLogger::with_loggers(vec![
            a.clone() as Arc<dyn Logger>,
            b.clone() as Arc<dyn Logger>,
        ]);

        assert_eq!(multi.remove_logger("a"), 1);
        assert_eq!(multi.remove_logger("missing"), 0);
        multi.info("only b");

        assert!(a.seen().is_empty());
        assert_eq!(b.seen(), vec!["only b"]);
        assert!(multi.get("b").is_some());
        assert!(multi.get("a").is_none());
    }

    #[test]
    fn test_close_reaches_children() {
        let a = Collect::new("a", LogLevel::Info);
        let multi = MultiLogger::with_loggers(vec![a.clone() as Arc<dyn Logger>]);
        multi.close();
        assert!(*a.closed.lock().unwrap());
    }

    #[test]
    fn test_exception_forwarded_with_chain() {
        let child = Collect::new("child", LogLevel::Info);
        let multi = MultiLogger::with_loggers(vec![child.clone() as Arc<dyn Logger>]);

        multi.exception("Task failed", &std::io::Error::other("timeout"));

        let seen = child.seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Error: timeout"));
    }
}
