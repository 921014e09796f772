use crate::library::logger::interface::{Level, Logger};
use std::sync::Arc;

#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct LoggerNoop;

impl Logger for LoggerNoop {
    fn log(
        &self,
        _level: Level,
        _message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn with_namespace(&self, _namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerNoop)
    }
}
