use tokio::sync::Mutex;

use super::{Consumption, LedgerError, LogEntry};

/// Rows kept in process. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    orders: Mutex<Vec<String>>,
    log: Mutex<Vec<LogEntry>>,
    has_log_sheet: bool,
}

impl MemoryLedger {
    pub fn new(orders: Vec<String>) -> Self {
        Self {
            orders: Mutex::new(orders),
            log: Mutex::new(Vec::new()),
            has_log_sheet: true,
        }
    }

    /// A ledger whose spreadsheet has no sheet to log into.
    pub fn without_log_sheet(orders: Vec<String>) -> Self {
        Self {
            has_log_sheet: false,
            ..Self::new(orders)
        }
    }

    pub async fn consume_order(&self, order_number: &str) -> Consumption {
        let mut orders = self.orders.lock().await;
        match orders.iter().position(|row| row.trim() == order_number) {
            Some(index) => {
                orders.remove(index);
                let remaining = orders.iter().filter(|row| row.trim() == order_number).count();
                Consumption::Consumed {
                    remaining: remaining as u32,
                }
            }
            None => Consumption::NotFound,
        }
    }

    pub async fn append_log(&self, entry: &LogEntry) -> Result<(), LedgerError> {
        if !self.has_log_sheet {
            return Err(LedgerError::LogSheetMissing);
        }
        self.log.lock().await.push(entry.clone());
        Ok(())
    }

    #[cfg(test)]
    pub async fn log_entries(&self) -> Vec<LogEntry> {
        self.log.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::api::DeviceType;
    use std::sync::Arc;

    fn entry(event: &str) -> LogEntry {
        LogEntry {
            timestamp: "2024/1/1 0:00:00".to_string(),
            event: event.to_string(),
            details: "{}".to_string(),
            device: DeviceType::Desktop,
            result: String::new(),
        }
    }

    #[tokio::test]
    async fn test_each_row_is_one_unit() {
        let ledger = MemoryLedger::new(vec![
            "1234-5678".to_string(),
            "9999".to_string(),
            "1234-5678".to_string(),
        ]);
        assert_eq!(ledger.consume_order("1234-5678").await, Consumption::Consumed { remaining: 1 });
        assert_eq!(ledger.consume_order("1234-5678").await, Consumption::Consumed { remaining: 0 });
        assert_eq!(ledger.consume_order("1234-5678").await, Consumption::NotFound);
        assert_eq!(ledger.consume_order("9999").await, Consumption::Consumed { remaining: 0 });
    }

    #[tokio::test]
    async fn test_concurrent_consumers_share_one_unit() {
        let ledger = Arc::new(MemoryLedger::new(vec!["1234-5678".to_string()]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.consume_order("1234-5678").await })
            })
            .collect();

        let mut consumed = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), Consumption::Consumed { .. }) {
                consumed += 1;
            }
        }
        assert_eq!(consumed, 1);
    }

    #[tokio::test]
    async fn test_log_rows() {
        let ledger = MemoryLedger::new(Vec::new());
        ledger.append_log(&entry("OrderVerified")).await.unwrap();
        assert_eq!(ledger.log_entries().await.len(), 1);

        let no_sheet = MemoryLedger::without_log_sheet(Vec::new());
        assert!(matches!(
            no_sheet.append_log(&entry("OrderVerified")).await,
            Err(LedgerError::LogSheetMissing)
        ));
    }
}
