//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Backed by plain vectors so stored order is insertion order, which
/// the aggregation folds define their output order against. Clones
/// share the same underlying data.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    reports: Arc<RwLock<Vec<ShiftReport>>>,
    daily_aggregates: Arc<RwLock<Vec<DailyAggregate>>>,
    employee_totals: Arc<RwLock<Vec<EmployeeTotals>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            reports: Arc::new(RwLock::new(Vec::new())),
            daily_aggregates: Arc::new(RwLock::new(Vec::new())),
            employee_totals: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.reports.write().unwrap().clear();
        self.daily_aggregates.write().unwrap().clear();
        self.employee_totals.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn in_date_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if date > end {
            return false;
        }
    }
    true
}

#[async_trait]
impl ReportStorage for MemoryStorage {
    async fn save_report(&mut self, report: &ShiftReport) -> ReportResult<()> {
        self.reports.write().unwrap().push(report.clone());
        Ok(())
    }

    async fn get_report(&self, report_id: &str) -> ReportResult<Option<ShiftReport>> {
        Ok(self
            .reports
            .read()
            .unwrap()
            .iter()
            .find(|report| report.id == report_id)
            .cloned())
    }

    async fn get_reports(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        let reports = self.reports.read().unwrap();
        Ok(reports
            .iter()
            .filter(|report| in_date_range(report.date, start_date, end_date))
            .cloned()
            .collect())
    }

    async fn get_employee_reports(
        &self,
        employee_name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        let reports = self.reports.read().unwrap();
        Ok(reports
            .iter()
            .filter(|report| {
                report.employee_name == employee_name
                    && in_date_range(report.date, start_date, end_date)
            })
            .cloned()
            .collect())
    }

    async fn update_report(&mut self, report: &ShiftReport) -> ReportResult<()> {
        let mut reports = self.reports.write().unwrap();
        match reports.iter().position(|stored| stored.id == report.id) {
            Some(index) => {
                reports[index] = report.clone();
                Ok(())
            }
            None => Err(ReportError::ReportNotFound(report.id.clone())),
        }
    }

    async fn delete_report(&mut self, report_id: &str) -> ReportResult<()> {
        let mut reports = self.reports.write().unwrap();
        match reports.iter().position(|stored| stored.id == report_id) {
            Some(index) => {
                reports.remove(index);
                Ok(())
            }
            None => Err(ReportError::ReportNotFound(report_id.to_string())),
        }
    }

    async fn replace_reports(&mut self, reports: &[ShiftReport]) -> ReportResult<()> {
        *self.reports.write().unwrap() = reports.to_vec();
        Ok(())
    }

    async fn save_daily_aggregates(&mut self, aggregates: &[DailyAggregate]) -> ReportResult<()> {
        *self.daily_aggregates.write().unwrap() = aggregates.to_vec();
        Ok(())
    }

    async fn load_daily_aggregates(&self) -> ReportResult<Vec<DailyAggregate>> {
        Ok(self.daily_aggregates.read().unwrap().clone())
    }

    async fn save_employee_totals(&mut self, totals: &[EmployeeTotals]) -> ReportResult<()> {
        *self.employee_totals.write().unwrap() = totals.to_vec();
        Ok(())
    }

    async fn load_employee_totals(&self) -> ReportResult<Vec<EmployeeTotals>> {
        Ok(self.employee_totals.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn report(id: &str, day: &str, employee: &str) -> ShiftReport {
        ShiftReport::new(
            id.to_string(),
            NaiveDate::from_str(day).unwrap(),
            ShiftType::Day,
            employee.to_string(),
        )
    }

    #[tokio::test]
    async fn test_preserves_insertion_order() {
        let mut storage = MemoryStorage::new();
        storage.save_report(&report("b", "2025-05-08", "B")).await.unwrap();
        storage.save_report(&report("a", "2025-05-07", "A")).await.unwrap();
        storage.save_report(&report("c", "2025-05-09", "C")).await.unwrap();

        let all = storage.get_reports(None, None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let mut storage = MemoryStorage::new();
        for (id, day) in [("a", "2025-05-06"), ("b", "2025-05-07"), ("c", "2025-05-08")] {
            storage.save_report(&report(id, day, "A")).await.unwrap();
        }

        let range = storage
            .get_reports(
                Some(NaiveDate::from_str("2025-05-07").unwrap()),
                Some(NaiveDate::from_str("2025-05-08").unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range[0].id, "b");
    }

    #[tokio::test]
    async fn test_update_missing_report_fails() {
        let mut storage = MemoryStorage::new();
        let result = storage.update_report(&report("ghost", "2025-05-07", "A")).await;
        assert!(matches!(result, Err(ReportError::ReportNotFound(_))));
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let mut storage = MemoryStorage::new();
        let view = storage.clone();

        storage.save_report(&report("a", "2025-05-07", "A")).await.unwrap();
        assert!(view.get_report("a").await.unwrap().is_some());
    }
}
