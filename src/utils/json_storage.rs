//! JSON file storage implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::*;
use crate::types::*;

/// File holding the report list
pub const REPORTS_FILE: &str = "shiftReports.json";
/// File holding the daily aggregates
pub const DAILY_AGGREGATES_FILE: &str = "dailyAggregates.json";
/// File holding the employee totals
pub const EMPLOYEE_TOTALS_FILE: &str = "employeeTotals.json";

/// JSON file storage implementation
///
/// Each collection lives in its own pretty-printed JSON file under the
/// data directory. Writes replace the whole file through a temp-file
/// rename, so a crash mid-write cannot leave a half-written
/// collection behind. A missing file reads as an empty collection; an
/// unreadable or malformed file is an error rather than silently
/// dropped data.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage rooted at the given data directory
    ///
    /// The directory is created on first write, not here.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory the collection files live in
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_collection<T: DeserializeOwned>(&self, file_name: &str) -> ReportResult<Vec<T>> {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&path).map_err(|err| {
            ReportError::Storage(format!("Failed to read {}: {}", path.display(), err))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            ReportError::Storage(format!("Malformed JSON in {}: {}", path.display(), err))
        })
    }

    fn write_collection<T: Serialize>(&self, file_name: &str, items: &[T]) -> ReportResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|err| {
            ReportError::Storage(format!(
                "Failed to create {}: {}",
                self.data_dir.display(),
                err
            ))
        })?;

        let path = self.data_dir.join(file_name);
        let raw = serde_json::to_string_pretty(items).map_err(|err| {
            ReportError::Storage(format!("Failed to serialize {}: {}", file_name, err))
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|err| {
            ReportError::Storage(format!("Failed to write {}: {}", tmp.display(), err))
        })?;
        fs::rename(&tmp, &path).map_err(|err| {
            ReportError::Storage(format!("Failed to replace {}: {}", path.display(), err))
        })
    }

    fn load_reports(&self) -> ReportResult<Vec<ShiftReport>> {
        self.read_collection(REPORTS_FILE)
    }

    fn store_reports(&self, reports: &[ShiftReport]) -> ReportResult<()> {
        self.write_collection(REPORTS_FILE, reports)
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
impl ReportStorage for JsonFileStorage {
    async fn save_report(&mut self, report: &ShiftReport) -> ReportResult<()> {
        let mut reports = self.load_reports()?;
        reports.push(report.clone());
        self.store_reports(&reports)
    }

    async fn get_report(&self, report_id: &str) -> ReportResult<Option<ShiftReport>> {
        let reports = self.load_reports()?;
        Ok(reports.into_iter().find(|report| report.id == report_id))
    }

    async fn get_reports(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        let reports = self.load_reports()?;
        Ok(reports
            .into_iter()
            .filter(|report| in_date_range(report.date, start_date, end_date))
            .collect())
    }

    async fn get_employee_reports(
        &self,
        employee_name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        let reports = self.load_reports()?;
        Ok(reports
            .into_iter()
            .filter(|report| {
                report.employee_name == employee_name
                    && in_date_range(report.date, start_date, end_date)
            })
            .collect())
    }

    async fn update_report(&mut self, report: &ShiftReport) -> ReportResult<()> {
        let mut reports = self.load_reports()?;
        match reports.iter().position(|stored| stored.id == report.id) {
            Some(index) => {
                reports[index] = report.clone();
                self.store_reports(&reports)
            }
            None => Err(ReportError::ReportNotFound(report.id.clone())),
        }
    }

    async fn delete_report(&mut self, report_id: &str) -> ReportResult<()> {
        let mut reports = self.load_reports()?;
        match reports.iter().position(|stored| stored.id == report_id) {
            Some(index) => {
                reports.remove(index);
                self.store_reports(&reports)
            }
            None => Err(ReportError::ReportNotFound(report_id.to_string())),
        }
    }

    async fn replace_reports(&mut self, reports: &[ShiftReport]) -> ReportResult<()> {
        self.store_reports(reports)
    }

    async fn save_daily_aggregates(&mut self, aggregates: &[DailyAggregate]) -> ReportResult<()> {
        self.write_collection(DAILY_AGGREGATES_FILE, aggregates)
    }

    async fn load_daily_aggregates(&self) -> ReportResult<Vec<DailyAggregate>> {
        self.read_collection(DAILY_AGGREGATES_FILE)
    }

    async fn save_employee_totals(&mut self, totals: &[EmployeeTotals]) -> ReportResult<()> {
        self.write_collection(EMPLOYEE_TOTALS_FILE, totals)
    }

    async fn load_employee_totals(&self) -> ReportResult<Vec<EmployeeTotals>> {
        self.read_collection(EMPLOYEE_TOTALS_FILE)
    }
}
