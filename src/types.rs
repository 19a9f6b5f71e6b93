use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Follow-up status of an NCR case.
///
/// The source exports spell the open state both `Open` and `Opened`
/// depending on the file; both parse to `Open`. Any other value is
/// treated as unknown (`None` on the record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Closed,
    Open,
}

impl FollowUp {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Closed" => Some(Self::Closed),
            "Open" | "Opened" => Some(Self::Open),
            _ => None,
        }
    }
}

/// Raw NCR row as it appears in the source file. The Arabic headers
/// (including the embedded-newline bilingual ones) are mapped here once;
/// the rest of the code never indexes columns by label. Aliases cover
/// the header variants seen across exports.
#[derive(Debug, Deserialize)]
pub struct RawNcrRow {
    #[serde(rename = "الإدارة المتواجد بها الحالة")]
    pub department: Option<String>,
    #[serde(rename = "إسم الشخص القائم بالتبليغ")]
    pub reporter: Option<String>,
    #[serde(rename = "وصف حالة عدم التطابق\nDescription of non conformance")]
    pub description: Option<String>,
    #[serde(rename = "شهر", alias = "تاريخ الرصد\nRecord Date")]
    pub record_date: Option<String>,
    #[serde(rename = "المتابعة\nFollow Up")]
    pub follow_up: Option<String>,
}

/// Raw contractor work-permit row. Only the columns the reports consume
/// are mapped; extra columns in the file are ignored by the reader.
#[derive(Debug, Deserialize)]
pub struct RawPermitRow {
    #[serde(rename = "الشهر")]
    pub month: Option<String>,
    #[serde(rename = "إسم الشركة")]
    pub company: Option<String>,
    #[serde(rename = "الموقع")]
    pub location: Option<String>,
    #[serde(rename = "مشرف السلامة")]
    pub safety_supervisor: Option<String>,
    #[serde(rename = "إجمالي ساعات العمل")]
    pub total_hours: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NcrRecord {
    pub department: Option<String>,
    pub reporter: Option<String>,
    pub description: Option<String>,
    pub record_date: Option<NaiveDate>,
    pub follow_up: Option<FollowUp>,
}

impl NcrRecord {
    /// Calendar month of the record date, when the date parsed.
    pub fn month(&self) -> Option<u32> {
        self.record_date.map(|d| d.month())
    }
}

#[derive(Debug, Clone)]
pub struct PermitRecord {
    /// Month number 1..=12, derived from the Arabic month label after
    /// the year suffix is stripped.
    pub month: Option<u32>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub safety_supervisor: Option<String>,
    /// Cleaned total work hours, never negative.
    pub hours: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentSummaryRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Closed")]
    #[tabled(rename = "Closed")]
    pub closed: usize,
    #[serde(rename = "Open")]
    #[tabled(rename = "Open")]
    pub open: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ReporterSummaryRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Reporter")]
    #[tabled(rename = "Reporter")]
    pub reporter: String,
    #[serde(rename = "Closed")]
    #[tabled(rename = "Closed")]
    pub closed: usize,
    #[serde(rename = "Open")]
    #[tabled(rename = "Open")]
    pub open: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyStatusRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Closed")]
    #[tabled(rename = "Closed")]
    pub closed: usize,
    #[serde(rename = "Open")]
    #[tabled(rename = "Open")]
    pub open: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
}

/// Detail listing of the cases still open after filtering.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct OpenCaseRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Reporter")]
    #[tabled(rename = "Reporter")]
    pub reporter: String,
    #[serde(rename = "Description")]
    #[tabled(rename = "Description")]
    pub description: String,
}

/// One ranked group in an hours report (company, location, or safety
/// supervisor; the grouping key lands in `name`).
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HoursRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "TotalHours")]
    #[tabled(rename = "TotalHours")]
    pub total_hours: String,
    #[serde(rename = "Tasks")]
    #[tabled(rename = "Tasks")]
    pub tasks: usize,
    #[serde(rename = "AvgHours")]
    #[tabled(rename = "AvgHours")]
    pub avg_hours: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PermitMonthlyRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalHours")]
    #[tabled(rename = "TotalHours")]
    pub total_hours: String,
    #[serde(rename = "Tasks")]
    #[tabled(rename = "Tasks")]
    pub tasks: usize,
    #[serde(rename = "AvgHours")]
    #[tabled(rename = "AvgHours")]
    pub avg_hours: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PermitMonthlyDetailRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalHours")]
    #[tabled(rename = "TotalHours")]
    pub total_hours: String,
    #[serde(rename = "AvgHours")]
    #[tabled(rename = "AvgHours")]
    pub avg_hours: String,
    #[serde(rename = "Tasks")]
    #[tabled(rename = "Tasks")]
    pub tasks: usize,
    #[serde(rename = "MaxHours")]
    #[tabled(rename = "MaxHours")]
    pub max_hours: String,
    #[serde(rename = "Companies")]
    #[tabled(rename = "Companies")]
    pub companies: usize,
    #[serde(rename = "Locations")]
    #[tabled(rename = "Locations")]
    pub locations: usize,
    #[serde(rename = "Supervisors")]
    #[tabled(rename = "Supervisors")]
    pub supervisors: usize,
}

/// Metric-card numbers for the NCR view. `total_cases` counts every
/// filtered record; the closed/open split covers only recognized
/// statuses, so the pair may sum to less than the total.
#[derive(Debug, Serialize)]
pub struct NcrSummary {
    pub total_cases: usize,
    pub closed_cases: usize,
    pub opened_cases: usize,
    pub closure_rate: f64,
    pub departments: usize,
    pub reporters: usize,
}

#[derive(Debug, Serialize)]
pub struct PermitSummary {
    pub total_hours: f64,
    pub total_tasks: usize,
    pub avg_hours: f64,
    pub companies: usize,
    pub locations: usize,
    pub supervisors: usize,
}
