use crate::types::{NcrRecord, PermitRecord, RawNcrRow, RawPermitRow};
use crate::util::{clean_hours, clean_month_label, month_number, non_empty, parse_date_safe};
use csv::ReaderBuilder;
use std::error::Error;

/// Diagnostics from one NCR load pass. Rows are only dropped when the
/// reader cannot produce a record at all; value-level problems are
/// coerced to `None` and tallied here instead.
#[derive(Debug, Clone)]
pub struct NcrLoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub skipped_rows: usize,
    pub bad_dates: usize,
    pub unknown_status: usize,
}

#[derive(Debug, Clone)]
pub struct PermitLoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub skipped_rows: usize,
    pub defaulted_hours: usize,
    pub unknown_months: usize,
}

pub fn load_ncr(path: &str) -> Result<(Vec<NcrRecord>, NcrLoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut bad_dates = 0usize;
    let mut unknown_status = 0usize;
    let mut records: Vec<NcrRecord> = Vec::new();

    for result in rdr.deserialize::<RawNcrRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        let raw_date = non_empty(row.record_date);
        let record_date = parse_date_safe(raw_date.as_deref());
        if raw_date.is_some() && record_date.is_none() {
            bad_dates += 1;
        }

        let raw_status = non_empty(row.follow_up);
        let follow_up = raw_status.as_deref().and_then(crate::types::FollowUp::parse);
        if raw_status.is_some() && follow_up.is_none() {
            unknown_status += 1;
        }

        records.push(NcrRecord {
            department: non_empty(row.department),
            reporter: non_empty(row.reporter),
            description: non_empty(row.description),
            record_date,
            follow_up,
        });
    }

    let report = NcrLoadReport {
        total_rows,
        kept_rows: records.len(),
        skipped_rows,
        bad_dates,
        unknown_status,
    };
    Ok((records, report))
}

pub fn load_permits(path: &str) -> Result<(Vec<PermitRecord>, PermitLoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut defaulted_hours = 0usize;
    let mut unknown_months = 0usize;
    let mut records: Vec<PermitRecord> = Vec::new();

    for result in rdr.deserialize::<RawPermitRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        let month_label = clean_month_label(row.month.as_deref());
        let month = month_label.as_deref().and_then(month_number);
        if month_label.is_some() && month.is_none() {
            unknown_months += 1;
        }

        // Hours fail closed to zero, never to an error.
        let hours = match clean_hours(row.total_hours.as_deref()) {
            Some(h) => h,
            None => {
                defaulted_hours += 1;
                0.0
            }
        };

        records.push(PermitRecord {
            month,
            company: non_empty(row.company),
            location: non_empty(row.location),
            safety_supervisor: non_empty(row.safety_supervisor),
            hours,
        });
    }

    let report = PermitLoadReport {
        total_rows,
        kept_rows: records.len(),
        skipped_rows,
        defaulted_hours,
        unknown_months,
    };
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FollowUp;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn load_ncr_maps_arabic_headers() {
        let file = write_temp(concat!(
            "الإدارة المتواجد بها الحالة,إسم الشخص القائم بالتبليغ,شهر,\"المتابعة\nFollow Up\"\n",
            "الجودة,أحمد,2025-07-01,Closed\n",
            "السلامة,محمد,2025-08-15,Opened\n",
        ));
        let (records, report) = load_ncr(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.kept_rows, 2);
        assert_eq!(records[0].department.as_deref(), Some("الجودة"));
        assert_eq!(records[0].follow_up, Some(FollowUp::Closed));
        assert_eq!(records[0].month(), Some(7));
        // "Opened" canonicalizes to Open.
        assert_eq!(records[1].follow_up, Some(FollowUp::Open));
    }

    #[test]
    fn load_ncr_accepts_record_date_header_variant() {
        let file = write_temp(concat!(
            "الإدارة المتواجد بها الحالة,\"تاريخ الرصد\nRecord Date\",\"المتابعة\nFollow Up\"\n",
            "الجودة,\"Jul 7, 2025\",Open\n",
        ));
        let (records, _) = load_ncr(file.path().to_str().unwrap()).unwrap();
        assert_eq!(records[0].month(), Some(7));
    }

    #[test]
    fn load_ncr_coerces_bad_values_instead_of_failing() {
        let file = write_temp(concat!(
            "الإدارة المتواجد بها الحالة,شهر,\"المتابعة\nFollow Up\"\n",
            "الجودة,not-a-date,Pending\n",
            ",,\n",
        ));
        let (records, report) = load_ncr(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.kept_rows, 2);
        assert_eq!(report.bad_dates, 1);
        assert_eq!(report.unknown_status, 1);
        assert_eq!(records[0].record_date, None);
        assert_eq!(records[0].follow_up, None);
        assert_eq!(records[1].department, None);
    }

    #[test]
    fn load_ncr_missing_file_is_an_error() {
        assert!(load_ncr("no_such_file.csv").is_err());
    }

    #[test]
    fn load_permits_cleans_hours_and_months() {
        let file = write_temp(concat!(
            "الشهر,إسم الشركة,الموقع,مشرف السلامة,إجمالي ساعات العمل\n",
            "يوليو-2025,Alpha,Site 1,S1,\"_(* 8:30 AM_)_\"\n",
            "أغسطس-2025,Beta,Site 2,S2,garbage\n",
        ));
        let (records, report) = load_permits(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.kept_rows, 2);
        assert_eq!(records[0].month, Some(7));
        assert_eq!(records[0].hours, 8.30);
        // Unparseable hours fail closed to zero.
        assert_eq!(report.defaulted_hours, 1);
        assert_eq!(records[1].hours, 0.0);
    }

    #[test]
    fn load_permits_counts_unknown_month_labels() {
        let file = write_temp(concat!(
            "الشهر,إسم الشركة,إجمالي ساعات العمل\n",
            "July-2025,Alpha,8\n",
        ));
        let (records, report) = load_permits(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.unknown_months, 1);
        assert_eq!(records[0].month, None);
        // The location column is absent; the field degrades to None.
        assert_eq!(records[0].location, None);
    }
}
