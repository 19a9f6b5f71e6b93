// Month/department subsetting over the loaded record sets.
//
// Filtering is a pure derivation: the base set is never mutated, and a
// dataset that simply lacks dates or departments degrades to "no
// filtering on that axis" instead of producing an empty report.
use crate::types::{NcrRecord, PermitRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Month(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentFilter {
    All,
    Only(String),
}

#[derive(Debug, Clone)]
pub struct Filter {
    pub month: MonthFilter,
    pub department: DepartmentFilter,
}

pub fn filter_ncr(records: &[NcrRecord], filter: &Filter) -> Vec<NcrRecord> {
    // An axis whose column never parsed to a value cannot be filtered on.
    let has_dates = records.iter().any(|r| r.record_date.is_some());
    let has_departments = records.iter().any(|r| r.department.is_some());

    records
        .iter()
        .filter(|r| {
            let month_ok = match &filter.month {
                MonthFilter::All => true,
                MonthFilter::Month(_) if !has_dates => true,
                MonthFilter::Month(m) => r.month() == Some(*m),
            };
            let dept_ok = match &filter.department {
                DepartmentFilter::All => true,
                DepartmentFilter::Only(_) if !has_departments => true,
                DepartmentFilter::Only(d) => r.department.as_deref() == Some(d.as_str()),
            };
            month_ok && dept_ok
        })
        .cloned()
        .collect()
}

pub fn filter_permits(records: &[PermitRecord], month: &MonthFilter) -> Vec<PermitRecord> {
    let has_months = records.iter().any(|r| r.month.is_some());

    records
        .iter()
        .filter(|r| match month {
            MonthFilter::All => true,
            MonthFilter::Month(_) if !has_months => true,
            MonthFilter::Month(m) => r.month == Some(*m),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FollowUp;
    use chrono::NaiveDate;

    fn ncr(dept: &str, status: &str, month: u32) -> NcrRecord {
        NcrRecord {
            department: Some(dept.to_string()),
            reporter: Some("X".to_string()),
            description: None,
            record_date: NaiveDate::from_ymd_opt(2025, month, 1),
            follow_up: FollowUp::parse(status),
        }
    }

    fn base_set() -> Vec<NcrRecord> {
        vec![
            ncr("A", "Closed", 7),
            ncr("A", "Opened", 7),
            ncr("B", "Closed", 8),
        ]
    }

    fn unfiltered() -> Filter {
        Filter {
            month: MonthFilter::All,
            department: DepartmentFilter::All,
        }
    }

    #[test]
    fn all_filter_keeps_everything() {
        let base = base_set();
        let subset = filter_ncr(&base, &unfiltered());
        assert_eq!(subset.len(), base.len());
    }

    #[test]
    fn month_filter_selects_matching_records() {
        let base = base_set();
        let filter = Filter {
            month: MonthFilter::Month(8),
            department: DepartmentFilter::All,
        };
        let subset = filter_ncr(&base, &filter);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].department.as_deref(), Some("B"));
    }

    #[test]
    fn department_filter_selects_matching_records() {
        let base = base_set();
        let filter = Filter {
            month: MonthFilter::All,
            department: DepartmentFilter::Only("A".to_string()),
        };
        let subset = filter_ncr(&base, &filter);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.department.as_deref() == Some("A")));
    }

    #[test]
    fn combined_filters_intersect() {
        let base = base_set();
        let filter = Filter {
            month: MonthFilter::Month(7),
            department: DepartmentFilter::Only("B".to_string()),
        };
        assert!(filter_ncr(&base, &filter).is_empty());
    }

    #[test]
    fn subset_never_exceeds_base() {
        let base = base_set();
        for m in [MonthFilter::All, MonthFilter::Month(7), MonthFilter::Month(12)] {
            let filter = Filter {
                month: m,
                department: DepartmentFilter::All,
            };
            assert!(filter_ncr(&base, &filter).len() <= base.len());
        }
    }

    #[test]
    fn missing_date_axis_disables_month_filter() {
        let mut base = base_set();
        for r in &mut base {
            r.record_date = None;
        }
        let filter = Filter {
            month: MonthFilter::Month(8),
            department: DepartmentFilter::All,
        };
        // No record carries a date, so the month axis is a no-op.
        assert_eq!(filter_ncr(&base, &filter).len(), base.len());
    }

    #[test]
    fn missing_department_axis_disables_department_filter() {
        let mut base = base_set();
        for r in &mut base {
            r.department = None;
        }
        let filter = Filter {
            month: MonthFilter::All,
            department: DepartmentFilter::Only("A".to_string()),
        };
        assert_eq!(filter_ncr(&base, &filter).len(), base.len());
    }

    fn permit(month: Option<u32>, hours: f64) -> PermitRecord {
        PermitRecord {
            month,
            company: Some("C".to_string()),
            location: Some("L".to_string()),
            safety_supervisor: Some("S".to_string()),
            hours,
        }
    }

    #[test]
    fn permit_month_filter_matches_derived_month() {
        let base = vec![permit(Some(7), 8.0), permit(Some(8), 6.0), permit(None, 4.0)];
        let subset = filter_permits(&base, &MonthFilter::Month(7));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].hours, 8.0);
    }

    #[test]
    fn permit_filter_degrades_without_months() {
        let base = vec![permit(None, 8.0), permit(None, 6.0)];
        let subset = filter_permits(&base, &MonthFilter::Month(7));
        assert_eq!(subset.len(), base.len());
    }
}
