use crate::filter::{filter_ncr, filter_permits, Filter, MonthFilter};
use crate::types::{
    DepartmentSummaryRow, FollowUp, HoursRankingRow, MonthlyStatusRow, NcrRecord, NcrSummary,
    OpenCaseRow, PermitMonthlyDetailRow, PermitMonthlyRow, PermitRecord, PermitSummary,
    ReporterSummaryRow,
};
use crate::util::{average, format_number, month_name};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Reporter ranking is cut to the busiest reporters.
pub const REPORTER_TOP_N: usize = 10;
/// Safety-supervisor and company hours rankings keep their dashboard cuts.
pub const SUPERVISOR_TOP_N: usize = 15;
pub const COMPANY_TOP_N: usize = 20;
/// Short "best of" previews reuse the head of the full rankings.
pub const TOP_PERFORMERS: usize = 5;

pub const CALENDAR_MONTH_ORDER: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
/// Fiscal year starting in July, the ordering the permit data is
/// reported in.
pub const FISCAL_MONTH_ORDER: [u32; 12] = [7, 8, 9, 10, 11, 12, 1, 2, 3, 4, 5, 6];

/// Everything the NCR dashboard renders for one filter choice. The
/// monthly comparison always covers the unfiltered base set.
#[derive(Debug)]
pub struct DashboardView {
    pub summary: NcrSummary,
    pub departments: Vec<DepartmentSummaryRow>,
    pub reporters: Vec<ReporterSummaryRow>,
    pub monthly: Vec<MonthlyStatusRow>,
    pub open_cases: Vec<OpenCaseRow>,
}

#[derive(Debug)]
pub struct PermitView {
    pub summary: PermitSummary,
    pub locations: Vec<HoursRankingRow>,
    pub supervisors: Vec<HoursRankingRow>,
    pub companies: Vec<HoursRankingRow>,
    pub monthly: Vec<PermitMonthlyRow>,
    pub monthly_detail: Vec<PermitMonthlyDetailRow>,
}

pub fn render_dashboard(records: &[NcrRecord], filter: &Filter) -> DashboardView {
    let subset = filter_ncr(records, filter);
    DashboardView {
        summary: ncr_summary(&subset),
        departments: department_summary(&subset),
        reporters: reporter_summary(&subset, REPORTER_TOP_N),
        monthly: monthly_status(records, &CALENDAR_MONTH_ORDER),
        open_cases: open_cases(&subset),
    }
}

pub fn render_permit_report(records: &[PermitRecord], month: &MonthFilter) -> PermitView {
    let subset = filter_permits(records, month);
    PermitView {
        summary: permit_summary(&subset),
        locations: hours_ranking(&subset, |r| r.location.as_deref(), None),
        supervisors: hours_ranking(
            &subset,
            |r| r.safety_supervisor.as_deref(),
            Some(SUPERVISOR_TOP_N),
        ),
        companies: hours_ranking(&subset, |r| r.company.as_deref(), Some(COMPANY_TOP_N)),
        monthly: permit_monthly(records, &FISCAL_MONTH_ORDER),
        monthly_detail: permit_monthly_detail(records, &FISCAL_MONTH_ORDER),
    }
}

/// Group items by an optional key, preserving first-seen key order so a
/// later stable sort breaks ties deterministically. Items without a key
/// are skipped.
fn group_by_key<T, K, A, FK, FA>(items: &[T], key: FK, mut fold: FA) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Default,
    FK: Fn(&T) -> Option<K>,
    FA: FnMut(&mut A, &T),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();
    for item in items {
        let Some(k) = key(item) else { continue };
        let i = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        fold(&mut groups[i].1, item);
    }
    groups
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusAcc {
    closed: usize,
    open: usize,
}

impl StatusAcc {
    fn add(&mut self, status: Option<FollowUp>) {
        match status {
            Some(FollowUp::Closed) => self.closed += 1,
            Some(FollowUp::Open) => self.open += 1,
            None => {}
        }
    }

    fn total(&self) -> usize {
        self.closed + self.open
    }
}

/// Dense ranks for totals already sorted descending: ties share a rank,
/// the next distinct total increments it by one.
fn dense_ranks(totals: &[usize]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(totals.len());
    let mut rank = 0usize;
    let mut prev: Option<usize> = None;
    for &t in totals {
        if prev != Some(t) {
            rank += 1;
            prev = Some(t);
        }
        ranks.push(rank);
    }
    ranks
}

fn status_groups_sorted(
    records: &[NcrRecord],
    key: fn(&NcrRecord) -> Option<&str>,
) -> Vec<(String, StatusAcc, usize)> {
    let mut groups = group_by_key(
        records,
        |r| key(r).map(str::to_string),
        |acc: &mut StatusAcc, r| acc.add(r.follow_up),
    );
    // Stable sort keeps first-seen order among equal totals.
    groups.sort_by(|a, b| b.1.total().cmp(&a.1.total()));
    let totals: Vec<usize> = groups.iter().map(|g| g.1.total()).collect();
    let ranks = dense_ranks(&totals);
    groups
        .into_iter()
        .zip(ranks)
        .map(|((name, acc), rank)| (name, acc, rank))
        .collect()
}

pub fn department_summary(records: &[NcrRecord]) -> Vec<DepartmentSummaryRow> {
    status_groups_sorted(records, |r| r.department.as_deref())
        .into_iter()
        .map(|(department, acc, rank)| DepartmentSummaryRow {
            rank,
            department,
            closed: acc.closed,
            open: acc.open,
            total: acc.total(),
        })
        .collect()
}

pub fn reporter_summary(records: &[NcrRecord], top: usize) -> Vec<ReporterSummaryRow> {
    status_groups_sorted(records, |r| r.reporter.as_deref())
        .into_iter()
        .take(top)
        .map(|(reporter, acc, rank)| ReporterSummaryRow {
            rank,
            reporter,
            closed: acc.closed,
            open: acc.open,
            total: acc.total(),
        })
        .collect()
}

/// Position of a month in the caller-supplied order table; months the
/// table does not cover sort last, by number.
fn month_sort_key(order: &[u32], month: u32) -> (usize, u32) {
    match order.iter().position(|&o| o == month) {
        Some(pos) => (pos, month),
        None => (order.len(), month),
    }
}

/// Status breakdown per month present in `records`. Months with no
/// records are omitted, never zero-filled.
pub fn monthly_status(records: &[NcrRecord], order: &[u32]) -> Vec<MonthlyStatusRow> {
    let mut groups = group_by_key(
        records,
        NcrRecord::month,
        |acc: &mut StatusAcc, r| acc.add(r.follow_up),
    );
    groups.sort_by_key(|(m, _)| month_sort_key(order, *m));
    groups
        .into_iter()
        .map(|(m, acc)| MonthlyStatusRow {
            month: month_name(m),
            closed: acc.closed,
            open: acc.open,
            total: acc.total(),
        })
        .collect()
}

pub fn ncr_summary(records: &[NcrRecord]) -> NcrSummary {
    let total_cases = records.len();
    let closed_cases = records
        .iter()
        .filter(|r| r.follow_up == Some(FollowUp::Closed))
        .count();
    let opened_cases = records
        .iter()
        .filter(|r| r.follow_up == Some(FollowUp::Open))
        .count();
    let closure_rate = if total_cases > 0 {
        closed_cases as f64 / total_cases as f64 * 100.0
    } else {
        0.0
    };
    let departments: HashSet<&str> = records.iter().filter_map(|r| r.department.as_deref()).collect();
    let reporters: HashSet<&str> = records.iter().filter_map(|r| r.reporter.as_deref()).collect();
    NcrSummary {
        total_cases,
        closed_cases,
        opened_cases,
        closure_rate,
        departments: departments.len(),
        reporters: reporters.len(),
    }
}

pub fn open_cases(records: &[NcrRecord]) -> Vec<OpenCaseRow> {
    records
        .iter()
        .filter(|r| r.follow_up == Some(FollowUp::Open))
        .map(|r| OpenCaseRow {
            department: r.department.clone().unwrap_or_default(),
            reporter: r.reporter.clone().unwrap_or_default(),
            description: r.description.clone().unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct HoursAcc {
    sum: f64,
    count: usize,
    max: f64,
}

impl HoursAcc {
    fn add(&mut self, hours: f64) {
        self.sum += hours;
        self.count += 1;
        self.max = self.max.max(hours);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Hours per group, sorted descending by sum and optionally cut to the
/// top N. Ranks here are sequential row numbers.
pub fn hours_ranking(
    records: &[PermitRecord],
    key: fn(&PermitRecord) -> Option<&str>,
    top: Option<usize>,
) -> Vec<HoursRankingRow> {
    let mut groups = group_by_key(
        records,
        |r| key(r).map(str::to_string),
        |acc: &mut HoursAcc, r| acc.add(r.hours),
    );
    groups.sort_by(|a, b| b.1.sum.partial_cmp(&a.1.sum).unwrap_or(Ordering::Equal));
    let cut = top.unwrap_or(groups.len());
    groups
        .into_iter()
        .take(cut)
        .enumerate()
        .map(|(idx, (name, acc))| HoursRankingRow {
            rank: idx + 1,
            name,
            total_hours: format_number(acc.sum, 1),
            tasks: acc.count,
            avg_hours: format_number(acc.mean(), 1),
        })
        .collect()
}

pub fn permit_monthly(records: &[PermitRecord], order: &[u32]) -> Vec<PermitMonthlyRow> {
    let mut groups = group_by_key(
        records,
        |r| r.month,
        |acc: &mut HoursAcc, r| acc.add(r.hours),
    );
    groups.sort_by_key(|(m, _)| month_sort_key(order, *m));
    groups
        .into_iter()
        .map(|(m, acc)| PermitMonthlyRow {
            month: month_name(m),
            total_hours: format_number(acc.sum, 1),
            tasks: acc.count,
            avg_hours: format_number(acc.mean(), 1),
        })
        .collect()
}

#[derive(Debug, Default, Clone)]
struct MonthDetailAcc {
    hours: HoursAcc,
    companies: HashSet<String>,
    locations: HashSet<String>,
    supervisors: HashSet<String>,
}

pub fn permit_monthly_detail(
    records: &[PermitRecord],
    order: &[u32],
) -> Vec<PermitMonthlyDetailRow> {
    let mut groups = group_by_key(records, |r| r.month, |acc: &mut MonthDetailAcc, r| {
        acc.hours.add(r.hours);
        if let Some(c) = &r.company {
            acc.companies.insert(c.clone());
        }
        if let Some(l) = &r.location {
            acc.locations.insert(l.clone());
        }
        if let Some(s) = &r.safety_supervisor {
            acc.supervisors.insert(s.clone());
        }
    });
    groups.sort_by_key(|(m, _)| month_sort_key(order, *m));
    groups
        .into_iter()
        .map(|(m, acc)| PermitMonthlyDetailRow {
            month: month_name(m),
            total_hours: format_number(acc.hours.sum, 1),
            avg_hours: format_number(acc.hours.mean(), 1),
            tasks: acc.hours.count,
            max_hours: format_number(acc.hours.max, 1),
            companies: acc.companies.len(),
            locations: acc.locations.len(),
            supervisors: acc.supervisors.len(),
        })
        .collect()
}

pub fn permit_summary(records: &[PermitRecord]) -> PermitSummary {
    let hours: Vec<f64> = records.iter().map(|r| r.hours).collect();
    let companies: HashSet<&str> = records.iter().filter_map(|r| r.company.as_deref()).collect();
    let locations: HashSet<&str> = records.iter().filter_map(|r| r.location.as_deref()).collect();
    let supervisors: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.safety_supervisor.as_deref())
        .collect();
    PermitSummary {
        total_hours: hours.iter().sum(),
        total_tasks: records.len(),
        avg_hours: average(&hours),
        companies: companies.len(),
        locations: locations.len(),
        supervisors: supervisors.len(),
    }
}
