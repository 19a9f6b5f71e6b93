// Entry point and high-level CLI flow.
//
// The binary replaces the original dashboard's dropdowns with a simple
// menu: option [1] loads and cleans both source files, option [2]
// renders the NCR view for a month/department filter, option [3] renders
// the contractor work-permit view for a month filter. Every report run
// recomputes from the in-memory record sets and exports CSV files plus
// a JSON summary next to the console previews.
mod filter;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use filter::{DepartmentFilter, Filter, MonthFilter};
use std::collections::BTreeSet;
use std::io::{self, Write};
use types::{NcrRecord, PermitRecord};

const NCR_FILE: &str = "ncr_cases.csv";
const PERMIT_FILE: &str = "work_permits.csv";

const PREVIEW_ROWS: usize = 10;

/// Record sets owned by the menu loop. Loaded once, read-only for every
/// report pass; a failed load leaves the affected set empty so report
/// generation degrades instead of aborting.
#[derive(Default)]
struct AppState {
    ncr: Vec<NcrRecord>,
    permits: Vec<PermitRecord>,
    loaded: bool,
}

/// Read a single line of input after printing a prompt.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the report selection menu after
/// generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Month selector standing in for the dashboard's month dropdown.
fn prompt_month() -> MonthFilter {
    loop {
        let input = read_line("Month 1-12 (blank for all months): ");
        if input.is_empty() {
            return MonthFilter::All;
        }
        match input.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => return MonthFilter::Month(m),
            _ => println!("Invalid month. Please enter 1-12 or leave blank."),
        }
    }
}

/// Department selector; the distinct departments are listed the way the
/// dashboard dropdown enumerated them.
fn prompt_department(records: &[NcrRecord]) -> DepartmentFilter {
    let departments: BTreeSet<&str> = records.iter().filter_map(|r| r.department.as_deref()).collect();
    if !departments.is_empty() {
        let names: Vec<&str> = departments.into_iter().collect();
        println!("Departments: {}", names.join(", "));
    }
    let input = read_line("Department (blank for all): ");
    if input.is_empty() {
        DepartmentFilter::All
    } else {
        DepartmentFilter::Only(input)
    }
}

/// Handle option [1]: load and clean both source files.
///
/// A missing or unreadable file is a warning, not a failure; the
/// affected record set stays empty and reports still render.
fn handle_load(state: &mut AppState) {
    match loader::load_ncr(NCR_FILE) {
        Ok((data, report)) => {
            println!(
                "NCR cases: {} rows loaded, {} kept, {} skipped.",
                util::format_int(report.total_rows as i64),
                util::format_int(report.kept_rows as i64),
                util::format_int(report.skipped_rows as i64)
            );
            if report.bad_dates > 0 || report.unknown_status > 0 {
                println!(
                    "Note: {} unparsable dates, {} unknown statuses coerced.",
                    util::format_int(report.bad_dates as i64),
                    util::format_int(report.unknown_status as i64)
                );
            }
            state.ncr = data;
        }
        Err(e) => {
            eprintln!("Warning: could not load {}: {}. Continuing with no NCR data.", NCR_FILE, e);
            state.ncr = Vec::new();
        }
    }

    match loader::load_permits(PERMIT_FILE) {
        Ok((data, report)) => {
            println!(
                "Work permits: {} rows loaded, {} kept, {} skipped.",
                util::format_int(report.total_rows as i64),
                util::format_int(report.kept_rows as i64),
                util::format_int(report.skipped_rows as i64)
            );
            if report.defaulted_hours > 0 || report.unknown_months > 0 {
                println!(
                    "Note: {} hour values defaulted to zero, {} unknown month labels.",
                    util::format_int(report.defaulted_hours as i64),
                    util::format_int(report.unknown_months as i64)
                );
            }
            state.permits = data;
        }
        Err(e) => {
            eprintln!(
                "Warning: could not load {}: {}. Continuing with no permit data.",
                PERMIT_FILE, e
            );
            state.permits = Vec::new();
        }
    }

    state.loaded = true;
    println!("");
}

fn write_report<T: serde::Serialize>(path: &str, rows: &[T]) {
    if let Err(e) = output::write_csv(path, rows) {
        eprintln!("Write error for {}: {}", path, e);
    }
}

/// Handle option [2]: render the NCR view for one filter choice.
fn handle_ncr_report(state: &AppState) {
    let filter = Filter {
        month: prompt_month(),
        department: prompt_department(&state.ncr),
    };

    println!("\nGenerating NCR reports...\n");
    let view = reports::render_dashboard(&state.ncr, &filter);

    println!("Total cases:  {}", util::format_int(view.summary.total_cases as i64));
    println!("Closed cases: {}", util::format_int(view.summary.closed_cases as i64));
    println!("Open cases:   {}", util::format_int(view.summary.opened_cases as i64));
    println!("Closure rate: {}%", util::format_number(view.summary.closure_rate, 1));
    println!(
        "Departments: {}  Reporters: {}\n",
        view.summary.departments, view.summary.reporters
    );

    output::preview_table(
        "Cases by Department",
        Some("Closed/Open split, ranked by total"),
        &view.departments,
        PREVIEW_ROWS,
    );
    write_report("ncr_departments.csv", &view.departments);

    output::preview_table(
        "Cases by Reporter",
        Some("Top 10 reporters"),
        &view.reporters,
        PREVIEW_ROWS,
    );
    write_report("ncr_reporters.csv", &view.reporters);

    output::preview_table(
        "Monthly Comparison",
        Some("All months present in the data"),
        &view.monthly,
        12,
    );
    write_report("ncr_monthly.csv", &view.monthly);

    output::preview_table("Open Cases", None, &view.open_cases, PREVIEW_ROWS);
    write_report("ncr_open_cases.csv", &view.open_cases);

    if let Err(e) = output::write_json("ncr_summary.json", &view.summary) {
        eprintln!("Write error for ncr_summary.json: {}", e);
    }
    println!("(Full tables exported to ncr_*.csv, summary to ncr_summary.json)\n");
}

/// Handle option [3]: render the contractor work-permit view.
fn handle_permit_report(state: &AppState) {
    let month = prompt_month();

    println!("\nGenerating work-permit reports...\n");
    let view = reports::render_permit_report(&state.permits, &month);

    println!("Total hours: {}", util::format_number(view.summary.total_hours, 1));
    println!("Total tasks: {}", util::format_int(view.summary.total_tasks as i64));
    println!("Avg hours:   {}", util::format_number(view.summary.avg_hours, 1));
    println!(
        "Companies: {}  Locations: {}  Supervisors: {}\n",
        view.summary.companies, view.summary.locations, view.summary.supervisors
    );

    output::preview_table(
        "Hours by Location",
        None,
        &view.locations,
        PREVIEW_ROWS,
    );
    write_report("permit_locations.csv", &view.locations);

    output::preview_table(
        "Hours by Safety Supervisor",
        Some("Top 15"),
        &view.supervisors,
        PREVIEW_ROWS,
    );
    write_report("permit_supervisors.csv", &view.supervisors);

    output::preview_table("Hours by Company", Some("Top 20"), &view.companies, PREVIEW_ROWS);
    write_report("permit_companies.csv", &view.companies);

    output::preview_table(
        "Monthly Hours",
        Some("Fiscal order, July first"),
        &view.monthly,
        12,
    );
    write_report("permit_monthly.csv", &view.monthly);

    output::preview_table("Monthly Detail", None, &view.monthly_detail, 12);
    write_report("permit_monthly_detail.csv", &view.monthly_detail);

    println!("Top performers:");
    for row in view.companies.iter().take(reports::TOP_PERFORMERS) {
        println!("  Company    {}: {} hours", row.name, row.total_hours);
    }
    for row in view.locations.iter().take(reports::TOP_PERFORMERS) {
        println!("  Location   {}: {} hours", row.name, row.total_hours);
    }
    for row in view.supervisors.iter().take(reports::TOP_PERFORMERS) {
        println!("  Supervisor {}: {} hours", row.name, row.total_hours);
    }
    println!("");

    if let Err(e) = output::write_json("permit_summary.json", &view.summary) {
        eprintln!("Write error for permit_summary.json: {}", e);
    }
    println!("(Full tables exported to permit_*.csv, summary to permit_summary.json)\n");
}

fn main() {
    let mut state = AppState::default();
    loop {
        println!("Select an option:");
        println!("[1] Load the data files");
        println!("[2] NCR dashboard report");
        println!("[3] Contractor work-permit report\n");
        match read_line("Enter choice: ").as_str() {
            "1" => {
                handle_load(&mut state);
            }
            "2" => {
                if !state.loaded {
                    println!("Error: No data loaded. Please load the files first (option 1).\n");
                    continue;
                }
                handle_ncr_report(&state);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                if !state.loaded {
                    println!("Error: No data loaded. Please load the files first (option 1).\n");
                    continue;
                }
                handle_permit_report(&state);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.\n");
            }
        }
    }
}
