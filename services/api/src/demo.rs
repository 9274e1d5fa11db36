use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use clap::Args;
use std::sync::Arc;
use urbanscope::assignment::coordination::{Communication, Resource, ResourceStatus};
use urbanscope::assignment::AssignmentService;
use urbanscope::config::QueryConfig;
use urbanscope::error::AppError;
use urbanscope::interventions::{
    Intervention, InterventionId, InterventionKind, InterventionPriority, InterventionSite,
    InterventionStatus, Progress,
};
use urbanscope::reports::{
    CategoryRecency, Coordinates, DashboardWindow, DateRange, Department, DepartmentPerformance,
    InMemoryReportStore, Report, ReportCategory, ReportFilter, ReportId, ReportQuery,
    ReportService, ReportStatus, Severity, SortField, StatusFilter,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Window start (YYYY-MM-DD). Defaults to 30 days before the end.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Restrict the window to one region
    #[arg(long)]
    pub(crate) region: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Department receiving the demo assignment batch
    #[arg(long, default_value = "dept-roads")]
    pub(crate) department: String,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let to = args.to.unwrap_or_else(|| Local::now().date_naive());
    let from = args.from.unwrap_or(to - Duration::days(30));

    let service = seeded_report_service();
    let window = DashboardWindow {
        range: DateRange {
            from: Some(from),
            to: Some(to),
        },
        region: args.region,
    };
    let view = service.dashboard(&window, CategoryRecency::AllTime, Utc::now())?;

    println!("Civic report dashboard ({from} to {to})");
    println!("=======================================");
    println!(
        "reports in window:    {} (all time {})",
        view.kpis.total_reports.current, view.kpis.total_reports.all_time
    );
    println!("resolved:             {}%", view.kpis.resolved_percentage);
    println!("avg response:         {}h", view.kpis.avg_response_hours);
    println!("active interventions: {}", view.kpis.active_interventions);

    println!();
    println!("Top categories");
    for entry in &view.top_categories {
        println!("  {:>3}  {}", entry.count, entry.label);
    }

    println!();
    println!("Recent reports");
    for report in &view.recent_reports {
        println!(
            "  {}  [{}] {} ({})",
            report.id.0, report.status_label, report.title, report.region
        );
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryReportStore::seeded(sample_reports()));
    let reports = Arc::new(ReportService::new(store.clone(), QueryConfig::default()));
    let assignments = AssignmentService::new(store, sample_departments());

    println!("Step 1: unassigned queue");
    let queue = assignments.queue().map_err(AppError::from)?;
    for report in &queue {
        println!(
            "  {}  sev {}  {}",
            report.id.0,
            report.severity.get(),
            report.title
        );
    }

    println!();
    println!(
        "Step 2: assign the two most severe queue entries to {}",
        args.department
    );
    let mut by_severity = queue.clone();
    by_severity.sort_by(|a, b| b.severity.cmp(&a.severity));
    let ids: Vec<ReportId> = by_severity.iter().take(2).map(|r| r.id.clone()).collect();
    let updated = assignments.assign(&ids, &args.department)?;
    for report in &updated {
        println!(
            "  {} -> {}",
            report.id.0,
            report.assigned_to.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("Step 3: assigned reports through the query engine");
    let query = ReportQuery::default()
        .with_filter(ReportFilter {
            status: StatusFilter::AssignedOnly,
            ..ReportFilter::default()
        })
        .sorted_by(SortField::Severity);
    let page = reports.query(&query)?;
    for view in &page.items {
        println!("  {}  sev {}  {}", view.id.0, view.severity, view.title);
    }

    println!();
    println!("Step 4: dashboard aggregates");
    let view = reports.dashboard(&DashboardWindow::default(), CategoryRecency::AllTime, Utc::now())?;
    println!(
        "  {} reports, {}% resolved, {}h average response",
        view.kpis.total_reports.all_time,
        view.kpis.resolved_percentage,
        view.kpis.avg_response_hours
    );

    Ok(())
}

fn seeded_report_service() -> ReportService<InMemoryReportStore> {
    ReportService::new(
        Arc::new(InMemoryReportStore::seeded(sample_reports())),
        QueryConfig::default(),
    )
}

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

struct Seed {
    id: &'static str,
    title: &'static str,
    category: ReportCategory,
    severity: u8,
    status: ReportStatus,
    location: &'static str,
    region: &'static str,
    lat: f64,
    lng: f64,
    days_ago: i64,
    assigned_to: Option<&'static str>,
    response_time_hours: Option<u32>,
}

impl Seed {
    fn build(&self) -> Report {
        Report {
            id: ReportId(self.id.to_string()),
            title: self.title.to_string(),
            description: None,
            category: self.category,
            severity: Severity::new(self.severity).expect("seed severity is in range"),
            status: self.status,
            location: self.location.to_string(),
            region: self.region.to_string(),
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
            submitted_at: days_ago(self.days_ago),
            assigned_to: self.assigned_to.map(str::to_string),
            response_time_hours: self.response_time_hours,
            read: false,
        }
    }
}

/// Demo dataset shaped like real intake: a mix of statuses, regions, and
/// missing optionals.
pub(crate) fn sample_reports() -> Vec<Report> {
    let seeds = [
        Seed {
            id: "rep-001",
            title: "Damaged sidewalk blocking wheelchairs",
            category: ReportCategory::BrokenSidewalk,
            severity: 3,
            status: ReportStatus::Resolved,
            location: "Av. Paulista, 1000",
            region: "Bela Vista",
            lat: -23.5613,
            lng: -46.6565,
            days_ago: 2,
            assigned_to: Some("dept-roads"),
            response_time_hours: Some(24),
        },
        Seed {
            id: "rep-002",
            title: "Bare block with no tree cover",
            category: ReportCategory::MissingTree,
            severity: 2,
            status: ReportStatus::InProgress,
            location: "Rua Augusta, 500",
            region: "Consolacao",
            lat: -23.5530,
            lng: -46.6527,
            days_ago: 5,
            assigned_to: Some("dept-parks"),
            response_time_hours: Some(48),
        },
        Seed {
            id: "rep-003",
            title: "Heat stress at the central square",
            category: ReportCategory::HeatIsland,
            severity: 4,
            status: ReportStatus::Pending,
            location: "Praca da Republica",
            region: "Republica",
            lat: -23.5431,
            lng: -46.6426,
            days_ago: 7,
            assigned_to: None,
            response_time_hours: None,
        },
        Seed {
            id: "rep-004",
            title: "Missing curb ramp at the crossing",
            category: ReportCategory::MissingRamp,
            severity: 5,
            status: ReportStatus::Pending,
            location: "Rua 25 de Marco, 100",
            region: "Centro",
            lat: -23.5440,
            lng: -46.6340,
            days_ago: 1,
            assigned_to: None,
            response_time_hours: None,
        },
        Seed {
            id: "rep-005",
            title: "Underpass floods after light rain",
            category: ReportCategory::Flooding,
            severity: 5,
            status: ReportStatus::InProgress,
            location: "Av. do Estado, 3000",
            region: "Mooca",
            lat: -23.5560,
            lng: -46.6180,
            days_ago: 10,
            assigned_to: Some("dept-drainage"),
            response_time_hours: Some(12),
        },
        Seed {
            id: "rep-006",
            title: "Vendor stalls blocking the sidewalk",
            category: ReportCategory::Obstruction,
            severity: 2,
            status: ReportStatus::Rejected,
            location: "Rua Oscar Freire, 800",
            region: "Jardins",
            lat: -23.5662,
            lng: -46.6698,
            days_ago: 14,
            assigned_to: None,
            response_time_hours: Some(72),
        },
        Seed {
            id: "rep-007",
            title: "Uneven paving near the school entrance",
            category: ReportCategory::UnevenSurface,
            severity: 3,
            status: ReportStatus::Pending,
            location: "Rua Vergueiro, 1200",
            region: "Liberdade",
            lat: -23.5710,
            lng: -46.6340,
            days_ago: 20,
            assigned_to: None,
            response_time_hours: None,
        },
    ];
    seeds.iter().map(Seed::build).collect()
}

pub(crate) fn sample_departments() -> Vec<Department> {
    vec![
        Department {
            id: "dept-roads".to_string(),
            name: "Roads and Sidewalks".to_string(),
            member_count: 14,
            avg_resolution_hours: 36,
            performance: DepartmentPerformance::Good,
        },
        Department {
            id: "dept-parks".to_string(),
            name: "Parks and Green Cover".to_string(),
            member_count: 9,
            avg_resolution_hours: 60,
            performance: DepartmentPerformance::Average,
        },
        Department {
            id: "dept-drainage".to_string(),
            name: "Drainage and Flood Control".to_string(),
            member_count: 7,
            avg_resolution_hours: 52,
            performance: DepartmentPerformance::Average,
        },
        Department {
            id: "dept-accessibility".to_string(),
            name: "Accessibility Works".to_string(),
            member_count: 5,
            avg_resolution_hours: 90,
            performance: DepartmentPerformance::Poor,
        },
    ]
}

pub(crate) fn sample_communications() -> Vec<Communication> {
    vec![
        Communication {
            id: "comm-001".to_string(),
            department_id: "dept-roads".to_string(),
            author: "Operations lead".to_string(),
            sent_at: days_ago(3),
            content: "Three crew members assigned to the downtown sidewalk repairs.".to_string(),
        },
        Communication {
            id: "comm-002".to_string(),
            department_id: "dept-roads".to_string(),
            author: "Field supervisor".to_string(),
            sent_at: days_ago(2),
            content: "We will need extra patching material for Av. Paulista.".to_string(),
        },
        Communication {
            id: "comm-003".to_string(),
            department_id: "dept-parks".to_string(),
            author: "Planting coordinator".to_string(),
            sent_at: days_ago(1),
            content: "Tree planting at Republica is 70% complete.".to_string(),
        },
    ]
}

pub(crate) fn sample_resources() -> Vec<Resource> {
    let today = Local::now().date_naive();
    vec![
        Resource {
            id: "res-001".to_string(),
            kind: "asphalt".to_string(),
            description: "Patching material for sidewalk repairs".to_string(),
            linked_report_ids: vec!["rep-001".to_string(), "rep-007".to_string()],
            status: ResourceStatus::Approved,
            requested_on: today - Duration::days(6),
            approved_on: Some(today - Duration::days(4)),
            fulfilled_on: None,
        },
        Resource {
            id: "res-002".to_string(),
            kind: "saplings".to_string(),
            description: "Native saplings for the square".to_string(),
            linked_report_ids: vec!["rep-002".to_string()],
            status: ResourceStatus::Requested,
            requested_on: today - Duration::days(2),
            approved_on: None,
            fulfilled_on: None,
        },
    ]
}

pub(crate) fn sample_interventions() -> Vec<Intervention> {
    let today = Local::now().date_naive();
    vec![
        Intervention {
            id: InterventionId("int-001".to_string()),
            title: "Curb ramp retrofit along Av. Paulista".to_string(),
            kind: InterventionKind::Ramps,
            description: "Install compliant curb ramps at twelve crossings.".to_string(),
            assigned_department: "dept-accessibility".to_string(),
            linked_report_ids: vec!["rep-001".to_string(), "rep-004".to_string()],
            status: InterventionStatus::InProgress,
            start_date: today - Duration::days(40),
            end_date: today + Duration::days(50),
            budget: 420_000,
            site: InterventionSite {
                lat: -23.5613,
                lng: -46.6565,
                address: "Av. Paulista corridor".to_string(),
                neighborhood: "Bela Vista".to_string(),
            },
            progress: Progress::new(45).expect("seed progress is in range"),
            priority: InterventionPriority::High,
        },
        Intervention {
            id: InterventionId("int-002".to_string()),
            title: "Shade trees for Praca da Republica".to_string(),
            kind: InterventionKind::TreePlanting,
            description: "Plant 80 native trees around the square.".to_string(),
            assigned_department: "dept-parks".to_string(),
            linked_report_ids: vec!["rep-003".to_string()],
            status: InterventionStatus::Completed,
            start_date: today - Duration::days(90),
            end_date: today - Duration::days(5),
            budget: 95_000,
            site: InterventionSite {
                lat: -23.5431,
                lng: -46.6426,
                address: "Praca da Republica".to_string(),
                neighborhood: "Republica".to_string(),
            },
            progress: Progress::new(100).expect("seed progress is in range"),
            priority: InterventionPriority::Medium,
        },
        Intervention {
            id: InterventionId("int-003".to_string()),
            title: "Storm drain upgrade on Av. do Estado".to_string(),
            kind: InterventionKind::Infrastructure,
            description: "Enlarge culverts at the recurring flood point.".to_string(),
            assigned_department: "dept-drainage".to_string(),
            linked_report_ids: Vec::new(),
            status: InterventionStatus::Scheduled,
            start_date: today + Duration::days(15),
            end_date: today + Duration::days(120),
            budget: 1_150_000,
            site: InterventionSite {
                lat: -23.5560,
                lng: -46.6180,
                address: "Av. do Estado, 3000".to_string(),
                neighborhood: "Mooca".to_string(),
            },
            progress: Progress::new(0).expect("seed progress is in range"),
            priority: InterventionPriority::Urgent,
        },
    ]
}
