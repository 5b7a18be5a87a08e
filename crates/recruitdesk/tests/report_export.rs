use chrono::NaiveDate;
use recruitdesk::analytics::MetricSnapshot;
use recruitdesk::reports::{
    export_report, ExportFormat, ReportIdentity, ReportInput, ReportScore, ReportTable,
};
use recruitdesk::DashboardRole;

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
}

fn report(snapshot: MetricSnapshot) -> ReportInput {
    ReportInput {
        role: DashboardRole::RecruitmentManager,
        user: ReportIdentity {
            name: "Ola Nordmann".to_string(),
            user_code: "RM-02".to_string(),
            email: "ola@agency.io".to_string(),
        },
        snapshot,
        teams: vec!["Engineering".to_string(), "Sales".to_string()],
        clients: vec!["Hooli".to_string()],
        score: None,
    }
}

#[test]
fn csv_export_of_roles_and_deals() {
    let snapshot: MetricSnapshot =
        serde_json::from_str(r#"{"total_roles": 7, "total_deals": 3}"#).expect("snapshot");

    let artifact = export_report(
        &["total_roles", "deals"],
        &report(snapshot),
        ExportFormat::Csv,
        generated_on(),
    )
    .expect("exported");

    assert_eq!(artifact.body, "Total Roles,Deals\n7,3");
    assert_eq!(artifact.file_name, "rm-report-2026-10-16.csv");
}

#[test]
fn conversion_renders_one_decimal_or_bare_zero() {
    let busy = MetricSnapshot {
        total_roles: 50,
        deal_roles: 10,
        ..MetricSnapshot::default()
    };
    let fields = ["roles_to_deal_conversion"];

    let with_roles = export_report(&fields, &report(busy), ExportFormat::Csv, generated_on())
        .expect("exported");
    let without_roles = export_report(
        &fields,
        &report(MetricSnapshot::default()),
        ExportFormat::Csv,
        generated_on(),
    )
    .expect("exported");

    assert_eq!(with_roles.body, "Roles to Deal Conversion\n20.0%");
    assert_eq!(without_roles.body, "Roles to Deal Conversion\n0%");
}

#[test]
fn headers_and_values_align_for_every_selection() {
    let snapshot = MetricSnapshot {
        total_roles: 30,
        active_roles: 11,
        deal_roles: 6,
        lost_roles: 3,
        interview_1_count: 14,
        interview_2_count: 7,
        interview_3_count: 2,
        ..MetricSnapshot::default()
    };
    let mut input = report(snapshot);
    input.score = Some(ReportScore {
        score: 104.5,
        performance_label: "Excellent".to_string(),
    });
    let keys = [
        "user_details",
        "teams",
        "clients",
        "interviews",
        "interview_conversion",
        "drop_off",
        "ebes_score",
        "no_such_field",
        "active_roles",
    ];

    for end in 0..=keys.len() {
        let table = ReportTable::build(&keys[..end], &input);
        assert_eq!(table.headers.len(), table.cells.len(), "prefix {end}");
    }

    let artifact = export_report(&keys, &input, ExportFormat::Csv, generated_on())
        .expect("exported");
    let mut lines = artifact.body.lines();
    let header = lines.next().expect("header line");
    let values = lines.next().expect("value line");
    assert!(lines.next().is_none());
    assert_eq!(
        header,
        "Name,User Code,Email,Teams,Clients,Interview 1,Interview 2,Interview 3,\
Interview 1 to 2 Conversion,Interview 2 to 3 Conversion,Loss Rate,No Answer Rate,\
EBES Score,Performance Label,Active Roles"
    );
    assert_eq!(
        values,
        "\"Ola Nordmann\",RM-02,ola@agency.io,\"Engineering, Sales\",\"Hooli\",14,7,2,\
50.0%,28.6%,10.0%,0.0%,104.5,Excellent,11"
    );
}

#[test]
fn excel_and_print_modes_share_the_row() {
    let snapshot = MetricSnapshot {
        total_roles: 4,
        ..MetricSnapshot::default()
    };
    let input = report(snapshot);

    let excel = export_report(&["total_roles"], &input, ExportFormat::Excel, generated_on())
        .expect("excel");
    let printable = export_report(&["total_roles"], &input, ExportFormat::Pdf, generated_on())
        .expect("printable");

    assert_eq!(excel.content_type, "application/vnd.ms-excel");
    assert!(excel.body.ends_with("\n\nTotal Roles\n4"));
    assert!(excel
        .body
        .starts_with("Recruitment Manager Performance Report - 2026-10-16"));

    assert_eq!(printable.file_name, "rm-report-2026-10-16.html");
    assert!(printable.body.contains("<body onload=\"window.print()\">"));
    assert!(printable.body.contains("<th>Total Roles</th>"));
    assert!(printable.body.contains("<td>4</td>"));
    assert!(printable.body.contains("Ola Nordmann (RM-02)"));
}
