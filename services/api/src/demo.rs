use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use recruitdesk::analytics::{
    client_health, rank_teams, ClientMetrics, DashboardSummary, EbesWeights, MetricSnapshot,
    TeamMetrics,
};
use recruitdesk::entries::{validate_entry, EntryDetails, RecruiterEntry};
use recruitdesk::error::AppError;
use recruitdesk::reports::{export_report, ExportFormat, ReportIdentity, ReportInput};
use recruitdesk::DashboardRole;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the report date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also write the CSV, Excel and printable HTML exports into this directory.
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let current = sample_quarter();
    let previous = MetricSnapshot {
        total_roles: 32,
        active_roles: 14,
        deal_roles: 6,
        lost_roles: 4,
        interview_1_count: 22,
        interview_2_count: 9,
        interview_3_count: 4,
        ..MetricSnapshot::default()
    };

    println!("Recruitment dashboard demo ({today})");
    let summary = DashboardSummary::build(current, Some(&previous), &EbesWeights::default(), None);
    for metric in &summary.derived {
        println!("- {}: {}", metric.label, metric.display);
    }
    println!("EBES composite score: {}", summary.score.total);
    for entry in summary.growth.iter().filter(|entry| entry.previous > 0 || entry.current > 0) {
        println!(
            "  {} {} -> {} ({})",
            entry.label, entry.previous, entry.current, entry.growth
        );
    }

    let clients = sample_clients();
    println!("\nClient health");
    for entry in client_health(&clients) {
        println!(
            "- {}: {} ({} roles-to-deal)",
            entry.client_name, entry.health_label, entry.roles_to_deal_conversion
        );
    }
    println!("Teams by deals");
    for team in rank_teams(sample_teams()) {
        println!("- {}: {} deals", team.team_name, team.metrics.deal_roles);
    }

    let input = ReportInput {
        role: DashboardRole::AccountManager,
        user: ReportIdentity {
            name: "Demo Account Manager".to_string(),
            user_code: "AM-00".to_string(),
            email: "demo@recruitdesk.local".to_string(),
        },
        snapshot: current,
        teams: sample_teams().into_iter().map(|team| team.team_name).collect(),
        clients: clients.iter().map(|client| client.client_name.clone()).collect(),
        score: None,
    };
    let fields = ["user_details", "total_roles", "deals", "roles_to_deal_conversion", "drop_off"];
    let csv = export_report(&fields, &input, ExportFormat::Csv, today)?;
    println!("\nCSV export {}:\n{}", csv.file_name, csv.body);

    if let Some(dir) = args.output_dir {
        std::fs::create_dir_all(&dir)?;
        for format in [ExportFormat::Csv, ExportFormat::Excel, ExportFormat::Pdf] {
            let artifact = export_report(&fields, &input, format, today)?;
            let path = dir.join(format!(
                "{}-{}",
                format_slug(format),
                artifact.file_name
            ));
            std::fs::write(&path, &artifact.body)?;
            println!("Wrote {} ({})", path.display(), artifact.content_type);
        }
    }

    println!("\nRecruiter entry checks");
    for cv_match_percent in [84.5, 85.0] {
        let entry = RecruiterEntry {
            role_id: "role-demo".to_string(),
            candidate_name: "Sample Candidate".to_string(),
            entry_date: today,
            details: EntryDetails::Submission {
                cv_match_percent,
                notes: None,
            },
        };
        match validate_entry(&entry) {
            Ok(()) => println!("- {cv_match_percent}% CV match: accepted"),
            Err(err) => println!("- {cv_match_percent}% CV match: rejected ({err})"),
        }
    }

    Ok(())
}

fn format_slug(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Excel => "excel",
        ExportFormat::Pdf => "print",
    }
}

fn sample_quarter() -> MetricSnapshot {
    MetricSnapshot {
        total_roles: 40,
        active_roles: 18,
        deal_roles: 9,
        lost_roles: 3,
        on_hold_roles: 4,
        cancelled_roles: 1,
        no_answer_roles: 2,
        interview_1_count: 26,
        interview_2_count: 13,
        interview_3_count: 6,
        total_interviews: 45,
    }
}

fn sample_clients() -> Vec<ClientMetrics> {
    vec![
        ClientMetrics {
            client_name: "Northwind Traders".to_string(),
            metrics: MetricSnapshot {
                total_roles: 18,
                deal_roles: 6,
                interview_1_count: 12,
                ..MetricSnapshot::default()
            },
        },
        ClientMetrics {
            client_name: "Contoso".to_string(),
            metrics: MetricSnapshot {
                total_roles: 15,
                deal_roles: 2,
                interview_1_count: 9,
                ..MetricSnapshot::default()
            },
        },
        ClientMetrics {
            client_name: "Fabrikam".to_string(),
            metrics: MetricSnapshot {
                total_roles: 7,
                ..MetricSnapshot::default()
            },
        },
    ]
}

fn sample_teams() -> Vec<TeamMetrics> {
    vec![
        TeamMetrics {
            team_name: "Finance".to_string(),
            metrics: MetricSnapshot {
                total_roles: 12,
                deal_roles: 2,
                ..MetricSnapshot::default()
            },
        },
        TeamMetrics {
            team_name: "Technology".to_string(),
            metrics: MetricSnapshot {
                total_roles: 28,
                deal_roles: 7,
                ..MetricSnapshot::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_offline_and_writes_every_format() {
        let dir = std::env::temp_dir().join(format!(
            "recruitdesk-demo-{}",
            std::process::id()
        ));
        run_demo(DemoArgs {
            today: Some(parse_date("2026-10-16").expect("date")),
            output_dir: Some(dir.clone()),
        })
        .expect("demo runs");

        let csv = std::fs::read_to_string(dir.join("csv-am-report-2026-10-16.csv"))
            .expect("csv written");
        assert!(csv.starts_with("Name,User Code,Email,Total Roles,Deals"));
        assert!(dir.join("excel-am-report-2026-10-16.csv").exists());
        assert!(dir.join("print-am-report-2026-10-16.html").exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
