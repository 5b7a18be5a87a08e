use crate::infra::{bootstrap, connect, parse_date, session_store};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use recruitdesk::analytics::EbesWeights;
use recruitdesk::api::{DateRange, PerformanceFilters};
use recruitdesk::dashboard::{DashboardService, DashboardView};
use recruitdesk::entries::{EntryDetails, EntryService, RecruiterEntry};
use recruitdesk::error::AppError;
use recruitdesk::reports::{export_report, ExportFormat, ReportField};
use recruitdesk::session::SessionStore;
use recruitdesk::{DashboardRole, SessionUser};
use std::path::PathBuf;
use tracing::info;

/// Role and filter selection shared by the fetch commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct ScopeArgs {
    /// Dashboard role: admin, am, recruiter or rm
    #[arg(long, default_value = "am")]
    pub(crate) role: DashboardRole,
    /// Period start (YYYY-MM-DD); requires --end
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Period end (YYYY-MM-DD); requires --start
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) client_id: Option<String>,
    #[arg(long)]
    pub(crate) team_id: Option<String>,
}

impl ScopeArgs {
    pub(crate) fn filters(&self) -> Result<PerformanceFilters, AppError> {
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (None, None) => None,
            _ => {
                return Err(AppError::InvalidInput(
                    "--start and --end must be given together".to_string(),
                ))
            }
        };
        Ok(PerformanceFilters {
            range,
            client_id: self.client_id.clone(),
            team_id: self.team_id.clone(),
        })
    }
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
    /// Print the full dashboard as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
    /// Comma-separated report fields; defaults to every field
    #[arg(long, value_delimiter = ',')]
    pub(crate) fields: Vec<String>,
    /// csv, excel or pdf (printable HTML)
    #[arg(long, default_value = "csv")]
    pub(crate) format: ExportFormat,
    /// Destination file; defaults to the generated report name
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EntryArgs {
    #[command(subcommand)]
    pub(crate) kind: EntryKind,
}

#[derive(Args, Debug)]
pub(crate) struct EntryCommon {
    #[arg(long)]
    pub(crate) role_id: String,
    #[arg(long)]
    pub(crate) candidate: String,
    /// Entry date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum EntryKind {
    /// CV submitted to the client (CV match must be at least 85%)
    Submission {
        #[command(flatten)]
        common: EntryCommon,
        #[arg(long)]
        cv_match: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    Interview {
        #[command(flatten)]
        common: EntryCommon,
        /// Interview round, 1 to 3
        #[arg(long)]
        level: u8,
        #[arg(long, value_parser = parse_date)]
        interview_date: NaiveDate,
    },
    Deal {
        #[command(flatten)]
        common: EntryCommon,
        #[arg(long, value_parser = parse_date)]
        deal_date: Option<NaiveDate>,
        #[arg(long)]
        placement_fee: Option<f64>,
    },
    Dropout {
        #[command(flatten)]
        common: EntryCommon,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long)]
        stage: Option<String>,
    },
}

impl EntryKind {
    fn into_entry(self, today: NaiveDate) -> RecruiterEntry {
        let (common, details) = match self {
            EntryKind::Submission {
                common,
                cv_match,
                notes,
            } => (
                common,
                EntryDetails::Submission {
                    cv_match_percent: cv_match,
                    notes,
                },
            ),
            EntryKind::Interview {
                common,
                level,
                interview_date,
            } => (
                common,
                EntryDetails::Interview {
                    interview_level: level,
                    interview_date,
                },
            ),
            EntryKind::Deal {
                common,
                deal_date,
                placement_fee,
            } => {
                let deal_date = deal_date.or(common.date).unwrap_or(today);
                (
                    common,
                    EntryDetails::Deal {
                        deal_date,
                        placement_fee,
                    },
                )
            }
            EntryKind::Dropout {
                common,
                reason,
                stage,
            } => (
                common,
                EntryDetails::Dropout {
                    dropout_reason: reason,
                    dropout_stage: stage,
                },
            ),
        };

        RecruiterEntry {
            role_id: common.role_id,
            candidate_name: common.candidate,
            entry_date: common.date.unwrap_or(today),
            details,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum SessionCommand {
    /// Store the signed-in user
    Login {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        user_code: String,
        #[arg(long)]
        role: Option<DashboardRole>,
    },
    /// Forget the stored user
    Logout,
    /// Print the stored user
    Show,
}

async fn load_dashboard(scope: &ScopeArgs, base_url: Option<&str>) -> Result<DashboardView, AppError> {
    let config = bootstrap(base_url)?;
    let filters = scope.filters()?;
    let service = DashboardService::new(connect(&config)?, EbesWeights::default(), config.scoring.bands);
    Ok(service.load(scope.role, &filters).await?)
}

pub(crate) async fn run_dashboard(args: DashboardArgs, base_url: Option<&str>) -> Result<(), AppError> {
    let view = load_dashboard(&args.scope, base_url).await?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::InvalidInput(err.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "{} dashboard for {} ({})",
        view.role.label(),
        view.user.name,
        view.user.user_code
    );
    let snapshot = &view.summary.snapshot;
    println!(
        "- {} roles | {} active | {} deals | {} lost | {} on hold | {} no answer",
        snapshot.total_roles,
        snapshot.active_roles,
        snapshot.deal_roles,
        snapshot.lost_roles,
        snapshot.on_hold_roles,
        snapshot.no_answer_roles
    );
    println!(
        "- interviews: {} / {} / {} ({} total)",
        snapshot.interview_1_count,
        snapshot.interview_2_count,
        snapshot.interview_3_count,
        snapshot.interviews()
    );
    for metric in &view.summary.derived {
        println!("  {}: {}", metric.label, metric.display);
    }

    println!("EBES composite: {}", view.summary.score.total);
    for component in &view.summary.score.components {
        println!(
            "  {} x{} -> {}",
            component.category_label, component.count, component.points
        );
    }
    if let Some(ebes) = &view.ebes {
        println!("Reported EBES score: {}", ebes.score);
    }
    match view.performance_label() {
        Some(label) => println!("Performance label: {label}"),
        None => println!("Performance label: N/A"),
    }

    if !view.client_health.is_empty() {
        println!("Client health:");
        for entry in &view.client_health {
            println!(
                "  {} | {} | {} roles-to-deal",
                entry.client_name, entry.health_label, entry.roles_to_deal_conversion
            );
        }
    }
    if !view.teams.is_empty() {
        println!("Teams by deals:");
        for team in &view.teams {
            println!(
                "  {} | {} deals of {} roles",
                team.team_name, team.metrics.deal_roles, team.metrics.total_roles
            );
        }
    }

    Ok(())
}

pub(crate) async fn run_export(args: ExportArgs, base_url: Option<&str>) -> Result<(), AppError> {
    let view = load_dashboard(&args.scope, base_url).await?;
    let fields = if args.fields.is_empty() {
        ReportField::ordered()
            .iter()
            .map(|field| field.key().to_string())
            .collect()
    } else {
        args.fields
    };

    let today = Local::now().date_naive();
    let artifact = export_report(&fields, &view.report_input(), args.format, today)?;
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    std::fs::write(&path, &artifact.body)?;

    info!(path = %path.display(), content_type = %artifact.content_type, "report written");
    println!("Wrote {} ({})", path.display(), artifact.content_type);
    Ok(())
}

pub(crate) async fn run_entry(args: EntryArgs, base_url: Option<&str>) -> Result<(), AppError> {
    let config = bootstrap(base_url)?;
    let entry = args.kind.into_entry(Local::now().date_naive());
    let service = EntryService::new(connect(&config)?);

    let receipt = service.submit(&entry).await?;
    println!(
        "{} logged for {} on role {}",
        entry.details.entry_type().label(),
        entry.candidate_name,
        entry.role_id
    );
    if let Some(message) = receipt.message {
        println!("  {message}");
    }
    Ok(())
}

pub(crate) fn run_session(command: SessionCommand, base_url: Option<&str>) -> Result<(), AppError> {
    let config = bootstrap(base_url)?;
    let store = session_store(&config);

    match command {
        SessionCommand::Login {
            id,
            name,
            email,
            user_code,
            role,
        } => {
            let user = SessionUser {
                id: id.trim().to_string(),
                name,
                email,
                user_code,
                role,
            };
            store.save(&user)?;
            println!("Signed in as {} ({})", user.name, user.id);
        }
        SessionCommand::Logout => {
            store.clear()?;
            println!("Signed out");
        }
        SessionCommand::Show => {
            let user = store.current_user()?;
            println!(
                "{} <{}> id={} code={} role={}",
                user.name,
                user.email,
                user.id,
                user.user_code,
                user.role.map(|role| role.label()).unwrap_or("unset")
            );
        }
    }
    Ok(())
}
