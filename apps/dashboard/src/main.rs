use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    format,
    render::{build_view, page_html, text_summary, ConfigPanel, DashboardView, HeaderWidgets, ViewFilters},
    AnnouncementForm, Dashboard, IdeaForm, SubmitOutcome, WeatherClient,
};
use shared::domain::Priority;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "noem-dashboard")]
#[command(about = "NOEM intranet dashboard: hours, clients and announcements from the shared sheet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch everything and write the dashboard page
    Render {
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Fetch everything and print a text summary
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Rewrite the dashboard page on an interval until interrupted
    Watch {
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Submit an announcement for validation
    Announce {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        text: String,
    },
    /// Submit an idea
    Idea {
        #[arg(long)]
        name: String,
        #[arg(long)]
        idea: String,
        #[arg(long, default_value = "normale")]
        priority: Priority,
    },
    /// Print the weather widget
    Weather,
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Hide hours rows whose text does not contain this
    #[arg(long, default_value = "")]
    search: String,
    /// Only show collaborators whose name contains this
    #[arg(long, default_value = "")]
    collaborator: String,
    /// Only show clients whose name contains this
    #[arg(long, default_value = "")]
    client: String,
}

impl From<FilterArgs> for ViewFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            search: args.search,
            collaborator: args.collaborator,
            client: args.client,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings()?;

    match cli.command {
        Command::Render { out, filters } => {
            let mut dashboard = new_dashboard(&settings)?;
            let view = refreshed_view(&mut dashboard, &settings, &filters.into()).await;
            write_page(&out, &view)?;
            println!("Dashboard written to {}.", out.display());
        }
        Command::Summary { filters } => {
            let mut dashboard = new_dashboard(&settings)?;
            let view = refreshed_view(&mut dashboard, &settings, &filters.into()).await;
            print!("{}", text_summary(&view));
        }
        Command::Watch {
            out,
            interval_secs,
            filters,
        } => {
            let filters: ViewFilters = filters.into();
            let mut dashboard = new_dashboard(&settings)?;
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let view = refreshed_view(&mut dashboard, &settings, &filters).await;
                        match write_page(&out, &view) {
                            Ok(()) => info!(out = %out.display(), "dashboard rewritten"),
                            Err(error) => warn!(%error, "failed to write dashboard"),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupted; stopping watch");
                        break;
                    }
                }
            }
        }
        Command::Announce {
            title,
            author,
            text,
        } => {
            let mut dashboard = new_dashboard(&settings)?;
            let outcome = dashboard
                .submit_announcement(AnnouncementForm {
                    title,
                    author,
                    text,
                })
                .await;
            report_submission(&dashboard, outcome, "title, author and text are required")?;
        }
        Command::Idea {
            name,
            idea,
            priority,
        } => {
            let mut dashboard = new_dashboard(&settings)?;
            let outcome = dashboard
                .submit_idea(IdeaForm {
                    name,
                    idea,
                    priority,
                })
                .await;
            report_submission(&dashboard, outcome, "name and idea are required")?;
        }
        Command::Weather => {
            println!("{}", settings.weather().widget().await.label());
        }
        Command::Config => {
            print!("{}", settings.to_toml()?);
        }
    }

    Ok(())
}

fn new_dashboard(settings: &Settings) -> Result<Dashboard> {
    Ok(Dashboard::new(
        settings.sheet_source()?,
        settings.webhook(),
        settings.ranges(),
    ))
}

async fn refreshed_view(
    dashboard: &mut Dashboard,
    settings: &Settings,
    filters: &ViewFilters,
) -> DashboardView {
    let weather: WeatherClient = settings.weather();
    let (report, widget) = tokio::join!(dashboard.fetch_all(), weather.widget());
    info!(
        hours_ok = report.hours_ok,
        announcements_ok = report.announcements_ok,
        "refresh settled"
    );

    let header = HeaderWidgets {
        clock: format::clock(&Local::now()),
        weather: widget.label(),
    };
    let config = ConfigPanel::new(&settings.sheet_id, &settings.api_key, &settings.webhook_url);
    build_view(&dashboard.state, filters, header, config)
}

fn write_page(out: &Path, view: &DashboardView) -> Result<()> {
    std::fs::write(out, page_html(view))
        .with_context(|| format!("failed to write dashboard to '{}'", out.display()))
}

fn report_submission(dashboard: &Dashboard, outcome: SubmitOutcome, rejected: &str) -> Result<()> {
    if outcome == SubmitOutcome::Rejected {
        bail!("submission rejected: {rejected}");
    }
    for message in dashboard.state.notifications.iter() {
        println!("{message}");
    }
    if outcome == SubmitOutcome::Failed {
        bail!("webhook did not accept the submission");
    }
    Ok(())
}
