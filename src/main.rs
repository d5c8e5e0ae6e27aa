mod analyze;
mod metrics;
mod model;
mod report;
mod teamcity;
mod utils;

use crate::analyze::Analyzer;
use crate::metrics::{StageMetrics, StageProgress, TeamMetrics};
use crate::model::{Result, Team};
use crate::report::graphite::read_metric_lines;
use crate::report::{
    AnalysisReport, GraphiteFeed, MarkdownReport, MetricsCsv, ANALYSIS_REPORT, GRAPHITE_DATA,
    METRICS_CSV,
};
use crate::teamcity::{BuildCountQuery, TeamCityClient};
use crate::utils::{init_tracing, MultiProgressNew, ProgressStyleTemplate};
use chrono::{DateTime, Local, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::MultiProgress;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

const CHECK_NAME: &str = "CIStageMetrics";

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Stage pass/fail metrics and health analysis from TeamCity")]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Emit logs as JSON lines
    #[arg(long = "log_json", global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Query TeamCity and append every team to the report files
    Gather(RunArgs),
    /// Wipe the report files, gather again and print the feed as scheme metrics
    Collect {
        #[command(flatten)]
        run: RunArgs,
        /// Metric naming scheme, prepended to every metric
        #[arg(short = 's', long = "scheme")]
        scheme: Option<String>,
    },
}

#[derive(ClapArgs, Debug, Clone)]
struct RunArgs {
    #[arg(long = "teams", default_value = "teams.json")]
    teams_path: String,
    #[arg(long = "output_dir", default_value = ".")]
    output_dir: PathBuf,
    #[arg(long = "ci_url", env = "CI_URL")]
    ci_url: String,
    #[arg(long = "ci_user", env = "CI_USER")]
    ci_user: String,
    #[arg(long = "ci_password", env = "CI_PASSWORD", hide_env_values = true)]
    ci_password: String,
    #[arg(long = "timeout_secs", default_value_t = 30)]
    timeout_secs: u64,
    /// Also write a markdown report per team
    #[arg(long = "markdown")]
    markdown: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);

    match &args.command {
        Command::Gather(run_args) => match gather(run_args).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "metrics run aborted");
                ExitCode::FAILURE
            }
        },
        Command::Collect { run, scheme } => {
            let scheme = scheme.clone().unwrap_or_else(default_scheme);
            collect(run, &scheme).await
        }
    }
}

async fn gather(args: &RunArgs) -> Result<()> {
    let teams = Team::from_config(&args.teams_path)?;
    info!(path = %args.teams_path, teams = teams.len(), "loaded team configuration");

    let client = TeamCityClient::new(
        &args.ci_url,
        &args.ci_user,
        &args.ci_password,
        Duration::from_secs(args.timeout_secs),
    )?;
    fs::create_dir_all(&args.output_dir)?;
    let output = ReportOutput {
        dir: args.output_dir.clone(),
        markdown: args.markdown,
        generated_at: Local::now(),
    };
    report_teams(&teams, &client, &output).await
}

/// Monitoring-check exit codes: 1 with a WARNING when gathering fails, 3 when the feed is unreadable.
async fn collect(args: &RunArgs, scheme: &str) -> ExitCode {
    if let Err(e) = report::remove_outputs(&args.output_dir) {
        println!("{CHECK_NAME} UNKNOWN: could not remove previous reports: {e}");
        return ExitCode::from(3);
    }
    if let Err(e) = gather(args).await {
        error!(error = %e, "metrics run aborted");
        println!("{CHECK_NAME} WARNING: metrics gathering failed to run: {e}");
        return ExitCode::from(1);
    }
    match read_metric_lines(&args.output_dir, scheme, Utc::now().timestamp()) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{CHECK_NAME} UNKNOWN: {e}");
            ExitCode::from(3)
        }
    }
}

struct ReportOutput {
    dir: PathBuf,
    markdown: bool,
    generated_at: DateTime<Local>,
}

/// Teams are processed strictly one after another; the first failure stops the run.
async fn report_teams(
    teams: &[Team],
    query: &impl BuildCountQuery,
    output: &ReportOutput,
) -> Result<()> {
    let multi_progress = MultiProgress::default();
    let mut analysis_report = AnalysisReport::new(output.dir.join(ANALYSIS_REPORT));

    for team in teams {
        let team_metrics = gather_team(team, query, &multi_progress).await?;
        team_metrics.append_csv(&output.dir.join(METRICS_CSV))?;
        team_metrics.append_feed(&output.dir.join(GRAPHITE_DATA))?;

        let analysis = team_metrics.analyze();
        analysis_report.append(&analysis)?;
        if output.markdown {
            let path = team_metrics.report_create(&analysis, &output.dir, &output.generated_at)?;
            info!(team = %team.name, path = %path.display(), "markdown report written");
        }
        info!(
            team = %team.name,
            stages = team_metrics.stages.len(),
            well = analysis.well.len(),
            needs_improvement = analysis.needs_improvement.len(),
            "team reported"
        );
    }
    Ok(())
}

async fn gather_team(
    team: &Team,
    query: &impl BuildCountQuery,
    multi_progress: &MultiProgress,
) -> Result<TeamMetrics> {
    let pb = multi_progress.add_team_bar(&team.name, team.stages.len());

    let progress_pb = pb.clone();
    let team_name = team.name.clone();
    let progress: StageProgress = Box::new(move |stage: &StageMetrics| {
        progress_pb.set_message(format!("{team_name}: {}", stage.stage_name));
        progress_pb.inc(1);
    });

    match TeamMetrics::gather(team, query, progress).await {
        Ok(team_metrics) => {
            pb.set_style(ProgressStyleTemplate::only_message());
            pb.finish_with_message(format!(
                "✅ {} ({} stages gathered)",
                team.name,
                team_metrics.stages.len()
            ));
            Ok(team_metrics)
        }
        Err(e) => {
            pb.abandon_with_message(format!("❌ {}", team.name));
            Err(e)
        }
    }
}

fn default_scheme() -> String {
    format!("{}.ci_analysis", hostname())
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fakes::FakeCounts;
    use crate::model::{StageBuilds, StageKey};
    use std::path::Path;

    fn team(name: &str, stages: &[(StageKey, &str)]) -> Team {
        let mut builds = StageBuilds::new();
        for (stage, build_id) in stages {
            builds.insert(*stage, vec![build_id.to_string()]);
        }
        Team::new(name, builds)
    }

    fn output(dir: &Path) -> ReportOutput {
        ReportOutput {
            dir: dir.to_path_buf(),
            markdown: false,
            generated_at: Local::now(),
        }
    }

    #[tokio::test]
    async fn writes_every_report_per_team() {
        let dir = tempfile::tempdir().unwrap();
        let teams = vec![
            team(
                "ACA",
                &[
                    (StageKey::Acceptance, "aca_accept"),
                    (StageKey::Commit, "aca_commit"),
                ],
            ),
            team("PCAL", &[(StageKey::Commit, "bt102")]),
        ];
        let query = FakeCounts::new()
            .with("aca_commit", 95, 5, 0)
            .with("aca_accept", 3, 1, 0)
            .with("bt102", 9, 1, 0);

        report_teams(&teams, &query, &output(dir.path())).await.unwrap();

        let csv = fs::read_to_string(dir.path().join(METRICS_CSV)).unwrap();
        assert!(csv.starts_with("ACA,Commit Stage,Acceptance Stage\nPass,95 - 95.0%,3 - 75.0%\n"));
        assert!(csv.contains("\n\n\nPCAL,Commit Stage\n"));

        let feed = fs::read_to_string(dir.path().join(GRAPHITE_DATA)).unwrap();
        assert_eq!(
            feed,
            "ACA,Commit Stage,Acceptance Stage\nPass,95.0,75.0\nPCAL,Commit Stage\nPass,90.0\n"
        );

        let analysis = fs::read_to_string(dir.path().join(ANALYSIS_REPORT)).unwrap();
        assert_eq!(analysis.matches("NOTE: TC keeps build data").count(), 1);
        assert!(analysis.contains(
            "Team Name: ACA\nWell\n  - Commit Stage: aggregate stage with high success rate, above 90% success rate [95.0%]\n"
        ));
        assert!(analysis.contains(
            "Team Name: PCAL\nWell\nNeeds Improvement\n  - Stages are missing\n"
        ));
    }

    #[tokio::test]
    async fn failing_team_stops_later_teams() {
        let dir = tempfile::tempdir().unwrap();
        let teams = vec![
            team("ONB", &[(StageKey::Commit, "ok")]),
            team("REC", &[(StageKey::Commit, "down")]),
            team("ACA", &[(StageKey::Commit, "ok")]),
        ];
        let query = FakeCounts::new().with("ok", 1, 0, 0).broken("down");

        assert!(report_teams(&teams, &query, &output(dir.path()))
            .await
            .is_err());

        let feed = fs::read_to_string(dir.path().join(GRAPHITE_DATA)).unwrap();
        assert_eq!(feed, "ONB,Commit Stage\nPass,100.0\n");
        let analysis = fs::read_to_string(dir.path().join(ANALYSIS_REPORT)).unwrap();
        assert!(!analysis.contains("REC"));
        assert!(!analysis.contains("ACA"));
    }

    #[tokio::test]
    async fn markdown_reports_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let teams = vec![team("ACA", &[(StageKey::Commit, "c")])];
        let query = FakeCounts::new().with("c", 1, 0, 0);
        let mut output = output(dir.path());
        output.markdown = true;

        report_teams(&teams, &query, &output).await.unwrap();

        assert!(dir.path().join("aca.md").exists());
    }

    #[test]
    fn default_scheme_ends_with_check_suffix() {
        assert!(default_scheme().ends_with(".ci_analysis"));
        assert!(!hostname().is_empty());
    }

    #[test]
    fn cli_parses_collect() {
        let args = Args::try_parse_from([
            "ci-stage-metrics",
            "collect",
            "--ci_url",
            "https://ci.example.int",
            "--ci_user",
            "svc",
            "--ci_password",
            "secret",
            "-s",
            "host.ci",
        ])
        .unwrap();
        let Command::Collect { run, scheme } = args.command else {
            panic!("expected collect");
        };
        assert_eq!(scheme.as_deref(), Some("host.ci"));
        assert_eq!(run.teams_path, "teams.json");
        assert_eq!(run.timeout_secs, 30);
        assert!(!run.markdown);
    }
}
