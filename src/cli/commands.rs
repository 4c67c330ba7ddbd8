use crate::analyzers::{AnalysisReport, FireAnalyzer, GroupKey};
use crate::cli::args::{Cli, Commands, DirectoryArgs};
use crate::config::Settings;
use crate::models::{FireRecord, MunicipalityDirectory};
use crate::processors::enrich;
use crate::readers::{DirectoryClient, LoadOutcome, RecordReader};
use crate::utils::filename::generate_default_output_dir;
use crate::utils::progress::ProgressReporter;
use crate::writers::{BarChart, Boundary, Chart, ChartWriter, HeatMap, LineChart, PieChart, PointMap};
use anyhow::{anyhow, Context};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn, Level};
use validator::Validate;

/// Slices shown in the biome pie before the rest are folded together
const MAX_PIE_SLICES: usize = 6;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let quiet = cli.quiet;
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Report {
            input,
            output_dir,
            format,
            top_n,
            directory,
            boundary,
            hex_size,
        } => {
            if let Some(top_n) = top_n {
                settings.top_n = top_n;
            }
            if let Some(hex_size) = hex_size {
                settings.hex_size = hex_size;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if output_dir.is_some() {
                settings.output_dir = output_dir;
            }
            settings.validate().context("Invalid report options")?;

            let boundary = boundary
                .map(|path| {
                    Boundary::from_geojson_file(&path)
                        .with_context(|| format!("Failed to read boundary {}", path.display()))
                })
                .transpose()?;

            let outcome = load_input(&input, quiet)?;
            let records = resolve_names(outcome.records, &directory, &settings, quiet).await?;

            let analysis = FireAnalyzer::new()
                .with_top_n(settings.top_n)
                .with_hex_size(settings.hex_size)
                .analyze(&records)
                .context("No fire records left to report on")?;

            let output_dir = settings
                .output_dir
                .clone()
                .unwrap_or_else(generate_default_output_dir);
            let writer = ChartWriter::new(&output_dir)
                .with_format(settings.format)
                .with_size(settings.chart_width, settings.chart_height);

            let written = render_charts(&writer, &analysis, boundary, quiet)?;

            println!("\n{}", analysis.statistics.summary());
            println!("\n{}", outcome.report.summary());
            println!(
                "\nWrote {} charts to {}",
                written.len(),
                writer.output_dir().display()
            );
        }

        Commands::Summary {
            input,
            top_n,
            directory,
        } => {
            if let Some(top_n) = top_n {
                settings.top_n = top_n;
            }
            settings.validate().context("Invalid summary options")?;

            let outcome = load_input(&input, quiet)?;
            let records = resolve_names(outcome.records, &directory, &settings, quiet).await?;

            let analysis = FireAnalyzer::new()
                .with_top_n(settings.top_n)
                .with_hex_size(settings.hex_size)
                .analyze(&records)
                .context("No fire records left to summarize")?;

            println!("\n{}", analysis.detailed_summary());
            println!("\n{}", outcome.report.summary());
        }

        Commands::Validate { input } => {
            let outcome = load_input(&input, quiet)?;

            println!("\n{}", outcome.report.summary());

            if outcome.report.has_issues() {
                println!(
                    "⚠️  {} of {} rows skipped",
                    outcome.report.skipped_count(),
                    outcome.report.total_rows
                );
            } else {
                println!("✅ All rows passed validation checks");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn load_input(input: &Path, quiet: bool) -> anyhow::Result<LoadOutcome> {
    let progress = ProgressReporter::new_spinner(
        &format!("Loading {}...", input.display()),
        quiet,
    );

    let outcome = RecordReader::new()
        .load_records(input)
        .with_context(|| format!("Failed to load fire records from {}", input.display()))?;

    progress.finish_with_message(&format!(
        "Loaded {} records ({} skipped)",
        outcome.records.len(),
        outcome.report.skipped_count()
    ));
    Ok(outcome)
}

async fn load_directory(
    directory: &DirectoryArgs,
    settings: &Settings,
    quiet: bool,
) -> anyhow::Result<MunicipalityDirectory> {
    if directory.skip_directory {
        info!("municipality directory skipped");
        return Ok(MunicipalityDirectory::new());
    }

    if let Some(ref path) = directory.directory_file {
        return MunicipalityDirectory::from_json_file(path)
            .with_context(|| format!("Failed to read directory file {}", path.display()));
    }

    let progress = ProgressReporter::new_spinner("Fetching municipality directory...", quiet);
    let client = DirectoryClient::new(settings.directory_url.as_str())
        .with_max_attempts(settings.max_attempts)
        .with_retry_backoff(Duration::from_millis(settings.retry_backoff_ms));

    let fetched = client
        .fetch_directory()
        .await
        .with_context(|| format!("Failed to fetch municipality directory from {}", client.url()))?;

    progress.finish_with_message(&format!("Fetched {} municipality names", fetched.len()));
    Ok(fetched)
}

async fn resolve_names(
    records: Vec<FireRecord>,
    directory: &DirectoryArgs,
    settings: &Settings,
    quiet: bool,
) -> anyhow::Result<Vec<FireRecord>> {
    let lookup = load_directory(directory, settings, quiet).await?;
    if lookup.is_empty() {
        return Ok(records);
    }

    let (records, join_report) = enrich(records, &lookup);
    if join_report.unresolved > 0 {
        warn!(
            unknown_ids = join_report.unresolved_ids.len(),
            records = join_report.unresolved,
            "some municipality ids are not in the directory"
        );
    }
    info!("{}", join_report.summary());
    Ok(records)
}

fn render_charts(
    writer: &ChartWriter,
    analysis: &AnalysisReport,
    boundary: Option<Boundary>,
    quiet: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let progress = ProgressReporter::new_spinner("Rendering charts...", quiet);

    let mut written = Vec::new();
    write_chart(
        writer,
        &progress,
        &mut written,
        &BarChart::from_municipalities(
            "Municipalities with most fire foci",
            &analysis.top_municipalities,
        ),
        "top_municipios",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &BarChart::from_groups(
            "States with most fire foci",
            GroupKey::State.display_name(),
            &analysis.top_states,
        ),
        "top_estados",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &PieChart::from_groups("Fire foci by biome", &analysis.biomes, MAX_PIE_SLICES),
        "biomas",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &LineChart::from_years("Fire foci per year", &analysis.by_year),
        "focos_por_ano",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &BarChart::from_months("Months with most fire foci", &analysis.by_month),
        "focos_por_mes",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &BarChart::from_hours("Hours with most fire foci", &analysis.by_hour),
        "focos_por_hora",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &BarChart::from_state_variance(
            "Summed year-over-year change by state",
            &analysis.state_variance,
        ),
        "variacao_anual_estados",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &HeatMap::new(
            "Fire foci density",
            analysis.hex_cells.clone(),
            analysis.hex_size,
        )
        .with_boundary(boundary.clone()),
        "mapa_calor",
    )?;
    write_chart(
        writer,
        &progress,
        &mut written,
        &PointMap::new("Most frequent centroids", analysis.top_centroids.clone())
            .with_boundary(boundary),
        "mapa_centroides",
    )?;

    progress.finish_with_message(&format!("Rendered {} charts", written.len()));
    Ok(written)
}

fn write_chart<C: Chart>(
    writer: &ChartWriter,
    progress: &ProgressReporter,
    written: &mut Vec<PathBuf>,
    chart: &C,
    name: &str,
) -> anyhow::Result<()> {
    progress.set_message(&format!("Rendering {}...", chart.title()));
    written.push(writer.write(chart, name)?);
    Ok(())
}
