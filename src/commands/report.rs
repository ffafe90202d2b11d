use crate::cli::{Commands, QuestionArgs, ReportArgs};
use crate::config::{load_config, load_config_from_path, SurveymapConfig};
use crate::core::Error;
use crate::engine::{CategoryFilter, QuestionFilter, RangeRequest, RecordFilter, SurveyAnalytics};
use crate::io::output::create_writer;
use crate::io::MemoryStore;
use crate::stats::{parse_boundaries, parse_categories, Category, RangeField, ValueRange};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

/// Run a report command and write its result.
pub fn run_report(command: &Commands) -> Result<()> {
    let args = command
        .report_args()
        .context("Command does not produce a report")?;
    let config = resolve_config(args);
    let store = MemoryStore::load(&args.data)?;
    let analytics = SurveyAnalytics::new(&store, config.engine_settings());

    let (title, report) = compute(&analytics, command)?;
    let format = args.format.unwrap_or(config.output.default_format);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut buffered = BufWriter::new(file);
            create_writer(format, &mut buffered).write_report(title, &report)?;
            buffered.flush()?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            let stdout = std::io::stdout();
            create_writer(format, stdout.lock()).write_report(title, &report)?;
        }
    }
    Ok(())
}

fn resolve_config(args: &ReportArgs) -> SurveymapConfig {
    match &args.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
}

fn to_value<T: Serialize>(report: T) -> Result<Value> {
    Ok(serde_json::to_value(report)?)
}

fn compute(
    analytics: &SurveyAnalytics<'_, MemoryStore>,
    command: &Commands,
) -> Result<(&'static str, Value)> {
    let result = match command {
        Commands::Overview { survey, gets, .. } => {
            let gets = parse_categories(gets)?;
            ("overview", to_value(analytics.compute_overview(*survey, &gets)?)?)
        }
        Commands::ByCategory {
            survey,
            category,
            id,
            top_depts_only,
            ..
        } => {
            let filter = CategoryFilter::new(category.parse()?, *id);
            let report = analytics.compute_by_category(*survey, filter, *top_depts_only)?;
            ("by-category", to_value(report)?)
        }
        Commands::ByCategorySpecific {
            survey,
            category,
            id,
            get_category,
            get_id,
            ..
        } => {
            let filter = CategoryFilter::new(category.parse()?, *id);
            let get = CategoryFilter::new(get_category.parse()?, *get_id);
            let report = analytics.compute_by_category_specific(*survey, filter, get)?;
            ("by-category-specific", to_value(report)?)
        }
        Commands::BySubdepts {
            survey, department, ..
        } => (
            "by-subdepts",
            to_value(analytics.compute_by_subdepartments(*survey, *department)?)?,
        ),
        Commands::ByRange {
            survey,
            field,
            ranges,
            category,
            id,
            more,
            ..
        } => {
            let request = range_request(field, ranges.as_deref(), category.as_deref(), *id, *more)?;
            ("by-range", to_value(analytics.compute_by_range(*survey, &request)?)?)
        }
        Commands::ByQuestion { survey, filter, .. } => {
            let filter = question_filter(filter)?;
            (
                "by-question",
                to_value(analytics.compute_by_question(*survey, &filter)?)?,
            )
        }
        Commands::QuestionChart { survey, filter, .. } => {
            let filter = question_filter(filter)?;
            (
                "question-chart",
                to_value(analytics.compute_question_chart(*survey, &filter)?)?,
            )
        }
        Commands::DeptLevels { survey, .. } => (
            "dept-levels",
            to_value(analytics.compute_department_levels(*survey)?)?,
        ),
        Commands::DeptGenerations {
            survey, department, ..
        } => (
            "dept-generations",
            to_value(analytics.compute_department_generations(*survey, *department)?)?,
        ),
        Commands::Tree { survey, .. } => ("tree", to_value(analytics.department_tree(*survey)?)?),
        Commands::Flat { survey, .. } => ("flat", to_value(analytics.department_flat(*survey)?)?),
        Commands::Init { .. } => anyhow::bail!("init does not produce a report"),
    };
    Ok(result)
}

/// Build a range request from command-line strings.
pub fn range_request(
    field: &str,
    ranges: Option<&str>,
    category: Option<&str>,
    id: Option<i32>,
    more: bool,
) -> crate::core::Result<RangeRequest> {
    let mut request = RangeRequest::new(field.parse::<RangeField>()?);
    request.boundaries = ranges.map(parse_boundaries).transpose()?;
    request.filter = match (category, id) {
        (Some(code), Some(id)) => Some(CategoryFilter::new(code.parse::<Category>()?, id)),
        (Some(code), None) => {
            return Err(Error::invalid_input(format!(
                "Category filter '{}' needs an id",
                code
            )))
        }
        (None, _) => None,
    };
    request.more = more;
    Ok(request)
}

/// Build a question filter from command-line options.
pub fn question_filter(args: &QuestionArgs) -> crate::core::Result<QuestionFilter> {
    let filter = match &args.category {
        None => None,
        Some(code) => {
            let range = match (args.range_lower, args.range_upper) {
                (Some(lower), Some(upper)) => Some(ValueRange::new(lower, upper)),
                (None, None) => None,
                _ => {
                    return Err(Error::invalid_input(
                        "Range filter needs both --range-lower and --range-upper",
                    ))
                }
            };
            Some(RecordFilter::from_code(code, args.id, range)?)
        }
    };
    Ok(QuestionFilter {
        filter,
        dimension_id: args.dimension,
    })
}
