use crate::io::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "surveymap")]
#[command(about = "Survey statistics by department, role, generation and more", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// JSON snapshot holding surveys, departments, responders and responses
    #[arg(short, long, env = "SURVEYMAP_DATA")]
    pub data: PathBuf,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .surveymap.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Optional record filter for per-question reports.
#[derive(Args, Debug, Clone, Default)]
pub struct QuestionArgs {
    /// Filter category (dims, dept, role, gnra, gender, age, birth, service)
    #[arg(long)]
    pub category: Option<String>,

    /// Id to match for a category filter
    #[arg(long)]
    pub id: Option<i32>,

    /// Inclusive lower bound for a range filter
    #[arg(long = "range-lower", allow_negative_numbers = true)]
    pub range_lower: Option<i64>,

    /// Exclusive upper bound for a range filter
    #[arg(long = "range-upper", allow_negative_numbers = true)]
    pub range_upper: Option<i64>,

    /// Only questions of this dimension
    #[arg(long = "dimension", allow_negative_numbers = true)]
    pub dimension: Option<i32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Survey-wide statistics with optional breakdowns
    Overview {
        #[command(flatten)]
        args: ReportArgs,

        /// Survey id
        survey: i32,

        /// Breakdowns to include (comma-separated: dims, dept, role, gnra, gender)
        #[arg(long, default_value = "")]
        gets: String,
    },

    /// Statistics for one category value, broken down by the others
    ByCategory {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        /// Category to filter by (dims, dept, role, gnra, gender)
        #[arg(long)]
        category: String,

        #[arg(long, allow_negative_numbers = true)]
        id: i32,

        /// Restrict the department breakdown to root departments
        #[arg(long = "top-depts-only")]
        top_depts_only: bool,
    },

    /// One breakdown entry within a category value
    ByCategorySpecific {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        #[arg(long)]
        category: String,

        #[arg(long, allow_negative_numbers = true)]
        id: i32,

        /// Breakdown category to read the entry from
        #[arg(long = "get-category")]
        get_category: String,

        /// Id of the breakdown entry
        #[arg(long = "get-id", allow_negative_numbers = true)]
        get_id: i32,
    },

    /// Rolled-up statistics of a department and its direct sub-departments
    BySubdepts {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        /// Department id
        department: i32,
    },

    /// Statistics bucketed by age, birth year or service months
    ByRange {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        /// Field to bucket (age, birth, service)
        #[arg(long)]
        field: String,

        /// Boundary list such as "0,30,60" (defaults to the configured ranges)
        #[arg(long, allow_hyphen_values = true)]
        ranges: Option<String>,

        /// Optional category filter (dims, dept, role, gnra, gender)
        #[arg(long, requires = "id")]
        category: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        id: Option<i32>,

        /// Add dimension, role and gender breakdowns per range
        #[arg(long)]
        more: bool,
    },

    /// Per-question statistics
    ByQuestion {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        #[command(flatten)]
        filter: QuestionArgs,
    },

    /// Per-question statistics grouped by dimension
    QuestionChart {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        #[command(flatten)]
        filter: QuestionArgs,
    },

    /// Statistics per department at each configured tree level
    DeptLevels {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,
    },

    /// A department subtree sliced by generation
    DeptGenerations {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,

        department: i32,
    },

    /// Nested department tree of the survey's project
    Tree {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,
    },

    /// Flat department list of the survey's project
    Flat {
        #[command(flatten)]
        args: ReportArgs,

        survey: i32,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Shared report options, absent for `init`.
    pub fn report_args(&self) -> Option<&ReportArgs> {
        match self {
            Commands::Overview { args, .. }
            | Commands::ByCategory { args, .. }
            | Commands::ByCategorySpecific { args, .. }
            | Commands::BySubdepts { args, .. }
            | Commands::ByRange { args, .. }
            | Commands::ByQuestion { args, .. }
            | Commands::QuestionChart { args, .. }
            | Commands::DeptLevels { args, .. }
            | Commands::DeptGenerations { args, .. }
            | Commands::Tree { args, .. }
            | Commands::Flat { args, .. } => Some(args),
            Commands::Init { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_overview() {
        let cli = Cli::parse_from([
            "surveymap",
            "overview",
            "--data",
            "snapshot.json",
            "--gets",
            "dims,dept",
            "3",
        ]);
        match cli.command {
            Commands::Overview { args, survey, gets } => {
                assert_eq!(args.data, PathBuf::from("snapshot.json"));
                assert_eq!(survey, 3);
                assert_eq!(gets, "dims,dept");
                assert_eq!(args.format, None);
            }
            _ => panic!("Expected Overview command"),
        }
    }

    #[test]
    fn test_cli_parsing_by_range() {
        let cli = Cli::parse_from([
            "surveymap",
            "by-range",
            "-d",
            "s.json",
            "1",
            "--field",
            "age",
            "--ranges",
            "0,30,60",
            "--more",
            "-f",
            "terminal",
            "-vv",
        ]);
        match cli.command {
            Commands::ByRange {
                args,
                field,
                ranges,
                more,
                ..
            } => {
                assert_eq!(field, "age");
                assert_eq!(ranges.as_deref(), Some("0,30,60"));
                assert!(more);
                assert_eq!(args.format, Some(OutputFormat::Terminal));
                assert_eq!(args.verbosity, 2);
            }
            _ => panic!("Expected ByRange command"),
        }
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(["surveymap", "init", "--force"]);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
        assert!(Cli::parse_from(["surveymap", "init"])
            .command
            .report_args()
            .is_none());
    }

    #[test]
    fn test_by_range_category_requires_id() {
        let result = Cli::try_parse_from([
            "surveymap",
            "by-range",
            "-d",
            "s.json",
            "1",
            "--field",
            "age",
            "--category",
            "role",
        ]);
        assert!(result.is_err());
    }
}
