use crate::core::{Metric, Platform};
use crate::formatting::ColorMode;
use crate::io::OutputFormat;
use crate::pipeline::{ImpactFilter, SortDirection, SortField, YearFilter};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "engagemap")]
#[command(about = "Engagement analytics for TikTok and Instagram post statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding data_<platform>.json and artist_stats.json
    #[arg(long, global = true, env = "ENGAGEMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Platform whose documents are loaded
    #[arg(short, long, global = true, value_enum, default_value_t = Platform::Tiktok)]
    pub platform: Platform,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Config file (defaults to the nearest .engagemap.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Color output: auto, always or never (defaults to NO_COLOR/CLICOLOR detection)
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Metric cards for one month or every post
    Summary {
        /// Month key (YYYY-MM); omit for all months
        #[arg(long)]
        month: Option<String>,
    },

    /// Month-by-month series of one metric
    Evolution {
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        /// Four-digit year or "all"
        #[arg(short, long, default_value_t = YearFilter::All)]
        year: YearFilter,
    },

    /// Impact category breakdown
    Impact {
        /// Metric whose family is classified
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        /// Month key (YYYY-MM); omit for all months
        #[arg(long)]
        month: Option<String>,

        /// Four-digit year or "all", applied to the per-month table
        #[arg(short, long, default_value_t = YearFilter::All)]
        year: YearFilter,

        /// Also show category counts for every month
        #[arg(long)]
        by_month: bool,
    },

    /// Histogram of one metric family
    Distribution {
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        /// Month key (YYYY-MM); omit for all months
        #[arg(long)]
        month: Option<String>,
    },

    /// Filtered, sorted and paginated post table
    Posts {
        /// Four-digit year or "all"
        #[arg(short, long, default_value_t = YearFilter::All)]
        year: YearFilter,

        /// Month key (YYYY-MM) or "all"
        #[arg(long)]
        month: Option<String>,

        /// Impact category (e.g. "muy alto", very-high) or "all"
        #[arg(short, long, default_value_t = ImpactFilter::All)]
        impact: ImpactFilter,

        /// Metric whose family the impact filter classifies against
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        /// Case-insensitive text matched against description and artist
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = SortField::Date)]
        sort: SortField,

        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        order: SortDirection,

        /// One-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (overrides the config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Artist ranking
    Artists {
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        /// Four-digit year or "all" (overrides the config)
        #[arg(short, long)]
        year: Option<YearFilter>,

        /// Minimum number of videos (overrides the config)
        #[arg(long)]
        min_videos: Option<u64>,

        /// Leave out artists whose name contains this word
        #[arg(long)]
        exclude: Option<String>,

        /// Number of rows (overrides the config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Posts by one artist
    Artist {
        /// Exact artist name
        name: String,

        /// Metric whose family the impact column classifies against
        #[arg(short, long, value_enum, default_value_t = Metric::AvgIr)]
        metric: Metric,

        #[arg(long, value_enum, default_value_t = SortField::Views)]
        sort: SortField,

        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        order: SortDirection,
    },

    /// Years present in the data
    Years,

    /// Monthly aggregates as CSV
    Export {
        /// Output file (defaults to evolucion_mensual_<Platform>.csv)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the CSV to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::ImpactCategory;

    #[test]
    fn test_cli_parsing_posts_command() {
        let cli = Cli::parse_from([
            "engagemap",
            "posts",
            "--year",
            "2025",
            "--impact",
            "muy alto",
            "--sort",
            "views",
            "--platform",
            "instagram",
            "--format",
            "json",
        ]);

        assert_eq!(cli.platform, Platform::Instagram);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Posts {
                year,
                impact,
                sort,
                order,
                page,
                ..
            } => {
                assert_eq!(year, YearFilter::Year("2025".into()));
                assert_eq!(impact, ImpactFilter::Only(ImpactCategory::VeryHigh));
                assert_eq!(sort, SortField::Views);
                assert_eq!(order, SortDirection::Desc);
                assert_eq!(page, 1);
            }
            _ => panic!("Expected Posts command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["engagemap", "years", "-vv", "--data-dir", "public"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("public")));
        assert_eq!(cli.platform, Platform::Tiktok);
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(["engagemap", "init", "--force"]);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_year() {
        assert!(Cli::try_parse_from(["engagemap", "evolution", "--year", "25"]).is_err());
    }

    #[test]
    fn test_cli_export_output_conflicts_with_stdout() {
        assert!(
            Cli::try_parse_from(["engagemap", "export", "--stdout", "--output", "a.csv"]).is_err()
        );
    }
}
