use crate::core::{Metric, Platform};
use crate::distribution::Distribution;
use crate::formatting::{
    format_count, format_metric, format_number, format_percent, FormattingConfig, Palette,
};
use crate::impact::{ImpactCategory, MetricFamily};
use crate::pipeline::{Page, SortDirection, SortField, SortSpec};
use crate::views::{ArtistRow, EvolutionPoint, ImpactBreakdown, MetricCards, MonthImpact, PostRow};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

const DESCRIPTION_WIDTH: usize = 40;
const BAR_WIDTH: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Everything a command can print.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Summary {
        platform: Platform,
        month: Option<String>,
        cards: MetricCards,
    },
    Evolution {
        platform: Platform,
        metric: Metric,
        points: Vec<EvolutionPoint>,
    },
    Impact {
        platform: Platform,
        month: Option<String>,
        breakdown: ImpactBreakdown,
        #[serde(skip_serializing_if = "Option::is_none")]
        by_month: Option<Vec<MonthImpact>>,
    },
    Distribution {
        platform: Platform,
        month: Option<String>,
        distribution: Distribution,
    },
    Posts {
        platform: Platform,
        family: MetricFamily,
        sort: SortSpec,
        page: Page<PostRow>,
    },
    Artists {
        platform: Platform,
        metric: Metric,
        rows: Vec<ArtistRow>,
    },
    ArtistPosts {
        platform: Platform,
        artist: String,
        family: MetricFamily,
        sort: SortSpec,
        posts: Vec<PostRow>,
    },
    Years {
        platform: Platform,
        years: Vec<String>,
    },
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

/// Human-readable tables.
pub struct TerminalWriter<W: Write> {
    writer: W,
    palette: Palette,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            palette: Palette::new(formatting),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        match report {
            Report::Summary {
                platform,
                month,
                cards,
            } => self.write_summary(*platform, month.as_deref(), cards),
            Report::Evolution {
                platform,
                metric,
                points,
            } => self.write_evolution(*platform, *metric, points),
            Report::Impact {
                platform,
                month,
                breakdown,
                by_month,
            } => {
                self.write_breakdown(*platform, month.as_deref(), breakdown)?;
                match by_month {
                    Some(months) => self.write_impact_by_month(months),
                    None => Ok(()),
                }
            }
            Report::Distribution {
                platform,
                month,
                distribution,
            } => self.write_distribution(*platform, month.as_deref(), distribution),
            Report::Posts {
                platform,
                family,
                sort,
                page,
            } => self.write_posts(*platform, *family, *sort, page),
            Report::Artists {
                platform,
                metric,
                rows,
            } => self.write_artists(*platform, *metric, rows),
            Report::ArtistPosts {
                platform,
                artist,
                family,
                sort,
                posts,
            } => self.write_artist_posts(*platform, artist, *family, *sort, posts),
            Report::Years { platform, years } => self.write_years(*platform, years),
        }
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_title(&mut self, platform: Platform, title: &str) -> anyhow::Result<()> {
        let heading = format!("{} · {title}", platform.display_name());
        writeln!(self.writer, "{}", self.palette.header(&heading))?;
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> anyhow::Result<()> {
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_summary(
        &mut self,
        platform: Platform,
        month: Option<&str>,
        cards: &MetricCards,
    ) -> anyhow::Result<()> {
        self.write_title(platform, &scope_title("Summary", month))?;
        let mut table = new_table(vec!["Metric", "Value"]);
        let rows = [
            ("Total posts", format_count(cards.total_posts as u64)),
            ("Average views", format_number(cards.avg_views)),
            ("Average likes", format_number(cards.avg_likes)),
            ("Average interaction rate", format_percent(cards.avg_ir)),
            ("Total shares", format_count(cards.total_shares)),
            ("Total comments", format_count(cards.total_comments)),
            ("Total collects", format_count(cards.total_collects)),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), right(value)]);
        }
        self.write_table(&table)
    }

    fn write_evolution(
        &mut self,
        platform: Platform,
        metric: Metric,
        points: &[EvolutionPoint],
    ) -> anyhow::Result<()> {
        self.write_title(platform, &format!("Monthly evolution: {}", metric.label()))?;
        if points.is_empty() {
            return self.write_empty("No months match the year filter.");
        }
        let mut table = new_table(vec!["Month", "Posts", metric.label()]);
        for point in points {
            table.add_row(vec![
                Cell::new(&point.month),
                right(format_count(point.posts)),
                right(format_metric(point.metric, metric.family())),
            ]);
        }
        self.write_table(&table)
    }

    fn write_breakdown(
        &mut self,
        platform: Platform,
        month: Option<&str>,
        breakdown: &ImpactBreakdown,
    ) -> anyhow::Result<()> {
        let title = format!("Impact by {}", breakdown.family.name());
        self.write_title(platform, &scope_title(&title, month))?;
        let mut table = new_table(vec!["Category", "Range", "Posts", "Share"]);
        for share in breakdown.categories.iter().rev() {
            table.add_row(vec![
                Cell::new(share.label),
                Cell::new(&share.range),
                right(format_count(share.count as u64)),
                right(format_percent(share.percentage)),
            ]);
        }
        self.write_table(&table)?;

        let very_high = format!(
            "{} very high impact posts ({})",
            breakdown.very_high_count,
            format_percent(breakdown.very_high_percentage)
        );
        let low = format!(
            "{} low or very low impact posts ({})",
            breakdown.low_impact_count,
            format_percent(breakdown.low_impact_percentage)
        );
        writeln!(
            self.writer,
            "{}",
            self.palette.category(ImpactCategory::VeryHigh, &very_high)
        )?;
        writeln!(
            self.writer,
            "{}",
            self.palette.category(ImpactCategory::VeryLow, &low)
        )?;
        Ok(())
    }

    fn write_impact_by_month(&mut self, months: &[MonthImpact]) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.palette.header("Impact per month"))?;
        let mut header = vec!["Month"];
        header.extend(ImpactCategory::all().iter().map(|c| c.label()));
        header.push("Total");
        let mut table = new_table(header);
        for month in months {
            let mut row = vec![Cell::new(&month.month)];
            row.extend(month.counts.iter().map(|count| right(count.to_string())));
            row.push(right(month.total().to_string()));
            table.add_row(row);
        }
        self.write_table(&table)
    }

    fn write_distribution(
        &mut self,
        platform: Platform,
        month: Option<&str>,
        distribution: &Distribution,
    ) -> anyhow::Result<()> {
        let title = format!("Distribution of {}", distribution.metric_name);
        self.write_title(platform, &scope_title(&title, month))?;
        if distribution.is_empty() {
            return self.write_empty("No posts to plot.");
        }
        writeln!(
            self.writer,
            "{} posts · median {} · mean {}",
            distribution.len(),
            format_metric(distribution.median, distribution.family),
            format_metric(distribution.mean, distribution.family)
        )?;

        // Bin i covers values from i / (bins - 1) of the ceiling.
        let last_bin = distribution.bins.len().saturating_sub(1).max(1);
        let step = distribution.max_value / last_bin as f64;
        for (i, (count, width)) in distribution
            .bins
            .iter()
            .zip(&distribution.widths)
            .enumerate()
        {
            if *count == 0 {
                continue;
            }
            let low = format_metric(step * i as f64, distribution.family);
            let bar = "█".repeat((width / 100.0 * BAR_WIDTH).round() as usize);
            writeln!(
                self.writer,
                "{:>10} {} {}",
                low,
                bar,
                self.palette.dim(&count.to_string())
            )?;
        }
        Ok(())
    }

    fn write_posts(
        &mut self,
        platform: Platform,
        family: MetricFamily,
        sort: SortSpec,
        page: &Page<PostRow>,
    ) -> anyhow::Result<()> {
        self.write_title(platform, "Posts")?;
        if page.items.is_empty() {
            return self.write_empty("No posts match the current filters.");
        }
        self.write_post_table(&page.items, family, sort)?;
        let footer = format!(
            "Page {} of {} · {} posts",
            page.page + 1,
            page.page_count,
            page.total
        );
        writeln!(self.writer, "{}", self.palette.dim(&footer))?;
        Ok(())
    }

    fn write_artists(
        &mut self,
        platform: Platform,
        metric: Metric,
        rows: &[ArtistRow],
    ) -> anyhow::Result<()> {
        self.write_title(platform, &format!("Artists by {}", metric.label()))?;
        if rows.is_empty() {
            return self.write_empty("No artists meet the minimum video count.");
        }
        let mut table = new_table(vec![
            "#",
            "Artist",
            "Videos",
            "Avg views",
            "Avg likes",
            "Avg IR",
            metric.label(),
        ]);
        for (rank, row) in rows.iter().enumerate() {
            table.add_row(vec![
                right((rank + 1).to_string()),
                Cell::new(&row.artist),
                right(format_count(row.videos)),
                right(format_number(row.avg_views)),
                right(format_number(row.avg_likes)),
                right(format_percent(row.avg_ir)),
                right(format_metric(row.metric, metric.family())),
            ]);
        }
        self.write_table(&table)
    }

    fn write_artist_posts(
        &mut self,
        platform: Platform,
        artist: &str,
        family: MetricFamily,
        sort: SortSpec,
        posts: &[PostRow],
    ) -> anyhow::Result<()> {
        self.write_title(platform, &format!("Posts by {artist}"))?;
        if posts.is_empty() {
            return self.write_empty("No posts for this artist.");
        }
        self.write_post_table(posts, family, sort)
    }

    fn write_years(&mut self, platform: Platform, years: &[String]) -> anyhow::Result<()> {
        self.write_title(platform, "Years")?;
        if years.is_empty() {
            return self.write_empty("No data loaded.");
        }
        writeln!(self.writer, "{}", years.join("\n"))?;
        Ok(())
    }

    fn write_post_table(
        &mut self,
        posts: &[PostRow],
        family: MetricFamily,
        sort: SortSpec,
    ) -> anyhow::Result<()> {
        let mut header = vec!["Artist".to_string(), "Description".to_string()];
        header.extend(SortField::all().iter().map(|f| sort_header(*f, sort)));
        header.push(format!("Impact ({})", family.name()));

        let mut table = new_table(header);
        for row in posts {
            let post = &row.post;
            table.add_row(vec![
                Cell::new(&post.artist),
                Cell::new(truncate(&post.description, DESCRIPTION_WIDTH)),
                Cell::new(&post.date),
                right(format_count(post.views)),
                right(format_count(post.likes)),
                right(format_count(post.shares)),
                right(format_count(post.comments)),
                right(format_count(post.collects)),
                right(format_percent(post.ir)),
                Cell::new(row.impact.label()),
            ]);
        }
        self.write_table(&table)
    }

    fn write_empty(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.palette.warning(message))?;
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat, formatting: FormattingConfig) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout(), formatting)),
    }
}

fn new_table<T: Into<comfy_table::Cell>>(header: Vec<T>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn scope_title(title: &str, month: Option<&str>) -> String {
    match month {
        Some(month) => format!("{title} ({month})"),
        None => format!("{title} (all months)"),
    }
}

fn sort_header(field: SortField, sort: SortSpec) -> String {
    if field != sort.field {
        return field.display_name().to_string();
    }
    let arrow = match sort.direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    };
    format!("{} {arrow}", field.display_name())
}

fn truncate(text: &str, width: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= width {
        flat
    } else {
        let cut: String = flat.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::post;
    use crate::impact::ImpactThresholds;
    use crate::pipeline::paginate;
    use crate::views::annotate_posts;

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        TerminalWriter::new(&mut buf, FormattingConfig::plain())
            .write_report(report)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn rows() -> Vec<PostRow> {
        annotate_posts(
            vec![
                post("2025-01-03", 2_000_000, 60_000, 30.0),
                post("2025-01-09", 800, 20, 1.0),
            ],
            MetricFamily::InteractionRate,
            &ImpactThresholds::default(),
        )
    }

    #[test]
    fn test_json_report_is_tagged() {
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf)
            .write_report(&Report::Years {
                platform: Platform::Tiktok,
                years: vec!["2025".into(), "2024".into()],
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["report"], "years");
        assert_eq!(value["platform"], "tiktok");
        assert_eq!(value["years"][0], "2025");
    }

    #[test]
    fn test_json_post_rows_are_flat() {
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf)
            .write_report(&Report::Posts {
                platform: Platform::Instagram,
                family: MetricFamily::InteractionRate,
                sort: SortSpec::descending(SortField::Date),
                page: paginate(&rows(), 0, 50),
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let first = &value["page"]["items"][0];
        assert_eq!(first["date"], "2025-01-03");
        assert_eq!(first["views"], 2_000_000);
        assert!(first.get("impact").is_some());
        assert_eq!(value["page"]["total"], 2);
    }

    #[test]
    fn test_terminal_summary_formats_numbers() {
        let out = render(&Report::Summary {
            platform: Platform::Tiktok,
            month: Some("2025-01".into()),
            cards: MetricCards {
                total_posts: 2,
                avg_views: 1_500_000.0,
                avg_likes: 2_500.0,
                avg_ir: 7.125,
                total_shares: 4,
                total_comments: 6,
                total_collects: 8,
            },
        });
        assert!(out.contains("TikTok · Summary (2025-01)"));
        assert!(out.contains("1.5M"));
        assert!(out.contains("2.5K"));
        assert!(out.contains("7.13%") || out.contains("7.12%"));
    }

    #[test]
    fn test_terminal_posts_marks_sort_column_and_page() {
        let out = render(&Report::Posts {
            platform: Platform::Tiktok,
            family: MetricFamily::InteractionRate,
            sort: SortSpec::descending(SortField::Views),
            page: paginate(&rows(), 0, 1),
        });
        assert!(out.contains("Views ▼"));
        assert!(out.contains("Page 1 of 2 · 2 posts"));
        assert!(out.contains(ImpactCategory::VeryHigh.label()));
    }

    #[test]
    fn test_terminal_empty_views_explain_themselves() {
        let out = render(&Report::Artists {
            platform: Platform::Tiktok,
            metric: Metric::AvgIr,
            rows: Vec::new(),
        });
        assert!(out.contains("No artists"));
    }

    #[test]
    fn test_terminal_distribution_labels_bin_lower_bounds() {
        let posts = [post("2025-01-03", 100, 10, 25.0), post("2025-01-09", 100, 10, 10.0)];
        let out = render(&Report::Distribution {
            platform: Platform::Tiktok,
            month: None,
            distribution: crate::distribution::build_distribution(
                &posts,
                MetricFamily::InteractionRate,
                crate::core::MedianStrategy::UpperMiddle,
            ),
        });
        let labels: Vec<&str> = out
            .lines()
            .filter(|l| l.contains('█'))
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(labels, vec!["10.00%", "25.00%"]);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("canción", 10), "canción");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("a\nb", 4), "a b");
    }
}
