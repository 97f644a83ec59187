use crate::impact::{ImpactCategory, MetricFamily};
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honors `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

/// Terminal styling for report text.
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    pub fn header(&self, text: &str) -> String {
        if self.enabled {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.enabled {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Text in the category's display color.
    pub fn category(&self, category: ImpactCategory, text: &str) -> String {
        if self.enabled {
            let (r, g, b) = category.rgb();
            text.truecolor(r, g, b).to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

/// Compact count: `1.2M`, `3.4K`, or the plain number below a thousand.
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        num.to_string()
    }
}

pub fn format_count(num: u64) -> String {
    format_number(num as f64)
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Value formatted for its family: a percentage for rates, compact counts
/// otherwise.
pub fn format_metric(value: f64, family: MetricFamily) -> String {
    match family {
        MetricFamily::InteractionRate => format_percent(value),
        MetricFamily::Views | MetricFamily::Likes => format_number(value),
    }
}

/// Human range for a band, e.g. `<1.7K`, `1.7K-5.2K`, `>1.6M`.
pub fn format_band_range(min: f64, max: f64, family: MetricFamily) -> String {
    let bound = |v: f64| match family {
        MetricFamily::InteractionRate => v.to_string(),
        MetricFamily::Views | MetricFamily::Likes => format_number(v),
    };
    let unit = family.unit();
    if min <= 0.0 {
        format!("<{}{unit}", bound(max))
    } else if max.is_infinite() {
        format!(">{}{unit}", bound(min))
    } else {
        format!("{}-{}{unit}", bound(min), bound(max))
    }
}
