//! Command-line interface for `pix-exhibits`

use crate::exhibits::properties::PropertyValue;
use crate::logging::Verbosity;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Render the Pix vs CoDi/DiMo comparative exhibits to PNG and SVG
#[derive(Debug, Parser)]
#[command(name = "pix-exhibits")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON file of render properties (default: ./render_config.json if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List exhibit ids, output file stems and summaries
    List,

    /// List render properties with their defaults, and the palettes
    Properties,

    /// Render exhibits
    Render(RenderArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Svg,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Brand,
    Default,
    Grayscale,
}

#[derive(Debug, Default, clap::Args)]
pub struct RenderArgs {
    /// Exhibit id to render; repeat for several (default: all)
    #[arg(long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// PNG resolution in dots per inch
    #[arg(long, value_name = "N")]
    pub dpi: Option<u32>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Omit source footnotes
    #[arg(long)]
    pub no_footnotes: bool,

    /// Render one exhibit at a time
    #[arg(long)]
    pub sequential: bool,
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

impl RenderArgs {
    /// Flags as property values, to be layered after the config file
    pub fn overrides(&self) -> Vec<PropertyValue> {
        let mut values = Vec::new();

        if let Some(out) = &self.out {
            values.push(PropertyValue::new("output.dir", out.to_string_lossy()));
        }
        if let Some(format) = self.format {
            let name = match format {
                FormatArg::Png => "png",
                FormatArg::Svg => "svg",
                FormatArg::Both => "both",
            };
            values.push(PropertyValue::new("output.format", name));
        }
        if let Some(dpi) = self.dpi {
            values.push(PropertyValue::new("png.dpi", dpi.to_string()));
        }
        if let Some(theme) = self.theme {
            let name = match theme {
                ThemeArg::Brand => "brand",
                ThemeArg::Default => "default",
                ThemeArg::Grayscale => "grayscale",
            };
            values.push(PropertyValue::new("theme", name));
        }
        if self.no_footnotes {
            values.push(PropertyValue::new("footnotes", "hide"));
        }
        if self.sequential {
            values.push(PropertyValue::new("render.parallel", "false"));
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, RenderConfig, Theme};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "pix-exhibits");
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::parse_from([
            "pix-exhibits",
            "render",
            "--only",
            "9.1",
            "--only",
            "10",
            "--out",
            "out",
            "--format",
            "svg",
            "-v",
        ]);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.only, vec!["9.1", "10"]);
        assert_eq!(args.format, Some(FormatArg::Svg));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let args = RenderArgs {
            out: Some(PathBuf::from("build/exhibits")),
            dpi: Some(150),
            theme: Some(ThemeArg::Grayscale),
            no_footnotes: true,
            sequential: true,
            format: Some(FormatArg::Png),
            ..Default::default()
        };

        let mut values = vec![
            PropertyValue::new("png.dpi", "600"),
            PropertyValue::new("theme", "default"),
        ];
        values.extend(args.overrides());
        let config = RenderConfig::from_properties(&values);

        assert_eq!(config.output_dir, PathBuf::from("build/exhibits"));
        assert_eq!(config.png_dpi, 150.0);
        assert_eq!(config.theme, Theme::Grayscale);
        assert_eq!(config.format, OutputFormat::Png);
        assert!(!config.show_footnotes);
        assert!(!config.parallel);
    }

    #[test]
    fn test_no_flags_no_overrides() {
        assert!(RenderArgs::default().overrides().is_empty());
    }
}
