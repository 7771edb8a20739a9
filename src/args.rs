//! Command-line argument parsing and processing.
//!
//! This module turns the raw argument list into a [`CliAction`]. Global flags
//! (`--debug`, `--config`, `--json`, `--log`) may appear anywhere; the first
//! bare word selects the command.

use crate::chart::EngineChoice;
use crate::luck::Gender;
use crate::pillar::HourBoundary;
use crate::time::TimeAccuracy;

/// Birth details shared by the `chart` and `luck` commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BirthArgs {
    pub date: Option<String>,
    /// Clock time, joined onto `date` when given separately.
    pub time: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gender: Option<Gender>,
    pub accuracy: Option<TimeAccuracy>,
    pub policy: Option<HourBoundary>,
    /// `None` leaves the configured setting in place.
    pub true_solar: Option<bool>,
    pub engine: Option<EngineChoice>,
}

/// Flags accepted by every command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalArgs {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    pub json: bool,
    pub log_to_file: bool,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute and print a birth chart
    ChartCommand { global: GlobalArgs, birth: BirthArgs },
    /// List the 24 solar terms of a year
    TermsCommand {
        global: GlobalArgs,
        year: i32,
        timezone: Option<String>,
        engine: Option<EngineChoice>,
    },
    /// Annual and monthly luck for a birth chart
    LuckCommand {
        global: GlobalArgs,
        birth: BirthArgs,
        year: Option<i32>,
        count: Option<usize>,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

fn usage_error(message: impl std::fmt::Display) -> ParsedArgs {
    log_warning!("{message}");
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

/// Parse a flag's value with the type's `FromStr`.
fn parse_value<T>(flag: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| format!("Invalid value '{raw}' for {flag}: {e}"))
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Help and version take precedence over everything else
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.is_empty() || args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        match Self::parse_command(&args_vec) {
            Ok(action) => ParsedArgs { action },
            Err(message) => usage_error(message),
        }
    }

    fn parse_command(args_vec: &[String]) -> Result<CliAction, String> {
        let mut global = GlobalArgs::default();
        let mut birth = BirthArgs::default();
        let mut command: Option<&str> = None;
        let mut positionals: Vec<&str> = Vec::new();
        let mut year: Option<i32> = None;
        let mut count: Option<usize> = None;

        let mut iter = args_vec.iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .map(String::as_str)
                    .ok_or_else(|| format!("Missing value for {flag}"))
            };

            match arg.as_str() {
                "--debug" | "-d" => global.debug_enabled = true,
                "--json" | "-j" => global.json = true,
                "--log" => global.log_to_file = true,
                "--config" | "-c" => global.config_dir = Some(value(arg)?.to_string()),

                "--date" => birth.date = Some(value(arg)?.to_string()),
                "--time" => birth.time = Some(value(arg)?.to_string()),
                "--tz" => birth.timezone = Some(value(arg)?.to_string()),
                "--lat" => birth.latitude = Some(parse_value(arg, value(arg)?)?),
                "--lon" => birth.longitude = Some(parse_value(arg, value(arg)?)?),
                "--gender" => birth.gender = Some(parse_value(arg, value(arg)?)?),
                "--accuracy" => birth.accuracy = Some(parse_value(arg, value(arg)?)?),
                "--policy" => birth.policy = Some(parse_value(arg, value(arg)?)?),
                "--engine" => birth.engine = Some(parse_value(arg, value(arg)?)?),
                "--true-solar" => birth.true_solar = Some(true),
                "--no-true-solar" => birth.true_solar = Some(false),

                "--year" | "-y" => year = Some(parse_value(arg, value(arg)?)?),
                "--count" | "-n" => count = Some(parse_value(arg, value(arg)?)?),

                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("Unknown option: {flag}"));
                }
                word if command.is_none() => command = Some(word),
                word => positionals.push(word),
            }
        }

        let command = command.ok_or("No command given")?;
        match command {
            "chart" | "c" => {
                if let Some(extra) = positionals.first() {
                    return Err(format!("Unexpected argument for chart: {extra}"));
                }
                Self::require_date(&birth, "chart")?;
                Ok(CliAction::ChartCommand { global, birth })
            }
            "terms" | "t" => {
                let year = match (positionals.as_slice(), year) {
                    ([raw], None) => parse_value("terms", raw)?,
                    ([], Some(year)) => year,
                    ([], None) => return Err("Missing year. Usage: saju terms <year>".into()),
                    _ => return Err("Usage: saju terms <year> [--tz <zone>]".into()),
                };
                Ok(CliAction::TermsCommand {
                    global,
                    year,
                    timezone: birth.timezone,
                    engine: birth.engine,
                })
            }
            "luck" | "l" => {
                if let Some(extra) = positionals.first() {
                    return Err(format!("Unexpected argument for luck: {extra}"));
                }
                Self::require_date(&birth, "luck")?;
                Ok(CliAction::LuckCommand {
                    global,
                    birth,
                    year,
                    count,
                })
            }
            "help" => Ok(CliAction::ShowHelp),
            other => Err(format!("Unknown command: {other}")),
        }
    }

    fn require_date(birth: &BirthArgs, command: &str) -> Result<(), String> {
        if birth.date.is_none() {
            return Err(format!(
                "Missing birth date. Usage: saju {command} --date <YYYY-MM-DD[THH:MM]> --tz <zone>"
            ));
        }
        if birth.timezone.is_none() && (birth.latitude.is_none() || birth.longitude.is_none()) {
            return Err("Missing timezone: pass --tz, or --lat and --lon to look it up".into());
        }
        Ok(())
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!("{}", env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("saju [OPTIONS] <COMMAND>");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-j, --json             Print machine-readable JSON");
    log_indented!("    --log              Write the output to saju-<timestamp>.log");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("chart, c               Four pillars, analysis, daeun and sinsal");
    log_indented!("terms, t <year>        The 24 solar terms of a year");
    log_indented!("luck, l                Annual and monthly luck for a chart");
    log_indented!("help                   Print this message");
    log_block_start!("Birth options (chart, luck):");
    log_indented!("--date <date>          YYYY-MM-DD or YYYY-MM-DDTHH:MM");
    log_indented!("--time <HH:MM>         Clock time, if not part of --date");
    log_indented!("--tz <zone>            IANA name, offset (+09:00) or auto");
    log_indented!("--lat, --lon <deg>     Birth place, enables true solar time");
    log_indented!("--gender <m|f>         Decides the daeun direction");
    log_indented!("--accuracy <level>     exact, approximate or unknown");
    log_indented!("--policy <policy>      traditional or modern 子 hour split");
    log_indented!("--engine <engine>      meeus or approximate");
    log_indented!("--[no-]true-solar      Override the true solar time setting");
    log_block_start!("Luck options:");
    log_indented!("-y, --year <year>      First year to list (default: this year)");
    log_indented!("-n, --count <n>        Number of years to list");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_args(extra: &[&str]) -> Vec<String> {
        let mut args = vec!["saju", "chart", "--date", "2024-02-04T16:28", "--tz", "Asia/Seoul"];
        args.extend_from_slice(extra);
        args.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["saju"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(ParsedArgs::parse(vec!["saju", "-h"]).action, CliAction::ShowHelp);
        assert_eq!(
            ParsedArgs::parse(vec!["saju", "--version"]).action,
            CliAction::ShowVersion
        );
    }

    #[test]
    fn test_help_command() {
        assert_eq!(ParsedArgs::parse(vec!["saju", "help"]).action, CliAction::ShowHelp);
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["saju", "--help", "-V"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_chart_command() {
        let parsed = ParsedArgs::parse(chart_args(&[
            "--lat", "37.5665", "--lon", "126.978", "--gender", "f", "--json",
        ]));
        match parsed.action {
            CliAction::ChartCommand { global, birth } => {
                assert!(global.json);
                assert!(!global.debug_enabled);
                assert_eq!(birth.date.as_deref(), Some("2024-02-04T16:28"));
                assert_eq!(birth.timezone.as_deref(), Some("Asia/Seoul"));
                assert_eq!(birth.latitude, Some(37.5665));
                assert_eq!(birth.longitude, Some(126.978));
                assert_eq!(birth.gender, Some(Gender::Female));
                assert_eq!(birth.true_solar, None);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_negative_longitude_is_a_value() {
        let parsed = ParsedArgs::parse(vec![
            "saju", "chart", "--date", "1990-07-15T08:00", "--lat", "40.71", "--lon", "-74.0",
        ]);
        match parsed.action {
            CliAction::ChartCommand { birth, .. } => {
                assert_eq!(birth.longitude, Some(-74.0));
                assert_eq!(birth.timezone, None);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_anywhere() {
        let parsed = ParsedArgs::parse(vec![
            "saju", "--debug", "-c", "/tmp/saju", "chart", "--date", "2024-02-04", "--tz",
            "+09:00", "--no-true-solar", "--policy", "modern",
        ]);
        match parsed.action {
            CliAction::ChartCommand { global, birth } => {
                assert!(global.debug_enabled);
                assert_eq!(global.config_dir.as_deref(), Some("/tmp/saju"));
                assert_eq!(birth.true_solar, Some(false));
                assert_eq!(birth.policy, Some(HourBoundary::Modern));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_parse_terms_command() {
        let parsed = ParsedArgs::parse(vec!["saju", "terms", "2024", "--tz", "Asia/Seoul"]);
        assert_eq!(
            parsed.action,
            CliAction::TermsCommand {
                global: GlobalArgs::default(),
                year: 2024,
                timezone: Some("Asia/Seoul".into()),
                engine: None,
            }
        );

        let by_flag = ParsedArgs::parse(vec!["saju", "t", "--year", "1999"]);
        assert!(matches!(
            by_flag.action,
            CliAction::TermsCommand { year: 1999, .. }
        ));
    }

    #[test]
    fn test_parse_luck_command() {
        let mut args = chart_args(&["--year", "2030", "--count", "5"]);
        args[1] = "luck".into();
        match ParsedArgs::parse(args).action {
            CliAction::LuckCommand { year, count, .. } => {
                assert_eq!(year, Some(2030));
                assert_eq!(count, Some(5));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_arguments_show_help() {
        for args in [
            vec!["saju", "chart"],
            vec!["saju", "chart", "--date", "2024-02-04"],
            vec!["saju", "chart", "--date", "2024-02-04", "--tz", "UTC", "--lat"],
            vec!["saju", "chart", "--date", "2024-02-04", "--tz", "UTC", "--lat", "north"],
            vec!["saju", "chart", "--date", "2024-02-04", "--tz", "UTC", "--gender", "x"],
            vec!["saju", "terms"],
            vec!["saju", "terms", "twenty"],
            vec!["saju", "horoscope"],
            vec!["saju", "--frobnicate"],
        ] {
            let parsed = ParsedArgs::parse(args.clone());
            assert_eq!(parsed.action, CliAction::ShowHelpDueToError, "{args:?}");
        }
    }
}
