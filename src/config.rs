use std::path::PathBuf;

use thiserror::Error;

/// Process exit code used on the usage/help path (the conventional
/// invalid-argument errno value).
pub const USAGE_EXIT_CODE: i32 = 22;

/// Fixed usage message printed on the help path.
pub const USAGE: &str = "\
Usage: surfview [inputfile] -arg [-arg]

     Display detector surfaces in a 3D view and two projections.

     -level    <number> Visualization level (geometry tree depth)    Default: 4
     -visopt   <number> Visualization option (1: leaf elements only) Default: 0
     -help              Print this help output";

/// The resolved command-line configuration. Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Geometry tree depth rendered in the backdrop.
    pub level: i32,
    /// Visualization variant (1 restricts outlines to leaf elements).
    pub visopt: i32,
    /// Optional detector description file.
    pub input: Option<PathBuf>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            level: 4,
            visopt: 0,
            input: None,
        }
    }
}

/// Raised when parsing hits `-help`, an unknown flag or a missing value;
/// the caller prints [`USAGE`] and exits with [`USAGE_EXIT_CODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("usage requested")]
pub struct UsageRequest;

/// Parses the raw argument vector (program name excluded).
///
/// `-level <int>` and `-visopt <int>` update the configuration; the first
/// argument not starting with `-` is recorded as the input file.
/// Non-numeric values degrade to 0, mirroring C `atol`; a known
/// limitation, not a contract.
///
/// # Errors
///
/// Returns [`UsageRequest`] on `-help`, an unrecognized flag, a flag with
/// a missing value, or a second positional argument.
pub fn parse_args<I>(args: I) -> Result<ViewConfig, UsageRequest>
where
    I: IntoIterator<Item = String>,
{
    let mut config = ViewConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-level" => config.level = next_int(&mut args)?,
            "-visopt" => config.visopt = next_int(&mut args)?,
            "-help" => return Err(UsageRequest),
            flag if flag.starts_with('-') => return Err(UsageRequest),
            positional => {
                if config.input.is_some() {
                    return Err(UsageRequest);
                }
                config.input = Some(PathBuf::from(positional));
            }
        }
    }
    Ok(config)
}

fn next_int<I>(args: &mut I) -> Result<i32, UsageRequest>
where
    I: Iterator<Item = String>,
{
    let value = args.next().ok_or(UsageRequest)?;
    Ok(value.parse().unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewConfig, UsageRequest> {
        parse_args(args.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults_apply_without_arguments() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn level_and_visopt_are_parsed() {
        let config = parse(&["-level", "7", "-visopt", "2"]).unwrap();
        assert_eq!(config.level, 7);
        assert_eq!(config.visopt, 2);
        assert!(config.input.is_none());
    }

    #[test]
    fn first_positional_is_the_input_file() {
        let config = parse(&["myfile.ron", "-level", "2"]).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("myfile.ron")));
        assert_eq!(config.level, 2);
    }

    #[test]
    fn unknown_flag_requests_usage() {
        assert_eq!(parse(&["-bogus"]), Err(UsageRequest));
    }

    #[test]
    fn help_requests_usage() {
        assert_eq!(parse(&["-help"]), Err(UsageRequest));
        assert_eq!(parse(&["-level", "7", "-help"]), Err(UsageRequest));
    }

    #[test]
    fn missing_value_requests_usage() {
        assert_eq!(parse(&["-level"]), Err(UsageRequest));
    }

    #[test]
    fn second_positional_requests_usage() {
        assert_eq!(parse(&["one.ron", "two.ron"]), Err(UsageRequest));
    }

    #[test]
    fn non_numeric_value_degrades_to_zero() {
        let config = parse(&["-level", "deep"]).unwrap();
        assert_eq!(config.level, 0);
    }
}
