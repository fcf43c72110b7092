//! Command-line interface for weighslide.

use std::env;
use std::path::PathBuf;
use std::process;

use weighslide::{
    calculate_weighted_windows_with_options, run_weighslide, ComputeOptions, Error, Result,
    RunConfig, Series, Statistic, WindowSpec, NA,
};

const USAGE: &str = "\
usage: weighslide <window> [statistic] [options]

arguments:
  window                sliding weighted window: a digit pattern such as
                        \"494\" or \"9xxxxx9\" (x marks ignored positions), or
                        an explicit list such as \"[0.5,1.0,0.5]\" or \"[2,x,2]\"
  statistic             mean | std | sum (default: mean)

options:
  -r <list>             raw data inline, e.g. \"[1,3,5,7,2,4]\"
  -i <path>             input file in .csv or .xlsx format
  -n <name>             dataset name used in output file names
  -c <column>           column in the input file holding the data
  -o                    overwrite existing output files
  --sheet <name>        excel sheet to read
  --delimiter <char>    csv field delimiter (default: ,)
  --no-header           input file has no header row
  --show                render a terminal chart of the result
  --allow-large-window  accept windows longer than 100 positions
  --allow-large-input   accept inputs longer than 10000 values
  -h, --help            show this help";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args[0] == "-h" || args[0] == "--help" {
        println!("{}", USAGE);
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let cli = CliArgs::parse(args)?;

    match (&cli.infile, &cli.raw_data) {
        (Some(_), Some(_)) => Err(Error::InvalidInput(
            "both an input file and a raw data list were given; pass only one".to_string(),
        )),
        (Some(infile), None) => run_file(infile, &cli),
        (None, Some(raw)) => run_raw(raw, &cli),
        (None, None) => Err(Error::InvalidInput(
            "no data given; pass an input file with -i or a raw data list with -r".to_string(),
        )),
    }
}

fn run_file(infile: &PathBuf, cli: &CliArgs) -> Result<()> {
    println!("Starting weighslide analysis.");
    let output = run_weighslide(infile, &cli.window, cli.statistic, &cli.config)?;
    println!(
        "Weighslide analysis is finished.\nLocation of output files:\n\t{}",
        output.paths.dir().display()
    );
    Ok(())
}

fn run_raw(raw: &[f64], cli: &CliArgs) -> Result<()> {
    let data = Series::new(raw.to_vec(), Some("original data".to_string()));
    let options = ComputeOptions {
        allow_large_window: cli.config.allow_large_window,
        allow_large_input: cli.config.allow_large_input,
    };
    let result =
        calculate_weighted_windows_with_options(&data, &cli.window, cli.statistic, &options)?;

    println!("Weighslide output:");
    for value in result.output().values() {
        println!("{}", value);
    }
    Ok(())
}

#[derive(Debug)]
struct CliArgs {
    window: WindowSpec,
    statistic: Statistic,
    raw_data: Option<Vec<f64>>,
    infile: Option<PathBuf>,
    config: RunConfig,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut iter = args.iter().peekable();

        let window_arg = iter
            .next()
            .ok_or_else(|| Error::InvalidInput("missing window argument".to_string()))?;
        let window = parse_window_argument(window_arg)?;

        // optional second positional: the statistic
        let mut statistic = Statistic::Mean;
        if let Some(next) = iter.peek() {
            if !next.starts_with('-') {
                statistic = next.parse()?;
                iter.next();
            }
        }

        let mut raw_data = None;
        let mut infile = None;
        let mut config = RunConfig::default();
        let mut no_header = false;
        let mut sheet: Option<String> = None;

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-r" => raw_data = Some(parse_raw_data(required_value(&mut iter, "-r")?)?),
                "-i" => infile = Some(PathBuf::from(required_value(&mut iter, "-i")?)),
                "-n" => config.name = Some(required_value(&mut iter, "-n")?.to_string()),
                "-c" => config.column = Some(required_value(&mut iter, "-c")?.to_string()),
                "-o" => config.overwrite = true,
                "--sheet" => sheet = Some(required_value(&mut iter, "--sheet")?.to_string()),
                "--delimiter" => {
                    let value = required_value(&mut iter, "--delimiter")?;
                    let mut bytes = value.bytes();
                    match (bytes.next(), bytes.next()) {
                        (Some(b), None) => config.csv.delimiter = b,
                        _ => {
                            return Err(Error::InvalidInput(format!(
                                "delimiter must be a single character, got '{}'",
                                value
                            )))
                        }
                    }
                }
                "--no-header" => no_header = true,
                "--show" => config.show_figure = true,
                "--allow-large-window" => config.allow_large_window = true,
                "--allow-large-input" => config.allow_large_input = true,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "unrecognized argument '{}'",
                        other
                    )))
                }
            }
        }

        if no_header {
            config.csv.has_header = false;
        }
        #[cfg(feature = "excel")]
        {
            config.excel.has_header = !no_header;
            config.excel.sheet_name = sheet;
        }
        #[cfg(not(feature = "excel"))]
        if sheet.is_some() {
            return Err(Error::InvalidInput(
                "excel support is not compiled in; --sheet is unavailable".to_string(),
            ));
        }

        Ok(CliArgs {
            window,
            statistic,
            raw_data,
            infile,
            config,
        })
    }
}

fn required_value<'a, I>(iter: &mut I, flag: &str) -> Result<&'a String>
where
    I: Iterator<Item = &'a String>,
{
    iter.next()
        .ok_or_else(|| Error::InvalidInput(format!("flag {} requires a value", flag)))
}

/// A window argument starting with `[` is an explicit weight list; anything
/// else is a digit pattern.
fn parse_window_argument(arg: &str) -> Result<WindowSpec> {
    if arg.trim_start().starts_with('[') {
        let weights = parse_bracketed_list(arg, |token| {
            if token == "x" || token == "'x'" || token == "\"x\"" {
                Ok(NA::NA)
            } else {
                token.parse::<f64>().map(NA::Value).map_err(|_| {
                    Error::InvalidSpecification(format!(
                        "window entry '{}' is neither a number nor 'x'",
                        token
                    ))
                })
            }
        })?;
        Ok(WindowSpec::Weights(weights))
    } else {
        Ok(WindowSpec::from(arg))
    }
}

fn parse_raw_data(arg: &str) -> Result<Vec<f64>> {
    parse_bracketed_list(arg, |token| {
        token
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("raw data entry '{}' is not a number", token)))
    })
}

fn parse_bracketed_list<T, F>(arg: &str, mut parse_token: F) -> Result<Vec<T>>
where
    F: FnMut(&str) -> Result<T>,
{
    let inner = arg
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| Error::InvalidInput(format!("expected a bracketed list, got '{}'", arg)))?;

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|token| parse_token(token.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_pattern_window_and_statistic() {
        let cli = CliArgs::parse(&args(&["494", "sum", "-r", "[1,2,3]"])).unwrap();
        assert_eq!(cli.window, WindowSpec::from("494"));
        assert_eq!(cli.statistic, Statistic::Sum);
        assert_eq!(cli.raw_data, Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_statistic_defaults_to_mean() {
        let cli = CliArgs::parse(&args(&["494", "-r", "[1,2,3]"])).unwrap();
        assert_eq!(cli.statistic, Statistic::Mean);
    }

    #[test]
    fn test_parse_list_window_with_ignore_marker() {
        let cli = CliArgs::parse(&args(&["[2,x,2]", "-r", "[1,2,3]"])).unwrap();
        assert_eq!(
            cli.window,
            WindowSpec::Weights(vec![NA::Value(2.0), NA::NA, NA::Value(2.0)])
        );
    }

    #[test]
    fn test_unknown_statistic_rejected() {
        let err = CliArgs::parse(&args(&["494", "median", "-r", "[1,2,3]"])).unwrap_err();
        assert!(matches!(err, Error::UnknownStatistic(_)));
    }

    #[test]
    fn test_file_options() {
        let cli = CliArgs::parse(&args(&[
            "9x9", "mean", "-i", "wave.csv", "-c", "noisy wave", "-n", "wavetest", "-o",
        ]))
        .unwrap();

        assert_eq!(cli.infile, Some(PathBuf::from("wave.csv")));
        assert_eq!(cli.config.column.as_deref(), Some("noisy wave"));
        assert_eq!(cli.config.name.as_deref(), Some("wavetest"));
        assert!(cli.config.overwrite);
    }

    #[test]
    fn test_unrecognized_flag() {
        let err = CliArgs::parse(&args(&["494", "--bogus"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_list_entry() {
        let err = CliArgs::parse(&args(&["[2,y,2]", "-r", "[1]"])).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification(_)));
    }
}
