//! File-to-files pipeline: read a series from a tabular file, run the
//! reduction, and persist every artifact of the run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io;
use crate::io::CsvReadOptions;
#[cfg(feature = "excel")]
use crate::io::ExcelReadOptions;
use crate::output::OutputPaths;
use crate::series::Series;
use crate::window::{
    calculate_weighted_windows_with_options, ComputeOptions, Statistic, WeightedWindows,
    WindowSpec,
};

/// Explicit configuration for [`run_weighslide`].
///
/// Every field has a neutral default, so `RunConfig::default()` runs the
/// pipeline on a single-column file without overwriting anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Dataset name used in output file names (truncated to 20 characters);
    /// defaults to the input file name.
    pub name: Option<String>,
    /// Column holding the data. Required when the input file has more than
    /// one column.
    pub column: Option<String>,
    /// Replace existing output files instead of failing.
    pub overwrite: bool,
    /// Render a terminal chart of the result after the run.
    pub show_figure: bool,
    /// Accept windows longer than 100 positions.
    pub allow_large_window: bool,
    /// Accept inputs longer than 10000 values.
    pub allow_large_input: bool,
    /// CSV read options.
    pub csv: CsvReadOptions,
    /// Excel read options.
    #[cfg(feature = "excel")]
    pub excel: ExcelReadOptions,
}

/// Artifacts of a completed run.
#[derive(Debug)]
pub struct RunOutput {
    /// The full reduction result.
    pub result: WeightedWindows,
    /// Where the artifacts were written.
    pub paths: OutputPaths,
}

/// Run the full weighslide pipeline on a `.csv` or `.xlsx` input file.
///
/// Reads the data column, runs [`calculate_weighted_windows`] over it, and
/// writes the slice tables, the output series, an Excel workbook, and a PNG
/// chart into a `weighslide_output` directory beside the input file. Existing
/// output files fail the run unless `config.overwrite` is set; the check runs
/// before anything is written.
///
/// A failed chart render is logged and does not abort the run; the tabular
/// artifacts are the primary outputs.
///
/// [`calculate_weighted_windows`]: crate::window::calculate_weighted_windows
pub fn run_weighslide<P: AsRef<Path>>(
    infile: P,
    window: &WindowSpec,
    statistic: Statistic,
    config: &RunConfig,
) -> Result<RunOutput> {
    let infile = infile.as_ref();
    let data = read_input(infile, config)?;
    log::info!(
        "starting weighslide analysis on {} ({} values)",
        infile.display(),
        data.len()
    );

    let paths = OutputPaths::new(infile, config.name.as_deref(), window.label(), statistic);
    paths.check_overwrite(config.overwrite)?;

    let options = ComputeOptions {
        allow_large_window: config.allow_large_window,
        allow_large_input: config.allow_large_input,
    };
    let result = calculate_weighted_windows_with_options(&data, window, statistic, &options)?;

    paths.ensure_dir()?;
    io::write_slice_table_csv(result.sliced(), result.half(), "nodata", paths.sliced_csv())?;
    io::write_slice_table_csv(result.weighted(), result.half(), "", paths.weighted_csv())?;
    io::write_series_csv(result.output(), paths.output_csv())?;

    #[cfg(feature = "excel")]
    io::write_excel_workbook(&result, paths.excel())?;

    #[cfg(feature = "visualization")]
    {
        let window_label = window.to_string();
        if let Err(err) =
            crate::vis::plot_series_png(&data, result.output(), &window_label, paths.plot_png())
        {
            log::warn!("chart render failed: {}", err);
        }

        if config.show_figure {
            crate::vis::show_terminal_chart(&data, result.output());
        }
    }

    log::info!(
        "weighslide analysis finished, output in {}",
        paths.dir().display()
    );

    Ok(RunOutput { result, paths })
}

fn read_input(infile: &Path, config: &RunConfig) -> Result<Series<f64>> {
    let extension = infile
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => io::read_csv_column(infile, config.column.as_deref(), &config.csv),
        "xlsx" => {
            #[cfg(feature = "excel")]
            {
                io::read_excel_column(infile, config.column.as_deref(), &config.excel)
            }
            #[cfg(not(feature = "excel"))]
            {
                Err(Error::Format(
                    "excel support is not compiled in; enable the \"excel\" feature".to_string(),
                ))
            }
        }
        "xls" => Err(Error::Format(
            "legacy .xls workbooks are not supported; save the file as .xlsx".to_string(),
        )),
        other => Err(Error::Format(format!(
            "file type '{}' is not supported; expected a .csv or .xlsx extension",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::na::NA;

    fn write_wave_csv(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("wave.csv");
        let mut content = String::from("position,noisy wave\n");
        for (i, value) in [1.0, 1.5, 1.2, 3.0, 3.4, 2.9, 1.1, 0.9].iter().enumerate() {
            content.push_str(&format!("{},{}\n", i, value));
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_pipeline_writes_all_tabular_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let infile = write_wave_csv(dir.path());

        let mut config = RunConfig::default();
        config.name = Some("wavetest".to_string());
        config.column = Some("noisy wave".to_string());

        let window = WindowSpec::from("9x9");
        let output = run_weighslide(&infile, &window, Statistic::Mean, &config).unwrap();

        assert!(output.paths.sliced_csv().is_file());
        assert!(output.paths.weighted_csv().is_file());
        assert!(output.paths.output_csv().is_file());
        #[cfg(feature = "excel")]
        assert!(output.paths.excel().is_file());

        assert_eq!(output.result.output().len(), 8);

        // position 1 averages its two neighbors (the center is ignored)
        let value = output.result.output().values()[1];
        assert_eq!(value, NA::Value((1.0 + 1.2) / 2.0));

        let content = std::fs::read_to_string(output.paths.output_csv()).unwrap();
        assert!(content.starts_with("position,mean over window\n"));
    }

    #[test]
    fn test_pipeline_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let infile = write_wave_csv(dir.path());

        let mut config = RunConfig::default();
        config.column = Some("noisy wave".to_string());

        let window = WindowSpec::from("999");
        run_weighslide(&infile, &window, Statistic::Sum, &config).unwrap();

        let err = run_weighslide(&infile, &window, Statistic::Sum, &config).unwrap_err();
        assert!(matches!(err, Error::FileExists(_)));

        config.overwrite = true;
        run_weighslide(&infile, &window, Statistic::Sum, &config).unwrap();
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let infile = dir.path().join("data.txt");
        std::fs::write(&infile, "1\n2\n").unwrap();

        let err = run_weighslide(
            &infile,
            &WindowSpec::from("9"),
            Statistic::Mean,
            &RunConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
