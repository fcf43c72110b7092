//! Output-path construction for a weighslide run.
//!
//! All artifacts of one run land in a `weighslide_output` directory beside
//! the input file, under a shared base name derived from the dataset name
//! and the window label.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::window::Statistic;

/// Directory created beside the input file to hold all run artifacts.
pub const OUTPUT_DIR_NAME: &str = "weighslide_output";

/// Longest prefix of the dataset name and the window label used in file names.
const NAME_LEN_LIMIT: usize = 20;

/// Resolved output paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
    excel: PathBuf,
    sliced_csv: PathBuf,
    weighted_csv: PathBuf,
    output_csv: PathBuf,
    plot_png: PathBuf,
}

impl OutputPaths {
    /// Build the output paths for `infile`.
    ///
    /// The base name is the first 20 characters of the dataset name (the
    /// input file name when no name is given) followed by the first 20
    /// characters of the window label.
    pub fn new(
        infile: &Path,
        name: Option<&str>,
        window_label: &str,
        statistic: Statistic,
    ) -> Self {
        let parent = infile.parent().unwrap_or_else(|| Path::new(""));
        let dir = parent.join(OUTPUT_DIR_NAME);

        let file_name = infile
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_name = name.map(|n| n.to_string()).unwrap_or(file_name);

        let mut base = truncate_chars(&base_name, NAME_LEN_LIMIT);
        base.push_str(&truncate_chars(window_label, NAME_LEN_LIMIT));
        let base_path = dir.join(&base);

        OutputPaths {
            excel: with_suffix(&base_path, ".xlsx"),
            sliced_csv: with_suffix(&base_path, "_sliced.csv"),
            weighted_csv: with_suffix(&base_path, "_mult.csv"),
            output_csv: with_suffix(&base_path, &format!("_{}.csv", statistic)),
            plot_png: with_suffix(&base_path, ".png"),
            dir,
        }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Excel workbook with the slice tables and the output series.
    pub fn excel(&self) -> &Path {
        &self.excel
    }

    /// CSV with the raw slices.
    pub fn sliced_csv(&self) -> &Path {
        &self.sliced_csv
    }

    /// CSV with the weighted slices.
    pub fn weighted_csv(&self) -> &Path {
        &self.weighted_csv
    }

    /// CSV with the reduced output series.
    pub fn output_csv(&self) -> &Path {
        &self.output_csv
    }

    /// PNG chart of input vs output.
    pub fn plot_png(&self) -> &Path {
        &self.plot_png
    }

    /// All file paths a run would write.
    pub fn all_files(&self) -> [&Path; 5] {
        [
            &self.excel,
            &self.sliced_csv,
            &self.weighted_csv,
            &self.output_csv,
            &self.plot_png,
        ]
    }

    /// Fail if any target already exists and overwriting was not requested.
    pub fn check_overwrite(&self, overwrite: bool) -> Result<()> {
        if overwrite {
            return Ok(());
        }
        for path in self.all_files() {
            if path.exists() {
                return Err(Error::FileExists(path.display().to_string()));
            }
        }
        Ok(())
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(Error::Io)
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let paths = OutputPaths::new(
            Path::new("/data/wave.csv"),
            Some("wavetest"),
            "494",
            Statistic::Mean,
        );

        assert_eq!(paths.dir(), Path::new("/data/weighslide_output"));
        assert_eq!(
            paths.excel(),
            Path::new("/data/weighslide_output/wavetest494.xlsx")
        );
        assert_eq!(
            paths.sliced_csv(),
            Path::new("/data/weighslide_output/wavetest494_sliced.csv")
        );
        assert_eq!(
            paths.weighted_csv(),
            Path::new("/data/weighslide_output/wavetest494_mult.csv")
        );
        assert_eq!(
            paths.output_csv(),
            Path::new("/data/weighslide_output/wavetest494_mean.csv")
        );
        assert_eq!(
            paths.plot_png(),
            Path::new("/data/weighslide_output/wavetest494.png")
        );
    }

    #[test]
    fn test_name_defaults_to_file_name() {
        let paths = OutputPaths::new(Path::new("/data/wave.csv"), None, "", Statistic::Sum);
        assert_eq!(
            paths.output_csv(),
            Path::new("/data/weighslide_output/wave.csv_sum.csv")
        );
    }

    #[test]
    fn test_name_and_label_truncation() {
        let paths = OutputPaths::new(
            Path::new("/data/wave.csv"),
            Some("wavetest"),
            "9xxxxx9xxxxx9xxxxx9xxxxx9xxxxx9xxxxx9",
            Statistic::Mean,
        );
        // the window label is cut to its first 20 characters
        assert_eq!(
            paths.plot_png(),
            Path::new("/data/weighslide_output/wavetest9xxxxx9xxxxx9xxxxx9x.png")
        );

        let long_name = "a".repeat(30);
        let paths = OutputPaths::new(
            Path::new("/data/wave.csv"),
            Some(&long_name),
            "",
            Statistic::Mean,
        );
        let expected = format!("/data/weighslide_output/{}.png", "a".repeat(20));
        assert_eq!(paths.plot_png(), Path::new(&expected));
    }

    #[test]
    fn test_overwrite_guard() {
        let dir = tempfile::tempdir().unwrap();
        let infile = dir.path().join("wave.csv");
        let paths = OutputPaths::new(&infile, Some("run"), "494", Statistic::Mean);

        // nothing written yet: both modes pass
        paths.check_overwrite(false).unwrap();
        paths.check_overwrite(true).unwrap();

        paths.ensure_dir().unwrap();
        std::fs::write(paths.output_csv(), "stale").unwrap();

        let err = paths.check_overwrite(false).unwrap_err();
        assert!(matches!(err, Error::FileExists(_)));
        paths.check_overwrite(true).unwrap();
    }
}
