//! Sliding weighted-window reduction over one-dimensional series.
//!
//! For each position of the input series a fixed odd-length neighborhood is
//! sliced out, multiplied element-wise by a user-defined weight vector, and
//! reduced to a single value with the selected [`Statistic`]. The boundaries
//! of the series are padded with [`NA`] so that every position has a
//! full-length window available; padded entries never participate in the
//! reduction.
//!
//! ```
//! use weighslide::{calculate_weighted_windows, Series, Statistic, WindowSpec};
//!
//! let data = Series::new(vec![1.0, 2.0, 3.0, 4.0], None);
//! let window = WindowSpec::from(vec![2.0, 5.0, 2.0]);
//! let result = calculate_weighted_windows(&data, &window, Statistic::Sum).unwrap();
//! // position 1: 1*2 + 2*5 + 3*2
//! assert_eq!(result.output().values()[1].value(), Some(&18.0));
//! ```

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::{NASeries, Series};

/// Character in a pattern window marking a position excluded from the reduction.
pub const IGNORE_CHAR: char = 'x';

/// Longest window accepted without the `allow_large_window` override.
pub const MAX_WINDOW_LEN: usize = 100;

/// Input length above which a performance warning is logged.
pub const INPUT_WARN_LEN: usize = 1000;

/// Longest input accepted without the `allow_large_input` override.
pub const MAX_INPUT_LEN: usize = 10_000;

/// User-supplied window specification.
///
/// A window describes both the size of the neighborhood sliced out around
/// each position and the weight of every value in that slice.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSpec {
    /// Compact digit pattern such as `"494"` or `"9xxxxx9"`.
    ///
    /// Each digit `d` carries the weight `(d + 1) / 10`, so the scale runs
    /// from `0.1` (digit 0) to `1.0` (digit 9). The character
    /// [`IGNORE_CHAR`] marks a position excluded from the reduction.
    Pattern(String),

    /// Explicit weights; `NA` marks ignored positions. Values pass through
    /// to the weight vector unchanged.
    Weights(Vec<NA<f64>>),
}

impl WindowSpec {
    /// Number of positions the window covers.
    pub fn len(&self) -> usize {
        match self {
            WindowSpec::Pattern(pattern) => pattern.chars().count(),
            WindowSpec::Weights(weights) => weights.len(),
        }
    }

    /// Whether the window covers no positions at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label used in output file names.
    ///
    /// Explicit weight lists make unreadable file names, so only pattern
    /// windows contribute a label.
    pub fn label(&self) -> &str {
        match self {
            WindowSpec::Pattern(pattern) => pattern,
            WindowSpec::Weights(_) => "",
        }
    }

    /// Build the numeric weight vector for this specification.
    ///
    /// Validation order: a zero-length window fails with
    /// [`Error::EmptyWindow`]; an even-length window fails with
    /// [`Error::EvenWindowLength`] (no unambiguous center position would
    /// exist); a window longer than [`MAX_WINDOW_LEN`] fails with
    /// [`Error::WindowTooLong`] unless `allow_large_window` is set.
    pub fn build_weights(&self, allow_large_window: bool) -> Result<Vec<NA<f64>>> {
        let weights = match self {
            WindowSpec::Pattern(pattern) => {
                let mut weights = Vec::with_capacity(pattern.chars().count());
                for ch in pattern.chars() {
                    if ch == IGNORE_CHAR {
                        weights.push(NA::NA);
                    } else if let Some(digit) = ch.to_digit(10) {
                        weights.push(NA::Value((digit as f64 + 1.0) / 10.0));
                    } else {
                        return Err(Error::InvalidSpecification(format!(
                            "character '{}' is neither a digit nor '{}'",
                            ch, IGNORE_CHAR
                        )));
                    }
                }
                weights
            }
            WindowSpec::Weights(weights) => weights.clone(),
        };

        validate_window_length(weights.len(), allow_large_window)?;
        Ok(weights)
    }
}

impl From<&str> for WindowSpec {
    fn from(pattern: &str) -> Self {
        WindowSpec::Pattern(pattern.to_string())
    }
}

impl From<String> for WindowSpec {
    fn from(pattern: String) -> Self {
        WindowSpec::Pattern(pattern)
    }
}

impl From<Vec<f64>> for WindowSpec {
    fn from(weights: Vec<f64>) -> Self {
        WindowSpec::Weights(weights.into_iter().map(NA::Value).collect())
    }
}

impl From<Vec<Option<f64>>> for WindowSpec {
    fn from(weights: Vec<Option<f64>>) -> Self {
        WindowSpec::Weights(weights.into_iter().map(NA::from).collect())
    }
}

impl From<Vec<NA<f64>>> for WindowSpec {
    fn from(weights: Vec<NA<f64>>) -> Self {
        WindowSpec::Weights(weights)
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Pattern(pattern) => write!(f, "{}", pattern),
            WindowSpec::Weights(weights) => {
                let items: Vec<String> = weights
                    .iter()
                    .map(|w| match w.value() {
                        Some(v) => v.to_string(),
                        None => IGNORE_CHAR.to_string(),
                    })
                    .collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

fn validate_window_length(length: usize, allow_large_window: bool) -> Result<()> {
    if length == 0 {
        return Err(Error::EmptyWindow);
    }
    if length % 2 == 0 {
        return Err(Error::EvenWindowLength { length });
    }
    if length > MAX_WINDOW_LEN && !allow_large_window {
        return Err(Error::WindowTooLong { length });
    }
    Ok(())
}

/// Reduction applied to each weighted slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Arithmetic mean of the non-missing weighted values.
    Mean,
    /// Sample standard deviation (ddof = 1) of the non-missing weighted values.
    Std,
    /// Sum of the non-missing weighted values.
    Sum,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => write!(f, "mean"),
            Statistic::Std => write!(f, "std"),
            Statistic::Sum => write!(f, "sum"),
        }
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Statistic::Mean),
            "std" => Ok(Statistic::Std),
            "sum" => Ok(Statistic::Sum),
            other => Err(Error::UnknownStatistic(other.to_string())),
        }
    }
}

/// Overrides for the size guards of [`calculate_weighted_windows`].
///
/// Both guards exist to catch accidental misuse of an O(N·L) algorithm that
/// has not been optimized for scale; lifting them is "use at your own risk".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComputeOptions {
    /// Accept windows longer than [`MAX_WINDOW_LEN`].
    pub allow_large_window: bool,
    /// Accept inputs longer than [`MAX_INPUT_LEN`].
    pub allow_large_input: bool,
}

/// Full result of a sliding weighted-window reduction.
///
/// Besides the reduced output series this carries the weight vector and the
/// per-position slice tables, which downstream consumers export for
/// diagnostic inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWindows {
    weights: Vec<NA<f64>>,
    sliced: Vec<Vec<NA<f64>>>,
    weighted: Vec<Vec<NA<f64>>>,
    output: NASeries<f64>,
    statistic: Statistic,
    half: usize,
}

impl WeightedWindows {
    /// The numeric weight vector built from the window specification.
    pub fn weights(&self) -> &[NA<f64>] {
        &self.weights
    }

    /// Raw slice per position; boundary slices contain `NA` padding.
    pub fn sliced(&self) -> &[Vec<NA<f64>>] {
        &self.sliced
    }

    /// Element-wise product of each slice with the weight vector.
    pub fn weighted(&self) -> &[Vec<NA<f64>>] {
        &self.weighted
    }

    /// The reduced output series, one value per input position.
    pub fn output(&self) -> &NASeries<f64> {
        &self.output
    }

    /// The reduction that produced [`Self::output`].
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Number of positions on either side of the window center.
    pub fn half(&self) -> usize {
        self.half
    }

    /// Window length (always odd).
    pub fn window_len(&self) -> usize {
        self.weights.len()
    }

    /// Whether position `i` was reduced from a boundary-truncated window.
    ///
    /// The first and last `half` positions are computed from slices that
    /// extend past the input and are padded with `NA`; their values carry
    /// less support than interior ones and should not be treated as
    /// equivalent in confidence.
    pub fn is_boundary(&self, i: usize) -> bool {
        i < self.half || i + self.half >= self.output.len()
    }
}

/// Run the sliding weighted-window reduction with default options.
///
/// See [`calculate_weighted_windows_with_options`] for the full contract.
pub fn calculate_weighted_windows(
    data: &Series<f64>,
    window: &WindowSpec,
    statistic: Statistic,
) -> Result<WeightedWindows> {
    calculate_weighted_windows_with_options(data, window, statistic, &ComputeOptions::default())
}

/// Run the sliding weighted-window reduction.
///
/// For every position `i` of `data` a window of the specification's length,
/// centered on `i`, is sliced out of the series (positions past either end
/// pad with `NA`), multiplied element-wise with the weight vector, and
/// reduced with `statistic`. Missing values propagate through the product
/// and are excluded from the reduction, never counted as zero.
///
/// The output series always has the same length as the input. The first and
/// last `half` positions are computed from partial windows; see
/// [`WeightedWindows::is_boundary`].
///
/// Inputs longer than [`INPUT_WARN_LEN`] log a performance warning; inputs
/// longer than [`MAX_INPUT_LEN`] fail with [`Error::InputTooLarge`] unless
/// `options.allow_large_input` is set. The call either returns a fully
/// populated result or fails; there are no partial results.
pub fn calculate_weighted_windows_with_options(
    data: &Series<f64>,
    window: &WindowSpec,
    statistic: Statistic,
    options: &ComputeOptions,
) -> Result<WeightedWindows> {
    let weights = window.build_weights(options.allow_large_window)?;
    let window_length = weights.len();
    let half = (window_length - 1) / 2;

    let n = data.len();
    if n > INPUT_WARN_LEN {
        log::warn!(
            "input data length is {}, weighslide performance may be slow",
            n
        );
        if n > MAX_INPUT_LEN && !options.allow_large_input {
            return Err(Error::InputTooLarge { length: n });
        }
    }

    let values = data.values();
    // Every position is independent and read-only with respect to the input
    // and the weight vector, so the per-position loop runs in parallel.
    let rows: Vec<(Vec<NA<f64>>, Vec<NA<f64>>, NA<f64>)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let sliced = padded_slice(values, i, half);
            assert_eq!(
                sliced.len(),
                window_length,
                "slice length diverged from window length"
            );
            let weighted: Vec<NA<f64>> = sliced
                .iter()
                .zip(weights.iter())
                .map(|(value, weight)| *value * *weight)
                .collect();
            let reduced = apply_statistic(&weighted, statistic);
            (sliced, weighted, reduced)
        })
        .collect();

    let mut sliced = Vec::with_capacity(n);
    let mut weighted = Vec::with_capacity(n);
    let mut output_values = Vec::with_capacity(n);
    for (s, w, reduced) in rows {
        sliced.push(s);
        weighted.push(w);
        output_values.push(reduced);
    }

    let output = NASeries::new(output_values, Some(format!("{} over window", statistic)));

    Ok(WeightedWindows {
        weights,
        sliced,
        weighted,
        output,
        statistic,
        half,
    })
}

/// Length `2 * half + 1` slice of `values` centered on `center`.
///
/// Positions falling outside the series yield `NA`, symmetrically on both
/// sides.
fn padded_slice(values: &[f64], center: usize, half: usize) -> Vec<NA<f64>> {
    let len = values.len() as isize;
    let center = center as isize;
    let half = half as isize;

    (center - half..=center + half)
        .map(|pos| {
            if pos < 0 || pos >= len {
                NA::NA
            } else {
                NA::Value(values[pos as usize])
            }
        })
        .collect()
}

fn apply_statistic(weighted: &[NA<f64>], statistic: Statistic) -> NA<f64> {
    let slice = NASeries::new(weighted.to_vec(), None);
    match statistic {
        Statistic::Mean => slice.mean(),
        Statistic::Std => slice.std(1),
        Statistic::Sum => slice.sum(),
    }
}
