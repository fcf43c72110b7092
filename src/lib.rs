//! Weighted sliding-window analysis of one-dimensional numerical series.
//!
//! Weighslide takes a 1D series of numbers and applies a user-defined
//! weighting in a sliding-window fashion across the data, reducing each
//! weighted window to a single value with a chosen statistic.
//!
//! For example, with the window `[2, 5, 2]` and the statistic `sum` over the
//! series `[0, 0, 0, 1, 1, 2, 3, 5, 8, 13, 21]`, the series is sliced as
//! `[NA 0 0]`, `[0 0 0]`, `[0 0 1]`, … until the final `[13 21 NA]`. Each
//! slice is multiplied element-wise with the window and reduced; the result
//! replaces the central position in the output series. The `NA` padding at
//! the boundaries is excluded from every calculation, so the first and last
//! values do not represent full-length windows.
//!
//! ```
//! use weighslide::{calculate_weighted_windows, Series, Statistic, WindowSpec};
//!
//! let data = Series::new(
//!     vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0],
//!     None,
//! );
//! let window = WindowSpec::from(vec![2.0, 5.0, 2.0]);
//! let result = calculate_weighted_windows(&data, &window, Statistic::Sum).unwrap();
//!
//! assert_eq!(result.output().len(), data.len());
//! // position 5 holds value 2 with neighbors 1 and 3: 1*2 + 2*5 + 3*2
//! assert_eq!(result.output().values()[5].value(), Some(&18.0));
//! ```
//!
//! Windows can also be given as compact digit patterns: `"494"` weights the
//! center fully and the neighbors by half, `"9x9"` averages the two direct
//! neighbors and ignores the center. See [`WindowSpec`].
//!
//! The algorithm is O(N·L) and deliberately unoptimized; it is meant for
//! short series (thousands of values). Size guards reject oversized windows
//! and inputs unless explicitly overridden, see [`ComputeOptions`].

pub mod error;
pub mod io;
pub mod na;
pub mod output;
pub mod run;
pub mod series;
#[cfg(feature = "visualization")]
pub mod vis;
pub mod window;

// Re-export commonly used types
pub use error::{Error, Result};
pub use na::NA;
pub use output::OutputPaths;
pub use run::{run_weighslide, RunConfig, RunOutput};
pub use series::{NASeries, Series};
pub use window::{
    calculate_weighted_windows, calculate_weighted_windows_with_options, ComputeOptions,
    Statistic, WeightedWindows, WindowSpec,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
