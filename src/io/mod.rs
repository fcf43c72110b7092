pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

// Re-export commonly used functions
pub use csv::{read_csv_column, write_series_csv, write_slice_table_csv, CsvReadOptions};
#[cfg(feature = "excel")]
pub use excel::{read_excel_column, write_excel_workbook, ExcelReadOptions};
