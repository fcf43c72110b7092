use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::{NASeries, Series};

/// CSV読み込みオプション
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvReadOptions {
    /// フィールドの区切り文字
    pub delimiter: u8,
    /// ヘッダー行があるかどうか
    pub has_header: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        CsvReadOptions {
            delimiter: b',',
            has_header: true,
        }
    }
}

/// CSVファイルから数値データ列を読み込む
///
/// ファイルに列が1つだけある場合はその列を使用します。複数列ある場合は
/// `column` で列名を指定する必要があります。ヘッダーがない場合の列名は
/// "column_0" のように生成されます。
pub fn read_csv_column<P: AsRef<Path>>(
    path: P,
    column: Option<&str>,
    options: &CsvReadOptions,
) -> Result<Series<f64>> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    // CSVリーダーを設定
    let mut rdr = ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    // ヘッダー行を取得（レコードを読み出す前に取得する必要がある）
    let mut headers: Vec<String> = if options.has_header {
        rdr.headers()
            .map_err(Error::Csv)?
            .iter()
            .map(|h| h.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result.map_err(Error::Csv)?);
    }

    // ヘッダーがない場合は、最初の行から列数を推測して列名を生成
    if !options.has_header {
        let width = records.first().map(|r| r.len()).unwrap_or(0);
        headers = (0..width).map(|i| format!("column_{}", i)).collect();
    }

    if headers.is_empty() {
        return Err(Error::EmptyData(format!(
            "入力ファイル {} にデータが見つかりません",
            path.as_ref().display()
        )));
    }

    let col_idx = select_column(&headers, column)?;
    let name = headers[col_idx].clone();

    let mut values = Vec::with_capacity(records.len());
    for (row_idx, record) in records.iter().enumerate() {
        let cell = record.get(col_idx).unwrap_or("");
        let value = cell.trim().parse::<f64>().map_err(|_| {
            Error::Cast(format!(
                "列 '{}' の値 '{}' を数値に変換できません (行 {})",
                name, cell, row_idx
            ))
        })?;
        values.push(value);
    }

    Ok(Series::new(values, Some(name)))
}

/// 列名から列の位置を解決する
pub(crate) fn select_column(headers: &[String], column: Option<&str>) -> Result<usize> {
    match column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string())),
        None => {
            if headers.len() == 1 {
                Ok(0)
            } else {
                Err(Error::ColumnNotSpecified(format!(
                    "入力ファイルには {} 列あります。column でデータ列の名前を指定してください",
                    headers.len()
                )))
            }
        }
    }
}

/// 出力系列をCSVファイルに書き込む
///
/// 1列目は位置、2列目は値。欠損値は空文字列で出力します。
pub fn write_series_csv<P: AsRef<Path>>(series: &NASeries<f64>, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    let header = series.name().map(|s| s.as_str()).unwrap_or("value");
    wtr.write_record(["position", header]).map_err(Error::Csv)?;

    for (i, value) in series.values().iter().enumerate() {
        let cell = match value {
            NA::Value(v) => v.to_string(),
            NA::NA => String::new(),
        };
        wtr.write_record([i.to_string(), cell]).map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

/// スライス表をCSVファイルに書き込む
///
/// 列は各ウィンドウ（"window 0"、"window 1"…）、行はウィンドウ中心からの
/// 相対オフセット（-half..=half）。欠損値は `missing_repr` で出力します。
pub fn write_slice_table_csv<P: AsRef<Path>>(
    table: &[Vec<NA<f64>>],
    half: usize,
    missing_repr: &str,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    let mut header = vec!["offset".to_string()];
    header.extend((0..table.len()).map(|i| format!("window {}", i)));
    wtr.write_record(&header).map_err(Error::Csv)?;

    let window_length = 2 * half + 1;
    for row_idx in 0..window_length {
        let offset = row_idx as isize - half as isize;
        let mut record = vec![offset.to_string()];
        for column in table {
            let cell = match column[row_idx] {
                NA::Value(v) => v.to_string(),
                NA::NA => missing_repr.to_string(),
            };
            record.push(cell);
        }
        wtr.write_record(&record).map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_single_column() {
        let file = write_temp_csv("value\n1.0\n2.5\n-3.0\n");
        let series =
            read_csv_column(file.path(), None, &CsvReadOptions::default()).unwrap();

        assert_eq!(series.values(), &[1.0, 2.5, -3.0]);
        assert_eq!(series.name(), Some(&"value".to_string()));
    }

    #[test]
    fn test_read_named_column() {
        let file = write_temp_csv("position,noisy wave\n0,1.5\n1,2.5\n");
        let series = read_csv_column(
            file.path(),
            Some("noisy wave"),
            &CsvReadOptions::default(),
        )
        .unwrap();

        assert_eq!(series.values(), &[1.5, 2.5]);
    }

    #[test]
    fn test_multiple_columns_require_name() {
        let file = write_temp_csv("a,b\n1,2\n");
        let err = read_csv_column(file.path(), None, &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ColumnNotSpecified(_)));
    }

    #[test]
    fn test_missing_column() {
        let file = write_temp_csv("a,b\n1,2\n");
        let err =
            read_csv_column(file.path(), Some("c"), &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(ref name) if name == "c"));
    }

    #[test]
    fn test_read_without_header() {
        let file = write_temp_csv("1.0\n2.0\n3.0\n");
        let options = CsvReadOptions {
            has_header: false,
            ..CsvReadOptions::default()
        };
        let series = read_csv_column(file.path(), None, &options).unwrap();

        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.name(), Some(&"column_0".to_string()));
    }

    #[test]
    fn test_unparseable_cell() {
        let file = write_temp_csv("value\n1.0\nabc\n");
        let err = read_csv_column(file.path(), None, &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Cast(_)));
    }

    #[test]
    fn test_write_series_csv() {
        let series = NASeries::from_options(
            vec![Some(1.0), None, Some(3.0)],
            Some("sum over window".to_string()),
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_series_csv(&series, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "position,sum over window");
        assert_eq!(lines[1], "0,1");
        assert_eq!(lines[2], "1,");
        assert_eq!(lines[3], "2,3");
    }

    #[test]
    fn test_write_slice_table_csv() {
        let table = vec![
            vec![NA::NA, NA::Value(1.0), NA::Value(2.0)],
            vec![NA::Value(1.0), NA::Value(2.0), NA::NA],
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sliced.csv");

        write_slice_table_csv(&table, 1, "nodata", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "offset,window 0,window 1");
        assert_eq!(lines[1], "-1,nodata,1");
        assert_eq!(lines[2], "0,1,2");
        assert_eq!(lines[3], "1,2,nodata");
    }
}
