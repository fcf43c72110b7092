use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use simple_excel_writer::{Row, Workbook};

use crate::error::{Error, Result};
use crate::io::csv::select_column;
use crate::na::NA;
use crate::series::Series;
use crate::window::WeightedWindows;

/// Excel読み込みオプション
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelReadOptions {
    /// 読み込むシート名。Noneの場合は最初のシート
    pub sheet_name: Option<String>,
    /// 読み込み開始前にスキップする行数
    pub skip_rows: usize,
    /// ヘッダー行があるかどうか
    pub has_header: bool,
}

impl Default for ExcelReadOptions {
    fn default() -> Self {
        ExcelReadOptions {
            sheet_name: None,
            skip_rows: 0,
            has_header: true,
        }
    }
}

/// Excel (.xlsx) ファイルから数値データ列を読み込む
///
/// 列の選択規則はCSVと同じです: 列が1つだけならその列、複数列なら
/// `column` で列名を指定します。
pub fn read_excel_column<P: AsRef<Path>>(
    path: P,
    column: Option<&str>,
    options: &ExcelReadOptions,
) -> Result<Series<f64>> {
    // ファイルを開く
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path.as_ref())
        .map_err(|e| Error::IoError(format!("Excelファイルを開けませんでした: {}", e)))?;

    // シート名を取得（指定がなければ最初のシート）
    let sheet_name = match &options.sheet_name {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .ok_or_else(|| Error::EmptyData("Excelファイルにシートがありません".to_string()))?
            .clone(),
    };

    // シートを取得
    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        Error::IoError(format!(
            "シート '{}' を読み込めませんでした: {}",
            sheet_name, e
        ))
    })?;

    let rows: Vec<_> = range.rows().skip(options.skip_rows).collect();
    if rows.is_empty() {
        return Err(Error::EmptyData(format!(
            "シート '{}' にデータが見つかりません",
            sheet_name
        )));
    }

    // 列名を取得（ヘッダーがない場合は列番号から生成）
    let (headers, data_rows): (Vec<String>, &[&[DataType]]) = if options.has_header {
        let headers = rows[0].iter().map(|cell| cell.to_string()).collect();
        (headers, &rows[1..])
    } else {
        let headers = (0..rows[0].len()).map(|i| format!("column_{}", i)).collect();
        (headers, &rows[..])
    };

    let col_idx = select_column(&headers, column)?;
    let name = headers[col_idx].clone();

    let mut values = Vec::with_capacity(data_rows.len());
    for (row_idx, row) in data_rows.iter().enumerate() {
        let cell = row.get(col_idx).unwrap_or(&DataType::Empty);
        let value = match cell.get_float() {
            Some(v) => v,
            None => cell.to_string().trim().parse::<f64>().map_err(|_| {
                Error::Cast(format!(
                    "列 '{}' の値 '{}' を数値に変換できません (行 {})",
                    name, cell, row_idx
                ))
            })?,
        };
        values.push(value);
    }

    Ok(Series::new(values, Some(name)))
}

/// 計算結果をExcelワークブックとして書き込む
///
/// シート名は元の出力形式との互換のため "orig_data_sliced"、
/// "data_multipled"、"window_{statistic}" を使用します
/// （"multipled" の綴りは下流の利用側がシート名で照合するため維持）。
pub fn write_excel_workbook<P: AsRef<Path>>(result: &WeightedWindows, path: P) -> Result<()> {
    let path_str = path
        .as_ref()
        .to_str()
        .ok_or_else(|| Error::IoError("ファイルパスを文字列に変換できませんでした".to_string()))?;
    let mut workbook = Workbook::create(path_str);

    write_table_sheet(
        &mut workbook,
        "orig_data_sliced",
        result.sliced(),
        result.half(),
        "nodata",
    )?;
    write_table_sheet(
        &mut workbook,
        "data_multipled",
        result.weighted(),
        result.half(),
        "",
    )?;

    // 出力系列のシート
    let column_name = format!("window_{}", result.statistic());
    let mut sheet = workbook.create_sheet(&column_name);
    workbook
        .write_sheet(&mut sheet, |sheet_writer| {
            let mut header = Row::new();
            header.add_cell("position");
            header.add_cell(column_name.as_str());
            sheet_writer.append_row(header)?;

            for (i, value) in result.output().values().iter().enumerate() {
                let mut row = Row::new();
                row.add_cell(i as f64);
                match value {
                    NA::Value(v) => row.add_cell(*v),
                    NA::NA => row.add_cell(""),
                }
                sheet_writer.append_row(row)?;
            }
            Ok(())
        })
        .map_err(|e| Error::IoError(format!("Excelシートを書き込めませんでした: {}", e)))?;

    // ワークブックを閉じて保存
    workbook
        .close()
        .map_err(|e| Error::IoError(format!("Excelファイルを保存できませんでした: {}", e)))?;

    Ok(())
}

/// スライス表をシートとして書き込む（レイアウトはCSV出力と同じ）
fn write_table_sheet(
    workbook: &mut Workbook,
    name: &str,
    table: &[Vec<NA<f64>>],
    half: usize,
    missing_repr: &str,
) -> Result<()> {
    let mut sheet = workbook.create_sheet(name);
    workbook
        .write_sheet(&mut sheet, |sheet_writer| {
            let mut header = Row::new();
            header.add_cell("offset");
            for i in 0..table.len() {
                header.add_cell(format!("window {}", i));
            }
            sheet_writer.append_row(header)?;

            let window_length = 2 * half + 1;
            for row_idx in 0..window_length {
                let mut row = Row::new();
                row.add_cell((row_idx as isize - half as isize).to_string());
                for column in table {
                    match column[row_idx] {
                        NA::Value(v) => row.add_cell(v),
                        NA::NA => row.add_cell(missing_repr),
                    }
                }
                sheet_writer.append_row(row)?;
            }
            Ok(())
        })
        .map_err(|e| Error::IoError(format!("Excelシートを書き込めませんでした: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{calculate_weighted_windows, Statistic, WindowSpec};

    #[test]
    fn test_write_workbook_and_read_back_sheet_names() {
        let data = Series::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], None);
        let result =
            calculate_weighted_windows(&data, &WindowSpec::from("494"), Statistic::Sum).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.xlsx");
        write_excel_workbook(&result, &path).unwrap();

        let workbook: Xlsx<BufReader<File>> = open_workbook(&path).unwrap();
        let sheet_names = workbook.sheet_names().to_vec();
        assert!(sheet_names.contains(&"orig_data_sliced".to_string()));
        assert!(sheet_names.contains(&"data_multipled".to_string()));
        assert!(sheet_names.contains(&"window_sum".to_string()));
    }

    #[test]
    fn test_round_trip_column_values() {
        let data = Series::new(vec![1.0, 2.0, 3.0], None);
        let result =
            calculate_weighted_windows(&data, &WindowSpec::from("9"), Statistic::Sum).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.xlsx");
        write_excel_workbook(&result, &path).unwrap();

        // 出力シートの値列を読み戻す
        let options = ExcelReadOptions {
            sheet_name: Some("window_sum".to_string()),
            ..ExcelReadOptions::default()
        };
        let series = read_excel_column(&path, Some("window_sum"), &options).unwrap();
        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
    }
}
