mod na_series;

use std::fmt::Debug;

pub use self::na_series::NASeries;

/// Series構造体: 一次元の値の配列
///
/// 位置は0始まりのオフセットで表します（ラベル付きインデックスは持ちません）。
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T>
where
    T: Debug + Clone,
{
    /// Seriesのデータ値
    values: Vec<T>,

    /// 名前（オプション）
    name: Option<String>,
}

impl<T> Series<T>
where
    T: Debug + Clone,
{
    /// 新しいSeriesをベクトルから作成
    pub fn new(values: Vec<T>, name: Option<String>) -> Self {
        Series { values, name }
    }

    /// Seriesの長さを取得
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Seriesが空かどうか
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 位置から値を取得
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.values.get(pos)
    }

    /// 値の配列を取得
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// 名前を取得
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }
}

// 数値型のSeriesに対する特化実装
impl<T> Series<T>
where
    T: Debug + Clone + Copy + PartialOrd,
{
    /// 最小値を取得
    pub fn min(&self) -> Option<T> {
        self.values
            .iter()
            .copied()
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// 最大値を取得
    pub fn max(&self) -> Option<T> {
        self.values
            .iter()
            .copied()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_basics() {
        let series = Series::new(vec![1.0, 3.0, 2.0], Some("data".to_string()));

        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(series.get(1), Some(&3.0));
        assert_eq!(series.get(3), None);
        assert_eq!(series.name(), Some(&"data".to_string()));
    }

    #[test]
    fn test_series_min_max() {
        let series = Series::new(vec![4.0, -1.0, 2.5], None);

        assert_eq!(series.min(), Some(-1.0));
        assert_eq!(series.max(), Some(4.0));

        let empty: Series<f64> = Series::new(vec![], None);
        assert_eq!(empty.min(), None);
        assert_eq!(empty.max(), None);
    }
}
