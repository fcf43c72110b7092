use num_traits::NumCast;
use std::fmt::Debug;
use std::iter::Sum;
use std::ops::Div;

use crate::na::NA;

/// 欠損値をサポートするSeries構造体
///
/// すべての集計メソッドはNAを除外して計算します（NAをゼロとは扱いません）。
#[derive(Debug, Clone, PartialEq)]
pub struct NASeries<T>
where
    T: Debug + Clone,
{
    /// Seriesのデータ値（NA型でラップ）
    values: Vec<NA<T>>,

    /// 名前（オプション）
    name: Option<String>,
}

impl<T> NASeries<T>
where
    T: Debug + Clone,
{
    /// 新しいNASeriesをベクトルから作成
    pub fn new(values: Vec<NA<T>>, name: Option<String>) -> Self {
        NASeries { values, name }
    }

    /// 通常のベクトルから作成（NAを含まない）
    pub fn from_vec(values: Vec<T>, name: Option<String>) -> Self {
        let na_values = values.into_iter().map(NA::Value).collect();
        Self::new(na_values, name)
    }

    /// Optionベクトルから作成（Noneを含む可能性あり）
    pub fn from_options(values: Vec<Option<T>>, name: Option<String>) -> Self {
        let na_values = values.into_iter().map(NA::from).collect();
        Self::new(na_values, name)
    }

    /// NASeriesの長さを取得
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// NASeriesが空かどうか
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 位置から値を取得
    pub fn get(&self, pos: usize) -> Option<&NA<T>> {
        self.values.get(pos)
    }

    /// 値の配列を取得
    pub fn values(&self) -> &[NA<T>] {
        &self.values
    }

    /// 名前を取得
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// NAの個数を取得
    pub fn na_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    /// 値が存在する個数を取得
    pub fn value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_value()).count()
    }

    /// NAを含むかどうか
    pub fn has_na(&self) -> bool {
        self.values.iter().any(|v| v.is_na())
    }
}

// 数値型のNASeriesに対する特化実装
impl<T> NASeries<T>
where
    T: Debug + Clone + Copy + Sum<T> + PartialOrd + Div<Output = T> + NumCast,
{
    /// NAを除いた値を取り出す
    fn valid_values(&self) -> Vec<T> {
        self.values
            .iter()
            .filter_map(|v| v.value().copied())
            .collect()
    }

    /// 合計を計算（NAは無視）
    ///
    /// すべてNAの場合は空の合計、つまり加法単位元（ゼロ）を返します。
    pub fn sum(&self) -> NA<T> {
        NA::Value(self.valid_values().into_iter().sum())
    }

    /// 平均を計算（NAは無視）
    pub fn mean(&self) -> NA<T> {
        let values = self.valid_values();
        if values.is_empty() {
            return NA::NA;
        }

        let total: T = values.iter().copied().sum();
        let count: T = match num_traits::cast(values.len()) {
            Some(n) => n,
            None => return NA::NA,
        };

        NA::Value(total / count)
    }

    /// 最小値を計算（NAは無視）
    pub fn min(&self) -> NA<T> {
        let values = self.valid_values();
        values
            .into_iter()
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(NA::Value)
            .unwrap_or(NA::NA)
    }

    /// 最大値を計算（NAは無視）
    pub fn max(&self) -> NA<T> {
        let values = self.valid_values();
        values
            .into_iter()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(NA::Value)
            .unwrap_or(NA::NA)
    }
}

impl NASeries<f64> {
    /// 標本標準偏差を計算（NAは無視）
    ///
    /// `ddof` は自由度の補正値（pandasと同じく既定は1を想定）。
    /// 非欠損値の個数が `ddof` 以下の場合はNAを返します。
    pub fn std(&self, ddof: usize) -> NA<f64> {
        let values = self.valid_values();
        if values.len() <= ddof {
            return NA::NA;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values
            .iter()
            .map(|v| (*v - mean).powi(2))
            .sum::<f64>()
            / (values.len() - ddof) as f64;

        NA::Value(variance.sqrt())
    }
}
