use std::fmt::{self, Debug, Display};
use std::ops::Mul;

/// 欠損値（NA, Not Available）を表現する型
///
/// 欠損値を浮動小数点のNaNではなく型システムで表現します。NAは集計から
/// 除外される値であり、ゼロとしては扱われません。スライスや重み付けの
/// 過程で伝播し、統計量の計算には一切参加しません。
#[derive(Clone, Copy)]
pub enum NA<T> {
    /// 値が存在する場合
    Value(T),
    /// 値が存在しない場合
    NA,
}

impl<T> NA<T> {
    /// 値が欠損かどうかをチェック
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    /// 値が存在するかどうかをチェック
    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    /// 値を取得（存在する場合）
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

// From実装：T型からNA<T>への自動変換
impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

// From実装：Option<T>からNA<T>への自動変換
impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

// Into実装：NA<T>からOption<T>への自動変換
impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

// Debug実装
impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

// Display実装
impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

// PartialEq実装
impl<T: PartialEq> PartialEq for NA<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a == b,
            (NA::NA, NA::NA) => true,
            _ => false,
        }
    }
}

// 数値演算の実装（Mul）
// 重み付けに使う要素ごとの積。どちらかがNAならNAを返す
impl<T: Mul<Output = T>> Mul for NA<T> {
    type Output = NA<T>;

    fn mul(self, other: Self) -> Self::Output {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => NA::Value(a * b),
            _ => NA::NA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_detection() {
        let value: NA<f64> = NA::Value(1.5);
        let missing: NA<f64> = NA::NA;

        assert!(value.is_value());
        assert!(!value.is_na());
        assert!(missing.is_na());
        assert_eq!(value.value(), Some(&1.5));
        assert_eq!(missing.value(), None);
    }

    #[test]
    fn test_mul_propagates_na() {
        let a: NA<f64> = NA::Value(2.0);
        let b: NA<f64> = NA::Value(5.0);
        let missing: NA<f64> = NA::NA;

        assert_eq!(a * b, NA::Value(10.0));
        assert_eq!(a * missing, NA::NA);
        assert_eq!(missing * b, NA::NA);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(NA::from(3.0), NA::Value(3.0));
        assert_eq!(NA::<f64>::from(None), NA::NA);
        assert_eq!(Option::<f64>::from(NA::Value(3.0)), Some(3.0));
        assert_eq!(Option::<f64>::from(NA::<f64>::NA), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", NA::Value(2.5)), "2.5");
        assert_eq!(format!("{}", NA::<f64>::NA), "NA");
    }
}
