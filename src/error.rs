use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("無効なウィンドウ指定です: {0}")]
    InvalidSpecification(String),

    #[error("ウィンドウ長が0です。window入力変数を確認してください")]
    EmptyWindow,

    #[error("ウィンドウ長 ({length}) が偶数です。結果が単一の中心位置に対応するよう、奇数長のウィンドウのみ受け付けます")]
    EvenWindowLength { length: usize },

    #[error("ウィンドウ長 ({length}) が上限 (100) を超えています。実行するには allow_large_window を設定してください")]
    WindowTooLong { length: usize },

    #[error("統計量 '{0}' は認識できません。mean、std、sum のいずれかを指定してください")]
    UnknownStatistic(String),

    #[error("入力データ長 ({length}) が上限 (10000) を超えています。実行するには allow_large_input を設定してください")]
    InputTooLarge { length: usize },

    #[error("入出力エラー: {0}")]
    IoError(String),

    #[error("入出力エラー")]
    Io(#[source] std::io::Error),

    #[error("CSVエラー")]
    Csv(#[source] csv::Error),

    #[error("型変換エラー: {0}")]
    Cast(String),

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("列名が指定されていません: {0}")]
    ColumnNotSpecified(String),

    #[error("データがありません: {0}")]
    EmptyData(String),

    #[error("出力ファイルが既に存在します: {0}。上書きするには overwrite を設定してください")]
    FileExists(String),

    #[error("データ形式エラー: {0}")]
    Format(String),

    #[error("無効な入力です: {0}")]
    InvalidInput(String),

    #[error("可視化エラー: {0}")]
    Visualization(String),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

// Plottersエラーの変換
#[cfg(feature = "visualization")]
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("プロット描画エラー: {}", err))
    }
}
