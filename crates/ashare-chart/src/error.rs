//! 차트 에러 타입.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// 차트 렌더링 에러.
#[derive(Debug, Error)]
pub enum ChartError {
    /// 그릴 데이터 없음
    #[error("No data to plot: {0}")]
    EmptyData(String),

    /// 렌더러 에러
    #[error("Render error: {0}")]
    Render(String),

    /// 파일 I/O 에러
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Render(err.to_string())
    }
}

/// 차트 작업 결과 타입.
pub type Result<T> = std::result::Result<T, ChartError>;
