//! K선 및 기술 지표 차트 렌더링.
//!
//! 이 crate는 다음을 제공합니다:
//! - 캔들 + 거래량 기본 차트 (SVG)
//! - 이동평균, 볼린저 밴드, MACD, RSI, KDJ 패널이 포함된 지표 차트 (SVG)
//! - 브라우저에서 바로 열 수 있는 단독 HTML 차트

pub mod candlestick;
pub mod error;
pub mod html;
pub mod indicators;
mod panels;
pub mod style;

pub use candlestick::{plot_candlestick, CANDLE_VOLUME_RATIOS};
pub use error::{ChartError, Result};
pub use html::{chart_title, html_file_name, save_plot_to_html};
pub use indicators::{panel_layout, plot_with_indicators, Panel};
pub use style::{parse_color, ChartStyle};
