//! 차트 색상과 크기.
//!
//! 중국 시장 관례에 따라 상승은 빨강, 하락은 초록이 기본입니다.

use plotters::style::full_palette;
use plotters::style::{RGBColor, BLACK, BLUE, CYAN, MAGENTA, RED, WHITE, YELLOW};
use tracing::warn;

use ashare_core::ChartConfig;

/// 기본 배경 스타일 이름.
pub const DEFAULT_STYLE: &str = "yahoo";

const DEFAULT_GREEN: RGBColor = RGBColor(0, 128, 0);

/// 차트 렌더링 스타일.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// 너비 (px)
    pub width: u32,
    /// 가격+거래량 두 패널 기준 높이 (px)
    pub height: u32,
    /// 상승 캔들
    pub up_color: RGBColor,
    /// 하락 캔들
    pub down_color: RGBColor,
    pub background: RGBColor,
    /// 글자와 축
    pub foreground: RGBColor,
    pub grid: RGBColor,
    /// 이동평균선 색상 (순환)
    pub ma_palette: Vec<RGBColor>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl ChartStyle {
    /// 설정에서 스타일을 만듭니다.
    ///
    /// 알 수 없는 색상이나 스타일 이름은 경고 후 기본값을 사용합니다.
    pub fn from_config(config: &ChartConfig) -> Self {
        let (background, foreground, grid) = base_palette(&config.style);
        Self {
            width: config.width.max(1),
            height: config.height.max(1),
            up_color: color_or(&config.up_color, RED),
            down_color: color_or(&config.down_color, DEFAULT_GREEN),
            background,
            foreground,
            grid,
            ma_palette: vec![
                BLUE,
                full_palette::ORANGE,
                full_palette::PURPLE,
                CYAN,
                MAGENTA,
                YELLOW,
            ],
        }
    }

    /// `index`번째 이동평균선 색상.
    pub fn ma_color(&self, index: usize) -> RGBColor {
        if self.ma_palette.is_empty() {
            return BLUE;
        }
        self.ma_palette[index % self.ma_palette.len()]
    }

    /// 패널 수에 맞춘 전체 높이. 두 패널일 때 `height`입니다.
    pub fn scaled_height(&self, panels: usize) -> u32 {
        let scaled = u64::from(self.height) * panels.max(2) as u64 / 2;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// (배경, 전경, 격자) 색상.
fn base_palette(style: &str) -> (RGBColor, RGBColor, RGBColor) {
    match style.trim().to_lowercase().as_str() {
        "yahoo" => (WHITE, RGBColor(40, 40, 40), RGBColor(230, 230, 230)),
        "classic" => (WHITE, BLACK, RGBColor(200, 200, 200)),
        "charles" => (WHITE, RGBColor(60, 60, 60), RGBColor(220, 220, 220)),
        "ibd" => (WHITE, BLACK, RGBColor(235, 235, 235)),
        "binance" => (
            RGBColor(24, 26, 32),
            RGBColor(234, 236, 239),
            RGBColor(43, 47, 54),
        ),
        other => {
            warn!(style = other, fallback = DEFAULT_STYLE, "Unknown chart style");
            base_palette(DEFAULT_STYLE)
        }
    }
}

fn color_or(name: &str, fallback: RGBColor) -> RGBColor {
    parse_color(name).unwrap_or_else(|| {
        warn!(color = name, "Unknown color, using default");
        fallback
    })
}

/// 색상 이름 또는 `#rrggbb`를 파싱합니다.
pub fn parse_color(name: &str) -> Option<RGBColor> {
    let name = name.trim().to_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }

    let color = match name.as_str() {
        "red" => RED,
        "green" => DEFAULT_GREEN,
        "blue" => BLUE,
        "black" => BLACK,
        "white" => WHITE,
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        "yellow" => YELLOW,
        "orange" => full_palette::ORANGE,
        "purple" => full_palette::PURPLE,
        "gray" | "grey" => full_palette::GREY,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Some(RED));
        assert_eq!(parse_color(" Green "), Some(DEFAULT_GREEN));
        assert_eq!(parse_color("#1e90ff"), Some(RGBColor(0x1e, 0x90, 0xff)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zz0000"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_from_config_falls_back() {
        let config = ChartConfig {
            up_color: "not-a-color".to_string(),
            style: "unknown".to_string(),
            ..ChartConfig::default()
        };
        let style = ChartStyle::from_config(&config);

        assert_eq!(style.up_color, RED);
        assert_eq!(style.down_color, DEFAULT_GREEN);
        assert_eq!(style.background, WHITE);
    }

    #[test]
    fn test_dark_style_and_palette_cycle() {
        let config = ChartConfig {
            style: "binance".to_string(),
            ..ChartConfig::default()
        };
        let style = ChartStyle::from_config(&config);

        assert_ne!(style.background, WHITE);
        assert_eq!(style.ma_color(0), BLUE);
        assert_eq!(style.ma_color(6), BLUE);
    }

    #[test]
    fn test_scaled_height() {
        let style = ChartStyle::default();
        assert_eq!(style.scaled_height(1), 800);
        assert_eq!(style.scaled_height(2), 800);
        assert_eq!(style.scaled_height(5), 2000);
    }
}
