//! 일봉 수집과 시각화를 위한 도메인 모델.

mod market_data;
mod stock_basic;

pub use market_data::*;
pub use stock_basic::*;
