//! 워크스페이스 전반에서 사용되는 공통 타입.

mod trade_date;
mod ts_code;

pub use trade_date::*;
pub use ts_code::*;
