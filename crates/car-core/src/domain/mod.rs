//! 도메인 모델.
//!
//! 차량, 차량 이력, 평점 레코드와 각 리소스의 목록 조회 메타데이터를 정의합니다.

mod car;
mod history;
mod rating;

pub use car::{Car, NewCar};
pub use history::{CarHistory, HistoryKind, NewCarHistory, ParseHistoryKindError};
pub use rating::{NewRating, Rating};
