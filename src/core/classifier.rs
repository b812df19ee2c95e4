use crate::domain::model::{ReferenceRange, Status};

/// Bounds are inclusive: a value equal to `low` or `high` is in range.
pub fn classify(value: f64, range: &ReferenceRange) -> Status {
    if value < range.low {
        Status::Below
    } else if value > range.high {
        Status::Above
    } else {
        Status::InRange
    }
}
