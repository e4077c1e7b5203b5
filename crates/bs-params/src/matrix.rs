//! Aggregation matrices the backend can produce.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Matrix {
    pub id: i32,
    pub label: &'static str,
}

/// `-1` selects an externally supplied matrix.
pub const MATRICES: [Matrix; 10] = [
    Matrix {
        id: -1,
        label: "External matrix",
    },
    Matrix {
        id: 0,
        label: "Occupation",
    },
    Matrix {
        id: 1,
        label: "Relative occupation",
    },
    Matrix {
        id: 5,
        label: "Resolved drop-off requests",
    },
    Matrix {
        id: 6,
        label: "Unresolved pick-up requests",
    },
    Matrix {
        id: 7,
        label: "Unresolved drop-off requests",
    },
    Matrix {
        id: 9,
        label: "Fictional drop-off km",
    },
    Matrix {
        id: 10,
        label: "Resolved fictional pick-ups",
    },
    Matrix {
        id: 11,
        label: "Resolved fictional drop-offs",
    },
    Matrix {
        id: 12,
        label: "Unresolved fictional pick-ups",
    },
];

pub const EXTERNAL_MATRIX: i32 = -1;

pub fn matrix_by_id(id: i32) -> Option<&'static Matrix> {
    MATRICES.iter().find(|m| m.id == id)
}
