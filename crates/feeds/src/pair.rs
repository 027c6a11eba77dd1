use serde::{Deserialize, Serialize};

/// A cell that renders one value but sorts by another.
///
/// Data tables are configured to show `display` and order on `sort`, which lets a
/// column show a label like "R64" while sorting numerically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySort<D, S> {
    pub display: D,
    pub sort: S,
}

impl<D, S> DisplaySort<D, S> {
    pub fn new(display: D, sort: S) -> Self {
        Self { display, sort }
    }
}
