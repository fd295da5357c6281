use crate::prelude::DatasetId;

/// Monotonic selection counter. Every selection change advances it, and a
/// completion is only applied while its generation is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn advance(&mut self) -> Generation {
        self.0 += 1;
        *self
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identifies one detail load: which dataset, issued under which generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub dataset_id: DatasetId,
    pub generation: Generation,
}
