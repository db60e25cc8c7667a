#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid operation for the current stage")]
    InvalidOperation,
    #[error("Invalid box index")]
    InvalidBoxIndex,
    #[error("Box contents are not a permutation of 1..={expected}")]
    InvalidPermutation { expected: u32 },
    #[error("Not allowed to open more than {limit} boxes in one session")]
    OpenLimitExceeded { limit: u32 },
    #[error("No door left for the host to reveal")]
    NoRevealableDoor,
    #[error("No qualifying samples")]
    NoQualifyingSamples,
}

pub type Result<T> = std::result::Result<T, Error>;
