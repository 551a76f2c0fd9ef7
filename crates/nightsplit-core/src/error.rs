use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Cannot summarize a night without intervals")]
    EmptyNight,
}
