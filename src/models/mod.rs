pub mod paper;

pub use paper::CandidatePaper;
