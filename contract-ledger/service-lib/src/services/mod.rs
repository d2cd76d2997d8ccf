pub mod analyze;
pub mod documents;
pub mod fingerprints;
