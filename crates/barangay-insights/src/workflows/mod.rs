pub mod census;
pub mod prediction;
pub mod weather;
