pub mod distance;
pub mod merge;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod quality;
pub mod selection;
pub mod similarity;
pub mod transform;
