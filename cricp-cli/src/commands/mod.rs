pub mod completion;
pub mod cp;
