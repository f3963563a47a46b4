pub mod export;
pub mod preview;
