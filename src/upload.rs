pub mod encode;
pub mod intake;
pub mod preview;
