pub mod board;
pub mod disc;
pub mod physics;
pub mod rng;
pub mod timer;
