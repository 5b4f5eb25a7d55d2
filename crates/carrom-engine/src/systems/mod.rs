pub mod ai;
pub mod rules;
pub mod turn;
