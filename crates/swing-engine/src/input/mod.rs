pub mod action;
pub mod queue;
