/// Daily soil-water balance: the per-day depletion recurrence and the
/// season driver that folds it across the cultivation window.
pub mod constants;
pub mod outputs;
pub mod processes;
pub mod run;
pub mod state;
