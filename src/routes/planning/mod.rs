mod assignments;
mod cycle;
mod entry;

pub use assignments::get_assignments;
pub use cycle::{
    make_planning_cycle, validate_planning_cycle, PlanningCycleRequest,
    ShiftRequest,
};
pub use entry::{
    get_planning, upsert_planning_entry, validate_planning_entry,
    PlanningEntryRequest,
};
