//! Placement planning: blueprints and procedural dig shapes

pub mod placement;
pub mod planner;
pub mod shapes;

pub use placement::{Placement, PlacementSet};
pub use planner::{plan_blueprint, PlannedBuild};
pub use shapes::DigPlan;
