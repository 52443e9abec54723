pub mod category;
pub mod ids;
pub mod plan;
pub mod song;

pub use category::ServiceCategory;
pub use ids::{SlotId, SongId};
pub use plan::{Plan, PlanDate, PlanDateError, PlannedSong};
pub use song::{Song, SongRef};
