//! Domain model (ids, team, tasks, assignments, errors).

pub mod assignment;
pub mod errors;
pub mod ids;
pub mod task;
pub mod team;

pub use assignment::Assignment;
pub use errors::{ErrorKind, SchedulingError};
pub use ids::{AssignmentId, MemberId, TaskId, TeamId};
pub use task::{Task, TimeSlot};
pub use team::{Member, Team, TeamSnapshot};
