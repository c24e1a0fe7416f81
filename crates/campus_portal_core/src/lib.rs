pub mod domain;
pub mod ports;
pub mod session;
pub mod stats;

pub use domain::{
    CompletionForm, CompletionRequest, PrincipalStatistics, Role, Session, StaffHome, Task,
    TaskStatus, UserProfile,
};
pub use ports::{Destination, Navigator, PortError, PortResult, PortalService};
pub use session::{SessionReader, SessionStore, SessionWriter};
pub use stats::AttendanceFigure;
