mod collection;
mod coordinate;
mod editor;
mod line;
mod report;
mod session;
mod station;

pub use collection::RouteCollection;
pub use coordinate::{is_valid_coordinate, round_coordinate, CorrectionPoint, LatLng};
pub use editor::{LineTarget, PointerMode, RouteEditor, RoutingJob, RoutingOutcome, RoutingPreferences};
pub use line::{generate_line_color, Line};
pub use report::{calculate_priority, Priority, Report};
pub use session::EditingSession;
pub use station::Station;
