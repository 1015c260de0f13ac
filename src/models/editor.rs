use super::{generate_line_color, EditingSession, LatLng, Line, RouteCollection, Station};
use crate::api::request::{RequestToken, RequestTracker};
use crate::api::routing::{RoutingRequest, TravelMode};
use crate::constants::MIN_LINE_STATIONS;
use crate::error::{EditorError, ParseError};
use crate::logging::debug_log;

/// The line a pointer action applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Draft,
    Line(usize),
}

/// What a click on the map adds to the active line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    AddStation,
    AddCorrectionPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingPreferences {
    pub use_street_routing: bool,
    pub mode: TravelMode,
    /// Append correction points after the stations when routing
    pub include_correction_points: bool,
}

/// A routing request issued for one line; completes through [`RouteEditor::complete_routing`]
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingJob {
    pub token: RequestToken,
    pub target: LineTarget,
    pub request: RoutingRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutingOutcome {
    /// Routed geometry stored on the line
    Applied,
    /// Routing failed; the line keeps its straight path
    FellBack(EditorError),
    /// The line changed (or a newer request started) while waiting; result dropped
    Superseded,
}

/// Owns the route collection and the editing session.
///
/// Every mutation goes through here so the session rules hold and any
/// outstanding routing request is invalidated when a line changes.
#[derive(Debug, Clone, Default)]
pub struct RouteEditor {
    collection: RouteCollection,
    session: EditingSession,
    pub pointer_mode: PointerMode,
    pub routing: RoutingPreferences,
    routing_requests: RequestTracker,
}

impl RouteEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn collection(&self) -> &RouteCollection {
        &self.collection
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        self.collection.lines()
    }

    #[must_use]
    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    /// Colour suggested for the next new line
    #[must_use]
    pub fn suggested_color(&self) -> String {
        generate_line_color(self.collection.len())
    }

    #[must_use]
    pub fn active_target(&self) -> Option<LineTarget> {
        match &self.session {
            EditingSession::Idle => None,
            EditingSession::Creating(_) => Some(LineTarget::Draft),
            EditingSession::Editing(index) => Some(LineTarget::Line(*index)),
        }
    }

    #[must_use]
    pub fn line(&self, target: LineTarget) -> Option<&Line> {
        match target {
            LineTarget::Draft => self.session.draft(),
            LineTarget::Line(index) => self.collection.get(index),
        }
    }

    #[must_use]
    pub fn active_line(&self) -> Option<&Line> {
        self.active_target().and_then(|target| self.line(target))
    }

    fn line_mut(&mut self, target: LineTarget) -> Result<&mut Line, EditorError> {
        match target {
            LineTarget::Draft => self.session.draft_mut().ok_or(EditorError::NoActiveLine),
            LineTarget::Line(index) => self.collection.line_mut(index),
        }
    }

    /// Apply `edit` to the active line, invalidating any routing request in flight
    fn edit_active<T>(&mut self, edit: impl FnOnce(&mut Line) -> Result<T, EditorError>) -> Result<T, EditorError> {
        let target = self.active_target().ok_or(EditorError::NoActiveLine)?;
        let result = edit(self.line_mut(target)?)?;
        self.routing_requests.invalidate();
        Ok(result)
    }

    // Session

    /// Start drawing a new line, leaving edit mode if it was active
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` or `DuplicateName`; the session is unchanged on error
    pub fn start_line(&mut self, name: &str, color: &str) -> Result<(), EditorError> {
        let draft = self.collection.create_line(name, color)?;
        debug_log!("Creating line '{}'", draft.name);
        if let Some(exited) = self.session.begin_creating(draft) {
            debug_log!("Left edit mode for line {exited}");
        }
        self.pointer_mode = PointerMode::AddStation;
        self.routing_requests.invalidate();
        Ok(())
    }

    /// Finalize the draft into the collection, returning its index
    ///
    /// # Errors
    ///
    /// Returns `NoActiveLine` when not creating or `EmptyLine` for a draft without stations
    pub fn finish_line(&mut self) -> Result<usize, EditorError> {
        match self.session.draft() {
            None => return Err(EditorError::NoActiveLine),
            Some(draft) if draft.stations.is_empty() => return Err(EditorError::EmptyLine),
            Some(_) => {}
        }
        let draft = self.session.take_draft().ok_or(EditorError::NoActiveLine)?;
        self.routing_requests.invalidate();
        Ok(self.collection.finalize_line(draft))
    }

    /// Throw away the draft. Returns it, or `None` when nothing was being drawn.
    pub fn cancel_line(&mut self) -> Option<Line> {
        let draft = self.session.take_draft();
        if draft.is_some() {
            self.routing_requests.invalidate();
        }
        draft
    }

    /// Make the stations of a finalized line draggable and deletable.
    /// Returns an unfinished draft that had to be discarded.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` for a bad index
    pub fn start_editing(&mut self, index: usize) -> Result<Option<Line>, EditorError> {
        if self.collection.get(index).is_none() {
            return Err(EditorError::LineNotFound(index));
        }
        let discarded = self.session.begin_editing(index);
        if let Some(draft) = &discarded {
            leptos::logging::warn!("Discarded unfinished line '{}'", draft.name);
        }
        self.routing_requests.invalidate();
        Ok(discarded)
    }

    pub fn exit_editing(&mut self) -> Option<usize> {
        self.session.exit_editing()
    }

    /// # Errors
    ///
    /// Returns `LineNotFound` for a bad index
    pub fn delete_line(&mut self, index: usize) -> Result<Line, EditorError> {
        let removed = self.collection.delete_line(index)?;
        match self.session.editing_index() {
            Some(editing) if editing == index => self.session.reset(),
            // Indices after the removed line shift down by one
            Some(editing) if editing > index => {
                self.session.begin_editing(editing - 1);
            }
            _ => {}
        }
        self.routing_requests.invalidate();
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.collection.clear();
        self.session.reset();
        self.routing_requests.invalidate();
    }

    // Active line edits

    /// Append a station to the active line
    ///
    /// # Errors
    ///
    /// Returns `NoActiveLine`, `InvalidCoordinate` or `EmptyName`
    pub fn add_station(&mut self, name: &str, point: (f64, f64)) -> Result<(), EditorError> {
        self.edit_active(|line| line.push_station(name, point))
    }

    /// # Errors
    ///
    /// Returns `NoActiveLine`, `StationNotFound` or `MinimumStations`
    pub fn delete_station(&mut self, index: usize) -> Result<Station, EditorError> {
        self.edit_active(|line| line.remove_station(index))
    }

    /// # Errors
    ///
    /// Returns `NoActiveLine`, `StationNotFound` or `InvalidCoordinate`
    pub fn move_station(&mut self, index: usize, point: (f64, f64)) -> Result<(), EditorError> {
        self.edit_active(|line| line.move_station(index, point))
    }

    /// # Errors
    ///
    /// Returns `NoActiveLine` or `InvalidCoordinate`
    pub fn add_correction_point(&mut self, point: (f64, f64)) -> Result<(), EditorError> {
        self.edit_active(|line| line.push_correction_point(point))
    }

    /// # Errors
    ///
    /// Returns `NoActiveLine` or `CorrectionPointNotFound`
    pub fn delete_correction_point(&mut self, index: usize) -> Result<LatLng, EditorError> {
        self.edit_active(|line| line.remove_correction_point(index))
    }

    /// # Errors
    ///
    /// Returns `NoActiveLine`
    pub fn set_circular(&mut self, is_circular: bool) -> Result<(), EditorError> {
        self.edit_active(|line| {
            line.set_circular(is_circular);
            Ok(())
        })
    }

    // Persistence

    /// Replace the collection from JSON. The session is reset only when the document is valid.
    ///
    /// # Errors
    ///
    /// Returns the `ParseError` for the first problem; nothing changes on error
    pub fn import_json(&mut self, json: &str) -> Result<usize, ParseError> {
        let count = self.collection.import_json(json)?.len();
        self.session.reset();
        self.routing_requests.invalidate();
        debug_log!("Imported {count} lines");
        Ok(count)
    }

    /// # Errors
    ///
    /// Returns `Json` if serialization fails
    pub fn export_json(&self) -> Result<String, ParseError> {
        self.collection.export_json()
    }

    // Routing

    /// Whether the active line has enough waypoints to ask for street routing
    #[must_use]
    pub fn can_apply_routing(&self) -> bool {
        self.active_line()
            .is_some_and(|line| line.routing_waypoints(self.routing.include_correction_points).len() >= MIN_LINE_STATIONS)
    }

    /// Prepare a routing request for the active line. Any earlier request becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveLine` or `MinimumStations` when fewer than two waypoints exist
    pub fn begin_routing(&mut self) -> Result<RoutingJob, EditorError> {
        let target = self.active_target().ok_or(EditorError::NoActiveLine)?;
        let line = self.line(target).ok_or(EditorError::NoActiveLine)?;
        let waypoints = line.routing_waypoints(self.routing.include_correction_points);
        if waypoints.len() < MIN_LINE_STATIONS {
            return Err(EditorError::MinimumStations { minimum: MIN_LINE_STATIONS });
        }
        let request = RoutingRequest::new(waypoints, self.routing.mode, line.is_circular);
        Ok(RoutingJob {
            token: self.routing_requests.begin(),
            target,
            request,
        })
    }

    /// Store the result of a routing job, unless it has been superseded
    pub fn complete_routing(&mut self, job: &RoutingJob, result: Result<Vec<LatLng>, EditorError>) -> RoutingOutcome {
        if !self.routing_requests.is_current(job.token) {
            debug_log!("Dropping superseded routing response");
            return RoutingOutcome::Superseded;
        }
        let Ok(line) = self.line_mut(job.target) else {
            return RoutingOutcome::Superseded;
        };
        match result {
            Ok(path) => {
                line.set_routed_geometry(Some(path));
                RoutingOutcome::Applied
            }
            Err(e) => {
                leptos::logging::warn!("Routing failed for '{}', keeping direct line: {e}", line.name);
                line.set_routed_geometry(None);
                RoutingOutcome::FellBack(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_line() -> RouteEditor {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        editor.add_station("A", (14.6, -90.5)).expect("valid station");
        editor.add_station("B", (14.7, -90.4)).expect("valid station");
        editor.finish_line().expect("line has stations");
        editor
    }

    #[test]
    fn test_create_and_finish_line() {
        let editor = editor_with_line();
        assert_eq!(editor.lines().len(), 1);
        assert!(editor.session().is_idle());
        assert_eq!(editor.lines()[0].stations.len(), 2);
    }

    #[test]
    fn test_finish_requires_a_station() {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        assert_eq!(editor.finish_line(), Err(EditorError::EmptyLine));
        assert!(editor.session().is_creating());
    }

    #[test]
    fn test_single_station_line_can_be_finished() {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        editor.add_station("A", (14.6, -90.5)).expect("valid station");
        assert_eq!(editor.finish_line(), Ok(0));
    }

    #[test]
    fn test_duplicate_line_name_keeps_session() {
        let mut editor = editor_with_line();
        assert_eq!(
            editor.start_line("L1", "#00ff00"),
            Err(EditorError::DuplicateName("L1".to_string()))
        );
        assert!(editor.session().is_idle());
        assert_eq!(editor.lines().len(), 1);
    }

    #[test]
    fn test_edits_require_active_line() {
        let mut editor = editor_with_line();
        assert_eq!(editor.add_station("C", (14.8, -90.3)), Err(EditorError::NoActiveLine));
        assert_eq!(editor.move_station(0, (14.8, -90.3)), Err(EditorError::NoActiveLine));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        assert_eq!(
            editor.add_station("A", (95.0, -90.5)),
            Err(EditorError::InvalidCoordinate { lat: 95.0, lng: -90.5 })
        );
        assert_eq!(editor.active_line().map(|l| l.stations.len()), Some(0));
    }

    #[test]
    fn test_starting_line_exits_editing() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        editor.start_line("L2", "#00ff00").expect("valid line");
        assert!(editor.session().is_creating());
        assert_eq!(editor.session().editing_index(), None);
    }

    #[test]
    fn test_editing_discards_draft() {
        let mut editor = editor_with_line();
        editor.start_line("L2", "#00ff00").expect("valid line");
        editor.add_station("X", (14.0, -90.0)).expect("valid station");
        let discarded = editor.start_editing(0).expect("line exists");
        assert_eq!(discarded.map(|d| d.name), Some("L2".to_string()));
        assert_eq!(editor.lines().len(), 1);
        assert_eq!(editor.session().editing_index(), Some(0));
    }

    #[test]
    fn test_start_editing_unknown_line() {
        let mut editor = editor_with_line();
        assert_eq!(editor.start_editing(3), Err(EditorError::LineNotFound(3)));
        assert!(editor.session().is_idle());
    }

    #[test]
    fn test_move_station_in_edit_mode_clears_routed_geometry() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        let job = editor.begin_routing().expect("two stations");
        let path = vec![LatLng { lat: 14.6, lng: -90.5 }, LatLng { lat: 14.65, lng: -90.45 }, LatLng { lat: 14.7, lng: -90.4 }];
        assert_eq!(editor.complete_routing(&job, Ok(path)), RoutingOutcome::Applied);
        assert!(editor.lines()[0].routed_geometry.is_some());

        editor.move_station(1, (14.71, -90.41)).expect("valid move");
        assert!(editor.lines()[0].routed_geometry.is_none());
        assert_eq!(editor.lines()[0].stations[1].lat, 14.71);
    }

    #[test]
    fn test_add_then_delete_station_restores_line() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        let before = editor.lines()[0].clone();
        editor.add_station("C", (14.75, -90.35)).expect("valid station");
        assert_eq!(editor.lines()[0].stations.len(), 3);
        let removed = editor.delete_station(2).expect("three stations allow deletion");
        assert_eq!(removed.name, "C");
        assert_eq!(editor.lines()[0], before);
    }

    #[test]
    fn test_delete_station_respects_minimum() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        assert_eq!(
            editor.delete_station(0),
            Err(EditorError::MinimumStations { minimum: 2 })
        );
        assert_eq!(editor.lines()[0].stations.len(), 2);
    }

    #[test]
    fn test_delete_edited_line_resets_session() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        editor.delete_line(0).expect("line exists");
        assert!(editor.session().is_idle());
        assert!(editor.lines().is_empty());
    }

    #[test]
    fn test_delete_earlier_line_shifts_edit_index() {
        let mut editor = editor_with_line();
        editor.start_line("L2", "#00ff00").expect("valid line");
        editor.add_station("A", (14.0, -90.0)).expect("valid station");
        editor.finish_line().expect("line has stations");
        editor.start_editing(1).expect("line exists");
        editor.delete_line(0).expect("line exists");
        assert_eq!(editor.session().editing_index(), Some(0));
        assert_eq!(editor.active_line().map(|l| l.name.as_str()), Some("L2"));
    }

    #[test]
    fn test_stale_routing_response_is_discarded() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        let job = editor.begin_routing().expect("two stations");
        editor.add_station("C", (14.8, -90.3)).expect("valid station");
        let outcome = editor.complete_routing(&job, Ok(vec![LatLng { lat: 14.6, lng: -90.5 }, LatLng { lat: 14.7, lng: -90.4 }]));
        assert_eq!(outcome, RoutingOutcome::Superseded);
        assert!(editor.lines()[0].routed_geometry.is_none());
    }

    #[test]
    fn test_newer_routing_request_supersedes_older() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        let first = editor.begin_routing().expect("two stations");
        let second = editor.begin_routing().expect("two stations");
        assert_eq!(editor.complete_routing(&first, Ok(vec![LatLng { lat: 1.0, lng: 1.0 }])), RoutingOutcome::Superseded);
        assert_eq!(
            editor.complete_routing(&second, Ok(vec![LatLng { lat: 2.0, lng: 2.0 }])),
            RoutingOutcome::Applied
        );
    }

    #[test]
    fn test_routing_failure_falls_back() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        let job = editor.begin_routing().expect("two stations");
        let outcome = editor.complete_routing(&job, Err(EditorError::Network("offline".to_string())));
        assert!(matches!(outcome, RoutingOutcome::FellBack(EditorError::Network(_))));
        assert_eq!(editor.lines()[0].display_path(), editor.lines()[0].straight_path());
    }

    #[test]
    fn test_routing_needs_two_waypoints() {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        editor.add_station("A", (14.6, -90.5)).expect("valid station");
        assert!(!editor.can_apply_routing());
        assert_eq!(editor.begin_routing(), Err(EditorError::MinimumStations { minimum: 2 }));

        editor.routing.include_correction_points = true;
        editor.add_correction_point((14.65, -90.45)).expect("valid point");
        assert!(editor.can_apply_routing());
    }

    #[test]
    fn test_circular_routing_request_closes_loop() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        editor.set_circular(true).expect("active line");
        let job = editor.begin_routing().expect("two stations");
        assert_eq!(job.request.waypoints.len(), 3);
        assert_eq!(job.request.waypoints.first(), job.request.waypoints.last());
    }

    #[test]
    fn test_failed_import_keeps_session_and_lines() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        assert!(editor.import_json("{\"not\": \"an array\"}").is_err());
        assert_eq!(editor.session().editing_index(), Some(0));
        assert_eq!(editor.lines().len(), 1);
    }

    #[test]
    fn test_import_resets_session() {
        let mut editor = editor_with_line();
        let exported = editor.export_json().expect("serializable");
        editor.start_line("L2", "#00ff00").expect("valid line");
        assert_eq!(editor.import_json(&exported), Ok(1));
        assert!(editor.session().is_idle());
    }

    #[test]
    fn test_clear_all() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        editor.clear_all();
        assert!(editor.lines().is_empty());
        assert!(editor.session().is_idle());
    }
}
