use super::Line;
use crate::error::{EditorError, ParseError};
use crate::import::route_json;
use serde::{Deserialize, Serialize};

/// Ordered set of finalized lines. Insertion order is display and export order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteCollection {
    lines: Vec<Line>,
}

impl RouteCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.lines.iter().any(|line| line.name == name)
    }

    pub(crate) fn line_mut(&mut self, index: usize) -> Result<&mut Line, EditorError> {
        self.lines.get_mut(index).ok_or(EditorError::LineNotFound(index))
    }

    /// Allocate a draft line; it joins the collection only through [`Self::finalize_line`]
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` or `DuplicateName`; the collection is never modified
    pub fn create_line(&self, name: &str, color: &str) -> Result<Line, EditorError> {
        let draft = Line::new_draft(name, color)?;
        if self.contains_name(&draft.name) {
            return Err(EditorError::DuplicateName(draft.name));
        }
        Ok(draft)
    }

    /// Append a finished draft, returning its index
    pub fn finalize_line(&mut self, draft: Line) -> usize {
        self.lines.push(draft);
        self.lines.len() - 1
    }

    /// # Errors
    ///
    /// Returns `LineNotFound`
    pub fn delete_line(&mut self, index: usize) -> Result<Line, EditorError> {
        if index >= self.lines.len() {
            return Err(EditorError::LineNotFound(index));
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the whole collection from a JSON document
    ///
    /// The document is fully validated first; on any error the current lines are untouched.
    ///
    /// # Errors
    ///
    /// Returns the `ParseError` describing the first problem found
    pub fn import_json(&mut self, json: &str) -> Result<&[Line], ParseError> {
        let lines = route_json::parse_lines(json)?;
        self.lines = lines;
        Ok(&self.lines)
    }

    /// # Errors
    ///
    /// Returns `Json` if serialization fails
    pub fn export_json(&self) -> Result<String, ParseError> {
        route_json::export_lines(&self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_with_line(name: &str) -> RouteCollection {
        let mut collection = RouteCollection::new();
        let mut draft = collection.create_line(name, "#ff0000").expect("unique name");
        draft.push_station("A", (14.6, -90.5)).expect("valid station");
        draft.push_station("B", (14.7, -90.4)).expect("valid station");
        collection.finalize_line(draft);
        collection
    }

    #[test]
    fn test_create_line_does_not_insert() {
        let collection = RouteCollection::new();
        let draft = collection.create_line("L1", "#ff0000").expect("unique name");
        assert_eq!(draft.name, "L1");
        assert!(collection.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected_and_collection_unchanged() {
        let collection = collection_with_line("L1");
        let before = collection.clone();
        let result = collection.create_line(" L1 ", "#00ff00");
        assert_eq!(result, Err(EditorError::DuplicateName("L1".to_string())));
        assert_eq!(collection, before);
    }

    #[test]
    fn test_operations_on_missing_line() {
        let mut collection = RouteCollection::new();
        assert!(collection.get(0).is_none());
        assert!(matches!(collection.delete_line(3), Err(EditorError::LineNotFound(3))));
    }

    #[test]
    fn test_delete_line() {
        let mut collection = collection_with_line("L1");
        let draft = collection.create_line("L2", "#00ff00").expect("unique name");
        collection.finalize_line(draft);
        let removed = collection.delete_line(0).expect("line exists");
        assert_eq!(removed.name, "L1");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.lines()[0].name, "L2");
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let original = collection_with_line("L1");
        let json = original.export_json().expect("export");
        let mut restored = RouteCollection::new();
        restored.import_json(&json).expect("import");
        assert_eq!(restored, original);
    }

    #[test]
    fn test_malformed_import_leaves_collection_untouched() {
        let mut collection = collection_with_line("L1");
        let before = collection.clone();
        let result = collection.import_json(r##"[{"name":"X","color":"#000","stations":[]},{"name":"Y","color":"#111"}]"##);
        assert!(matches!(result, Err(ParseError::MalformedEntry { index: 2, .. })));
        assert_eq!(collection, before);
    }

    #[test]
    fn test_import_replaces_collection() {
        let mut collection = collection_with_line("L1");
        let imported = collection
            .import_json(r##"[{"name":"X","color":"#000","stations":[]},{"name":"Y","color":"#111","stations":[]}]"##)
            .expect("valid document");
        assert_eq!(imported.len(), 2);
        assert!(!collection.contains_name("L1"));
        assert!(collection.contains_name("Y"));
    }
}
