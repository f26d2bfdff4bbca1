use std::collections::HashMap;

/// Last pagination marker seen per log file
///
/// Lives for the process lifetime only. Entries move forward with every
/// successful download and are never reset.
#[derive(Clone, Debug, Default)]
pub struct MarkerTable {
    markers: HashMap<String, String>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker to resume `file_name` from, if any
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.markers.get(file_name).map(String::as_str)
    }

    /// Record the marker returned by the latest download of `file_name`
    ///
    /// Empty markers are ignored so a file never falls back to its beginning.
    pub fn advance(&mut self, file_name: &str, marker: &str) {
        if marker.is_empty() {
            return;
        }
        self.markers
            .insert(file_name.to_string(), marker.to_string());
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_replaces_marker() {
        let mut markers = MarkerTable::new();
        assert_eq!(markers.get("error/mysql-error.log"), None);

        markers.advance("error/mysql-error.log", "3:1024");
        markers.advance("error/mysql-error.log", "3:2048");
        assert_eq!(markers.get("error/mysql-error.log"), Some("3:2048"));
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_empty_marker_is_ignored() {
        let mut markers = MarkerTable::new();
        markers.advance("a.log", "");
        assert!(markers.is_empty());

        markers.advance("a.log", "7:10");
        markers.advance("a.log", "");
        assert_eq!(markers.get("a.log"), Some("7:10"));
    }
}
