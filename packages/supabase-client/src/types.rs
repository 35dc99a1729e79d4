use serde::Deserialize;

/// Inclusive row window sent in the `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub offset: usize,
    pub limit: usize,
}

impl RowRange {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// `Range` header value, e.g. `0-999` for the first page of 1000.
    ///
    /// Returns `None` for an empty window, which PostgREST cannot express.
    pub fn header_value(&self) -> Option<String> {
        if self.limit == 0 {
            return None;
        }
        Some(format!("{}-{}", self.offset, self.offset + self.limit - 1))
    }
}

/// Error body returned by PostgREST on failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl ApiErrorBody {
    /// Collapse the PostgREST error fields into one line.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("[{}]", code));
        }
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        if let Some(details) = &self.details {
            parts.push(details.clone());
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("hint: {}", hint));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_header_is_inclusive() {
        assert_eq!(RowRange::new(0, 1000).header_value().as_deref(), Some("0-999"));
        assert_eq!(
            RowRange::new(2000, 200).header_value().as_deref(),
            Some("2000-2199")
        );
        assert_eq!(RowRange::new(10, 0).header_value(), None);
    }

    #[test]
    fn error_body_summary() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"message":"relation does not exist","code":"42P01","details":null,"hint":null}"#,
        )
        .unwrap();
        assert_eq!(body.summary(), "[42P01] relation does not exist");
    }
}
