//! Domain-facing types shared by handlers and services: the resource contract,
//! list queries and pages, mutation outcomes and field-scoped errors.

use serde::{de::DeserializeOwned, ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::fmt::{Debug, Display};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// An entity exposed through the CRUD handlers.
///
/// The identifier is `None` until the entity has been persisted.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone
        + Ord
        + Debug
        + Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    fn id(&self) -> Option<&Self::Id>;

    fn set_id(&mut self, id: Self::Id);
}

/// Filter and pagination for list retrieval. Defaults to the first page, no filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            filter: None,
        }
    }
}

impl ListQuery {
    /// Clamp page to >= 1 and per_page to 1..=MAX_PER_PAGE; drop blank filters.
    pub fn normalized(self) -> Self {
        ListQuery {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            filter: self
                .filter
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.per_page as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<M> {
    pub items: Vec<M>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Field name to messages, kept in the order they were reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Outcome of a mutating service call.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation<T = ()> {
    Applied(T),
    Rejected(FieldErrors),
}

impl<T> Mutation<T> {
    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Mutation::Rejected(FieldErrors::single(field, message))
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Mutation::Applied(_) => None,
            Mutation::Rejected(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<T, FieldErrors> {
        match self {
            Mutation::Applied(v) => Ok(v),
            Mutation::Rejected(errors) => Err(errors),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        match self {
            Mutation::Applied(v) => Mutation::Applied(f(v)),
            Mutation::Rejected(errors) => Mutation::Rejected(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_group_by_field_in_report_order() {
        let mut errors = FieldErrors::new();
        errors.add("title", "is required");
        errors.add("body", "too long");
        errors.add("title", "must start with a letter");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("title"),
            Some(&["is required".to_string(), "must start with a letter".to_string()][..])
        );
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(
            json,
            r#"{"title":["is required","must start with a letter"],"body":["too long"]}"#
        );
    }

    #[test]
    fn list_query_defaults_and_clamps() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q, ListQuery::default());

        let q = ListQuery { page: 0, per_page: 5000, filter: Some("  ".into()) }.normalized();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, MAX_PER_PAGE);
        assert_eq!(q.filter, None);

        let q = ListQuery { page: 3, per_page: 10, filter: None };
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn mutation_exposes_errors_only_when_rejected() {
        let ok: Mutation<u32> = Mutation::Applied(7);
        assert!(ok.errors().is_none());
        assert_eq!(ok.map(|n| n * 2).into_result(), Ok(14));

        let rejected: Mutation = Mutation::rejected("name", "taken");
        assert!(!rejected.is_applied());
        assert_eq!(rejected.errors().and_then(|e| e.get("name")).map(|m| m.len()), Some(1));
    }
}
