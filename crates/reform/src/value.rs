/// Value type for forms whose fields hold different kinds of data.
///
/// With the `serde` feature it maps onto plain JSON (`null`, bool, number,
/// string, array of strings), so a `Values<FieldValue>` round-trips as a JSON
/// object.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum FieldValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Empty, blank text, or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::from(" \t").is_blank());
        assert!(FieldValue::from(Vec::<String>::new()).is_blank());
        assert!(!FieldValue::from(false).is_blank());
        assert!(!FieldValue::from(0.0_f64).is_blank());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn values_as_json_object() {
        use crate::Values;

        let values: Values<FieldValue> = serde_json::from_str(
            r#"{"title": "Groceries", "done": false, "count": 3, "tags": ["a"], "notes": null}"#,
        )
        .unwrap();
        assert_eq!(values["title"].as_text(), Some("Groceries"));
        assert_eq!(values["done"].as_bool(), Some(false));
        assert_eq!(values["count"].as_number(), Some(3.0));
        assert_eq!(values["tags"].as_list(), Some(&["a".to_string()][..]));
        assert_eq!(values["notes"], FieldValue::Empty);

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"{"count":3.0,"done":false,"notes":null,"tags":["a"],"title":"Groceries"}"#
        );
    }
}
