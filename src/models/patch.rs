use sea_orm::ActiveValue::{self, Set};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ServiceError;

/// One field of an incoming change-set.
///
/// Deserializes from JSON as: key absent → `Omitted`, `null` → `Cleared`,
/// anything else → `Value`. Fields using it need `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Omitted,
    Cleared,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Patch::Omitted)
    }

    pub fn is_present(&self) -> bool {
        !self.is_omitted()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` → `Cleared`, `Some(v)` → `Value(v)`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Patch::Cleared, Patch::Value)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Omitted => Patch::Omitted,
            Patch::Cleared => Patch::Cleared,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Writes the patch into a nullable column.
    pub fn apply_nullable(self, target: &mut ActiveValue<Option<T>>)
    where
        Option<T>: Into<sea_orm::Value>,
    {
        match self {
            Patch::Omitted => {}
            Patch::Cleared => *target = Set(None),
            Patch::Value(v) => *target = Set(Some(v)),
        }
    }

    /// Writes the patch into a non-null column; clearing it is rejected.
    pub fn apply_required(
        self,
        field: &str,
        target: &mut ActiveValue<T>,
    ) -> Result<(), ServiceError>
    where
        T: Into<sea_orm::Value>,
    {
        match self {
            Patch::Omitted => Ok(()),
            Patch::Cleared => Err(ServiceError::missing_field(field)),
            Patch::Value(v) => {
                *target = Set(v);
                Ok(())
            }
        }
    }
}

impl Patch<String> {
    /// A value that counts as "supplied": present and non-empty. Omitted,
    /// cleared and empty strings all read as no value.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Patch::Value(v) if !v.is_empty())
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::NotSet;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Serialize)]
    struct Body {
        #[serde(default, skip_serializing_if = "Patch::is_omitted")]
        note: Patch<String>,
    }

    #[test]
    fn deserialize_distinguishes_absent_null_and_value() {
        let absent: Body = serde_json::from_value(json!({})).unwrap();
        let null: Body = serde_json::from_value(json!({ "note": null })).unwrap();
        let value: Body = serde_json::from_value(json!({ "note": "<p>hi</p>" })).unwrap();

        assert_eq!(absent.note, Patch::Omitted);
        assert_eq!(null.note, Patch::Cleared);
        assert_eq!(value.note, Patch::Value("<p>hi</p>".to_string()));
    }

    #[test]
    fn serialize_skips_omitted_and_writes_null_for_cleared() {
        let omitted = Body::default();
        let cleared = Body { note: Patch::Cleared };

        assert_eq!(serde_json::to_value(&omitted).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({ "note": null }));
    }

    #[test]
    fn truthiness_treats_empty_like_absent() {
        assert!(!Patch::<String>::Omitted.is_truthy());
        assert!(!Patch::<String>::Cleared.is_truthy());
        assert!(!Patch::Value(String::new()).is_truthy());
        assert!(Patch::Value("x".to_string()).is_truthy());
    }

    #[test]
    fn apply_nullable_leaves_omitted_untouched() {
        let mut target: ActiveValue<Option<String>> = NotSet;
        Patch::<String>::Omitted.apply_nullable(&mut target);
        assert_eq!(target, NotSet);

        Patch::<String>::Cleared.apply_nullable(&mut target);
        assert_eq!(target, Set(None));

        Patch::Value("a".to_string()).apply_nullable(&mut target);
        assert_eq!(target, Set(Some("a".to_string())));
    }

    #[test]
    fn apply_required_rejects_clearing() {
        let mut target: ActiveValue<String> = Set("before".to_string());
        let err = Patch::<String>::Cleared
            .apply_required("name", &mut target)
            .unwrap_err();

        assert!(matches!(err, ServiceError::ValidationError(_)));
        assert_eq!(target, Set("before".to_string()));
    }
}
