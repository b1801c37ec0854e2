use crate::{Gender, UserId};
use serde_json::{Map, Value};

/// A user of the site.
///
/// `id` is `None` until the store has persisted the user. `name` and `gender`
/// are optional; a user without either is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    id: Option<UserId>,
    name: Option<String>,
    gender: Option<Gender>,
}

impl User {
    /// A fresh, unsaved user with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a user from a stored row.
    ///
    /// A stored gender outside [`Gender::CHOICES`] reads back as absent.
    pub fn from_row(id: UserId, name: Option<String>, gender: Option<&str>) -> Self {
        Self {
            id: Some(id),
            name,
            gender: gender.and_then(Gender::parse),
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Sets the name if `value` is a JSON string. Any other value is ignored.
    pub fn set_name(&mut self, value: &Value) {
        if let Value::String(name) = value {
            self.name = Some(name.clone());
        }
    }

    /// Sets the gender if `value` is the string `"male"` or `"female"`.
    /// Any other value is ignored and the previous gender is kept.
    pub fn set_gender(&mut self, value: &Value) {
        if let Some(gender) = value.as_str().and_then(Gender::parse) {
            self.gender = Some(gender);
        }
    }

    /// Ordered `id`, `name`, `gender` mapping used as the API representation.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), self.id.map_or(Value::Null, |id| Value::from(id.get())));
        map.insert("name".into(), self.name.clone().map_or(Value::Null, Value::String));
        map.insert(
            "gender".into(),
            self.gender.map_or(Value::Null, |g| Value::from(g.as_str())),
        );
        map
    }
}
