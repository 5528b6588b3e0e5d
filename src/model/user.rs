use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

/// Store-assigned identifier. The store may hand it out as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// Free-text fields tolerate numbers and booleans coming back from the store.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lng: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "lenient_text")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suite: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub geo: Option<Geo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub catch_phrase: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bs: Option<String>,
}

/// A user as returned by the remote store.
///
/// Every field may be missing on read; the accessors below fall back to `""`
/// so views never have to unwrap nested data. Fields the store adds beyond
/// this schema are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn id_text(&self) -> &str {
        self.id.as_ref().map(UserId::as_str).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        text(&self.name)
    }

    pub fn username(&self) -> &str {
        text(&self.username)
    }

    pub fn email(&self) -> &str {
        text(&self.email)
    }

    pub fn phone(&self) -> &str {
        text(&self.phone)
    }

    pub fn website(&self) -> &str {
        text(&self.website)
    }

    pub fn street(&self) -> &str {
        self.address.as_ref().map(|a| text(&a.street)).unwrap_or_default()
    }

    pub fn suite(&self) -> &str {
        self.address.as_ref().map(|a| text(&a.suite)).unwrap_or_default()
    }

    pub fn city(&self) -> &str {
        self.address.as_ref().map(|a| text(&a.city)).unwrap_or_default()
    }

    pub fn zipcode(&self) -> &str {
        self.address.as_ref().map(|a| text(&a.zipcode)).unwrap_or_default()
    }

    pub fn lat(&self) -> &str {
        self.geo().map(|g| text(&g.lat)).unwrap_or_default()
    }

    pub fn lng(&self) -> &str {
        self.geo().map(|g| text(&g.lng)).unwrap_or_default()
    }

    pub fn company_name(&self) -> &str {
        self.company.as_ref().map(|c| text(&c.name)).unwrap_or_default()
    }

    pub fn catch_phrase(&self) -> &str {
        self.company
            .as_ref()
            .map(|c| text(&c.catch_phrase))
            .unwrap_or_default()
    }

    pub fn bs(&self) -> &str {
        self.company.as_ref().map(|c| text(&c.bs)).unwrap_or_default()
    }

    fn geo(&self) -> Option<&Geo> {
        self.address.as_ref()?.geo.as_ref()
    }
}

/// The Create form's starting point: every editable field present and empty.
pub fn blank_draft() -> Value {
    json!({
        "name": "",
        "username": "",
        "email": "",
        "address": {
            "street": "",
            "suite": "",
            "city": "",
            "zipcode": "",
            "geo": { "lat": "", "lng": "" }
        },
        "phone": "",
        "website": "",
        "company": { "name": "", "catchPhrase": "", "bs": "" }
    })
}
