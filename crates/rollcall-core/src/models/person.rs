use serde::{Deserialize, Serialize};

pub type PersonId = i64;

/// Belt marker the server uses when a student has no rank recorded.
pub const DEFAULT_BELT: &str = "⚪️";

/// A student: either a member of a session roster or a search hit.
///
/// The roster endpoint sends `display_name`, the search endpoint sends
/// `display`; both land in `display_name`. `birth_year` is an integer, or an
/// empty string when the birthday is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default, alias = "display")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_birth_year")]
    pub birth_year: Option<i32>,
    #[serde(default = "default_belt")]
    pub belt_emoji: String,
    #[serde(default)]
    pub is_visited: bool,
}

fn default_belt() -> String {
    DEFAULT_BELT.to_string()
}

// Accepts 2012, "2012", "" and null
fn deserialize_birth_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct BirthYearVisitor;

    impl<'de> de::Visitor<'de> for BirthYearVisitor {
        type Value = Option<i32>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a year as number or string")
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("birth year out of range: {}", v)))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("birth year out of range: {}", v)))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse().ok())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(BirthYearVisitor)
}
