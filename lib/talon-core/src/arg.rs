//! Runtime argument values for dispatched calls.

use bytes::Bytes;

use crate::{Form, Result};

/// One runtime argument, matched positionally against the descriptor's
/// role list by the binder.
///
/// Scalars carry their natural string representation; `Absent` marks an
/// optional argument that was not supplied and is omitted from the
/// request entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A scalar, already formatted.
    Text(String),
    /// A pre-parsed URL for a URL-override role.
    Url(url::Url),
    /// A structured value for a body role, encoded by the client codec.
    Json(serde_json::Value),
    /// Raw bytes for a body role, sent as-is.
    Bytes(Bytes),
    /// A prepared multipart form for a body role.
    Multipart(Form),
    /// An absent optional argument.
    Absent,
}

impl ArgValue {
    /// Format any displayable value into its scalar form.
    #[must_use]
    pub fn text(value: impl std::fmt::Display) -> Self {
        Self::Text(value.to_string())
    }

    /// Capture any serializable value as a structured body argument.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the value's `Serialize`
    /// implementation fails.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Returns `true` for the absent marker.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<url::Url> for ArgValue {
    fn from(value: url::Url) -> Self {
        Self::Url(value)
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for ArgValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<Form> for ArgValue {
    fn from(value: Form) -> Self {
        Self::Multipart(value)
    }
}

impl<T> From<Option<T>> for ArgValue
where
    T: Into<ArgValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_use_display_form() {
        assert_eq!(ArgValue::from(42_u64), ArgValue::Text("42".to_string()));
        assert_eq!(ArgValue::from(true), ArgValue::Text("true".to_string()));
        assert_eq!(ArgValue::from(1.5_f64), ArgValue::Text("1.5".to_string()));
        assert_eq!(ArgValue::from("abc"), ArgValue::Text("abc".to_string()));
        assert_eq!(
            ArgValue::text(std::net::Ipv4Addr::LOCALHOST),
            ArgValue::Text("127.0.0.1".to_string())
        );
    }

    #[test]
    fn option_maps_to_absent() {
        assert_eq!(ArgValue::from(None::<u32>), ArgValue::Absent);
        assert_eq!(ArgValue::from(Some(7_u32)), ArgValue::Text("7".to_string()));
        assert!(ArgValue::Absent.is_absent());
    }

    #[test]
    fn json_captures_serializable_values() {
        #[derive(serde::Serialize)]
        struct User {
            name: String,
        }

        let arg = ArgValue::json(&User {
            name: "Alice".to_string(),
        })
        .expect("serialize");
        assert_eq!(arg, ArgValue::Json(serde_json::json!({"name": "Alice"})));
    }

    #[test]
    fn bytes_and_forms_convert() {
        assert_eq!(
            ArgValue::from(vec![1_u8, 2, 3]),
            ArgValue::Bytes(Bytes::from_static(&[1, 2, 3]))
        );

        let form = Form::with_boundary("b").text("a", "1");
        assert_eq!(ArgValue::from(form.clone()), ArgValue::Multipart(form));
    }
}
