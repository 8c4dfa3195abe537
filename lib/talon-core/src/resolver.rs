//! URL resolution: base address + path template + per-call override.
//!
//! The resolver works on validated *strings* rather than parsed
//! [`url::Url`] values. Parsing normalizes (`http://foo` becomes
//! `http://foo/`), and the resolution rules require the caller's text to
//! survive verbatim: an absolute override is used exactly as given, and a
//! base with no path must not grow a trailing slash.

use url::{Position, Url};

use crate::{Error, Result};

/// The configured root scheme+authority (and optional base path) for a
/// client instance.
///
/// Kept as the caller's original string alongside its parsed form; the
/// string is what concatenation uses, the parsed form is what authority
/// extraction uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAddress {
    raw: String,
    parsed: Url,
}

impl BaseAddress {
    /// Parse a base address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the string is not an absolute URL
    /// with an authority.
    pub fn parse(address: impl Into<String>) -> Result<Self> {
        let raw = address.into();
        let parsed = Url::parse(&raw)?;
        if !parsed.has_authority() {
            return Err(Error::InvalidUrl(url::ParseError::EmptyHost));
        }
        Ok(Self { raw, parsed })
    }

    /// The base address exactly as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed form of the base address.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.parsed
    }

    /// `scheme://authority` with no trailing slash, e.g. `http://foo`.
    #[must_use]
    pub fn origin_str(&self) -> &str {
        &self.parsed[..Position::BeforePath]
    }
}

impl std::fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for BaseAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A runtime argument that supplies or replaces the request's target URL.
///
/// Absolute overrides (scheme and authority present) replace the base
/// address entirely; relative overrides keep the base's authority and
/// replace its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOverride {
    /// A full URL used verbatim as the final URL.
    Absolute(String),
    /// A path (leading `/` or bare), possibly carrying query/fragment,
    /// joined onto the base's scheme+authority.
    Relative(String),
}

impl UrlOverride {
    /// Classify a string override: absolute if it parses as a URL with
    /// an authority, relative otherwise.
    #[must_use]
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        match Url::parse(&value) {
            Ok(parsed) if parsed.has_authority() => Self::Absolute(value),
            _ => Self::Relative(value),
        }
    }

    /// Returns `true` for the absolute form.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// The override text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(value) | Self::Relative(value) => value,
        }
    }
}

impl From<Url> for UrlOverride {
    /// A pre-parsed URL is always absolute; its serialization is used.
    fn from(url: Url) -> Self {
        Self::Absolute(String::from(url))
    }
}

/// The fully resolved request URL.
///
/// Validated to parse at construction but stored as text so that no
/// normalization is re-applied afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FinalUrl(String);

impl FinalUrl {
    /// Validate and wrap a URL string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the string does not parse.
    pub fn parse(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Url::parse(&url)?;
        Ok(Self(url))
    }

    /// The URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append form-urlencoded query pairs, keeping the rest of the URL
    /// untouched. Pairs land before any fragment.
    pub fn append_query_pairs<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            serializer.append_pair(name.as_ref(), value.as_ref());
        }
        let encoded = serializer.finish();
        if encoded.is_empty() {
            return;
        }

        let (head, fragment) = match self.0.find('#') {
            Some(pos) => self.0.split_at(pos),
            None => (self.0.as_str(), ""),
        };
        let separator = if head.contains('?') {
            if head.ends_with('?') || head.ends_with('&') {
                ""
            } else {
                "&"
            }
        } else {
            "?"
        };
        self.0 = format!("{head}{separator}{encoded}{fragment}");
    }
}

impl std::fmt::Display for FinalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FinalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Combine a base address, an expanded path template, and an optional
/// per-call override into one final URL.
///
/// Rules in priority order:
/// 1. absolute override: used verbatim, base and template ignored;
/// 2. relative override: base's scheme+authority plus the override, with
///    exactly one slash between them;
/// 3. no override: base text and template text concatenated exactly.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when the outcome does not parse as a
/// well-formed URL.
pub fn resolve(
    base: &BaseAddress,
    template: &str,
    override_: Option<&UrlOverride>,
) -> Result<FinalUrl> {
    match override_ {
        Some(UrlOverride::Absolute(url)) => FinalUrl::parse(url.clone()),
        Some(UrlOverride::Relative(rest)) => {
            let origin = base.origin_str();
            let joined = if rest.starts_with('/') {
                format!("{origin}{rest}")
            } else {
                format!("{origin}/{rest}")
            };
            FinalUrl::parse(joined)
        }
        None => FinalUrl::parse(format!("{}{template}", base.as_str())),
    }
}
