//! Method descriptors: the per-method metadata the binder works from.
//!
//! A [`MethodDescriptor`] is built once per API method from a
//! [`MetadataProvider`], validated at construction, and shared read-only
//! by every call to that method. Descriptors live in a
//! [`DescriptorTable`] built once at client construction and never
//! mutated afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::{Error, Method, PathTemplate, Result};

/// The fixed classification of one method parameter.
///
/// Closed set, checked exhaustively at binding time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamRole {
    /// The argument supplies or replaces the request's target URL.
    UrlOverride,
    /// The argument becomes the request body.
    Body,
    /// The argument becomes a header with this name.
    Header(String),
    /// The argument becomes a query parameter with this name.
    Query(String),
    /// The argument fills the `{name}` placeholder in the path template.
    Path(String),
}

impl fmt::Display for ParamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlOverride => write!(f, "url"),
            Self::Body => write!(f, "body"),
            Self::Header(name) => write!(f, "header `{name}`"),
            Self::Query(name) => write!(f, "query `{name}`"),
            Self::Path(name) => write!(f, "path `{name}`"),
        }
    }
}

/// Immutable description of one API method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    method: Method,
    template: PathTemplate,
    roles: Vec<ParamRole>,
    static_headers: Vec<(String, String)>,
    content_type: Option<String>,
}

impl MethodDescriptor {
    /// Start building a descriptor for the named method.
    #[must_use]
    pub fn builder(name: impl Into<String>, method: Method) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder {
            name: name.into(),
            method,
            template: String::new(),
            roles: Vec::new(),
            static_headers: Vec::new(),
            content_type: None,
        }
    }

    /// Method name, the dispatch key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path template (may be empty).
    #[must_use]
    pub const fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Parameter roles in declaration order.
    #[must_use]
    pub fn roles(&self) -> &[ParamRole] {
        &self.roles
    }

    /// Headers applied to every call of this method.
    #[must_use]
    pub fn static_headers(&self) -> &[(String, String)] {
        &self.static_headers
    }

    /// Declared body content type, if any.
    #[must_use]
    pub fn declared_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Builder for [`MethodDescriptor`]; `build()` enforces the role
/// invariants.
#[derive(Debug, Clone)]
pub struct MethodDescriptorBuilder {
    name: String,
    method: Method,
    template: String,
    roles: Vec<ParamRole>,
    static_headers: Vec<(String, String)>,
    content_type: Option<String>,
}

impl MethodDescriptorBuilder {
    /// Set the path template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Append the next positional parameter's role.
    #[must_use]
    pub fn param(mut self, role: ParamRole) -> Self {
        self.roles.push(role);
        self
    }

    /// Add a header sent on every call of this method.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_headers.push((name.into(), value.into()));
        self
    }

    /// Declare the body content type, overriding what the body value
    /// would otherwise carry.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns a binding error on: more than one `Body` role, more than
    /// one `UrlOverride` role, duplicate `Path` names, a `Path` role
    /// without a matching template placeholder, or a placeholder without
    /// a `Path` role.
    pub fn build(self) -> Result<MethodDescriptor> {
        let name = self.name;
        let template = PathTemplate::parse(self.template)?;

        let body_count = self
            .roles
            .iter()
            .filter(|role| matches!(role, ParamRole::Body))
            .count();
        if body_count > 1 {
            return Err(Error::binding(format!(
                "method `{name}` declares {body_count} body parameters; at most one is allowed"
            )));
        }

        let url_count = self
            .roles
            .iter()
            .filter(|role| matches!(role, ParamRole::UrlOverride))
            .count();
        if url_count > 1 {
            return Err(Error::binding(format!(
                "method `{name}` declares {url_count} URL parameters; at most one is allowed"
            )));
        }

        let mut path_names: Vec<&str> = Vec::new();
        for role in &self.roles {
            if let ParamRole::Path(param) = role {
                if path_names.contains(&param.as_str()) {
                    return Err(Error::binding(format!(
                        "method `{name}` declares path parameter `{param}` more than once"
                    )));
                }
                if !template.has_placeholder(param) {
                    return Err(Error::binding(format!(
                        "method `{name}` declares path parameter `{param}` but template `{template}` has no such placeholder"
                    )));
                }
                path_names.push(param);
            }
        }
        for placeholder in template.placeholders() {
            if !path_names.contains(&placeholder.as_str()) {
                return Err(Error::binding(format!(
                    "template placeholder `{placeholder}` of method `{name}` has no path parameter"
                )));
            }
        }

        Ok(MethodDescriptor {
            name,
            method: self.method,
            template,
            roles: self.roles,
            static_headers: self.static_headers,
            content_type: self.content_type,
        })
    }
}

/// Source of method metadata, consulted exactly once at client
/// construction.
pub trait MetadataProvider {
    /// Describe every method of the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata itself is invalid.
    fn describe(&self) -> Result<Vec<MethodDescriptor>>;
}

impl<F> MetadataProvider for F
where
    F: Fn() -> Result<Vec<MethodDescriptor>>,
{
    fn describe(&self) -> Result<Vec<MethodDescriptor>> {
        self()
    }
}

/// A fixed, pre-built descriptor list as a metadata provider.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata(pub Vec<MethodDescriptor>);

impl MetadataProvider for StaticMetadata {
    fn describe(&self) -> Result<Vec<MethodDescriptor>> {
        Ok(self.0.clone())
    }
}

/// Read-only descriptor store: built once, indexed by position, looked
/// up by name, never mutated.
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    descriptors: Vec<MethodDescriptor>,
    by_name: HashMap<String, usize>,
}

impl DescriptorTable {
    /// Build a table from a list of descriptors.
    ///
    /// # Errors
    ///
    /// Returns a binding error on duplicate method names.
    pub fn new(descriptors: Vec<MethodDescriptor>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_name
                .insert(descriptor.name().to_string(), index)
                .is_some()
            {
                return Err(Error::binding(format!(
                    "duplicate method name `{}`",
                    descriptor.name()
                )));
            }
        }
        Ok(Self {
            descriptors,
            by_name,
        })
    }

    /// Build a table by consulting a metadata provider once.
    ///
    /// # Errors
    ///
    /// Propagates provider errors and duplicate-name errors.
    pub fn from_provider(provider: &dyn MetadataProvider) -> Result<Self> {
        Self::new(provider.describe()?)
    }

    /// Descriptor by method name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MethodDescriptor> {
        self.by_name
            .get(name)
            .and_then(|&index| self.descriptors.get(index))
    }

    /// Descriptor by position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&MethodDescriptor> {
        self.descriptors.get(index)
    }

    /// Position of a method by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the table has no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterate descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptors.iter()
    }
}
