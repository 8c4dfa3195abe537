//! Positional binding of runtime arguments to declared parameter roles.

use crate::{ArgValue, BodyValue, Error, MethodDescriptor, ParamRole, Result, UrlOverride};

/// The binder's output: every argument routed to its place in the
/// request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    /// The URL-override argument, if one was supplied.
    pub url_override: Option<UrlOverride>,
    /// Path placeholder values, in role order.
    pub path: Vec<(String, String)>,
    /// Query pairs, in role order; absent optionals are omitted.
    pub query: Vec<(String, String)>,
    /// Header pairs, in role order; absent optionals are omitted.
    pub headers: Vec<(String, String)>,
    /// The body argument, if one was supplied.
    pub body: Option<BodyValue>,
}

/// Route each argument into the URL, headers, query, or body according
/// to its declared role.
///
/// Pure function of descriptor and arguments: identical inputs produce
/// identical output, and no state is shared across calls.
///
/// # Errors
///
/// Returns a binding error on an arity mismatch, a role/value mismatch
/// (e.g. a multipart form in a query slot), or a missing required path
/// value.
pub fn bind(descriptor: &MethodDescriptor, args: Vec<ArgValue>) -> Result<BoundParams> {
    let roles = descriptor.roles();
    if args.len() != roles.len() {
        return Err(Error::binding(format!(
            "method `{}` takes {} arguments but {} were supplied",
            descriptor.name(),
            roles.len(),
            args.len()
        )));
    }

    let mut bound = BoundParams::default();

    for (position, (role, arg)) in roles.iter().zip(args).enumerate() {
        match role {
            ParamRole::UrlOverride => match arg {
                ArgValue::Text(text) => bound.url_override = Some(UrlOverride::parse(text)),
                ArgValue::Url(url) => bound.url_override = Some(UrlOverride::from(url)),
                ArgValue::Absent => {}
                other => return Err(mismatch(descriptor, position, role, &other)),
            },
            ParamRole::Path(name) => match arg {
                ArgValue::Text(text) => bound.path.push((name.clone(), text)),
                ArgValue::Absent => {
                    return Err(Error::binding(format!(
                        "path parameter `{name}` of method `{}` requires a value",
                        descriptor.name()
                    )));
                }
                other => return Err(mismatch(descriptor, position, role, &other)),
            },
            ParamRole::Query(name) => match arg {
                ArgValue::Text(text) => bound.query.push((name.clone(), text)),
                ArgValue::Absent => {}
                other => return Err(mismatch(descriptor, position, role, &other)),
            },
            ParamRole::Header(name) => match arg {
                ArgValue::Text(text) => bound.headers.push((name.clone(), text)),
                ArgValue::Absent => {}
                other => return Err(mismatch(descriptor, position, role, &other)),
            },
            ParamRole::Body => match arg {
                ArgValue::Text(text) => bound.body = Some(BodyValue::Text(text)),
                ArgValue::Bytes(data) => bound.body = Some(BodyValue::Bytes(data)),
                ArgValue::Json(value) => bound.body = Some(BodyValue::Structured(value)),
                ArgValue::Multipart(form) => bound.body = Some(BodyValue::Multipart(form)),
                ArgValue::Absent => {}
                other @ ArgValue::Url(_) => {
                    return Err(mismatch(descriptor, position, role, &other));
                }
            },
        }
    }

    Ok(bound)
}

fn mismatch(
    descriptor: &MethodDescriptor,
    position: usize,
    role: &ParamRole,
    arg: &ArgValue,
) -> Error {
    Error::binding(format!(
        "argument {position} of method `{}`: {role} role cannot take {}",
        descriptor.name(),
        describe(arg)
    ))
}

const fn describe(arg: &ArgValue) -> &'static str {
    match arg {
        ArgValue::Text(_) => "a scalar",
        ArgValue::Url(_) => "a URL value",
        ArgValue::Json(_) => "a structured value",
        ArgValue::Bytes(_) => "raw bytes",
        ArgValue::Multipart(_) => "a multipart form",
        ArgValue::Absent => "an absent value",
    }
}
