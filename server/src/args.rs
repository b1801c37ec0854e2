//! Request argument parsing.
//!
//! Arguments are collected from the query string and the request body into a
//! flat field set ([`RequestFields`]), then checked against a declared list of
//! [`Argument`]s by a [`RequestParser`]. A field that fails its check rejects
//! the whole request; nothing reaches the entity model.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue};
use axum::Form;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use userbase_model::Gender;

/// A declared text argument.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: &'static str,
    pub choices: &'static [&'static str],
    pub help: &'static str,
}

impl Argument {
    pub const fn text(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            choices: &[],
            help,
        }
    }

    /// Restricts the argument to a fixed set of values.
    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Checks a present value. `Ok(false)` means the value is accepted but
    /// carries nothing (a `null` for an argument without choices).
    fn check(&self, value: &Value) -> Result<bool, ()> {
        let text = match value {
            Value::String(s) => s.as_str(),
            Value::Null if self.choices.is_empty() => return Ok(false),
            _ => return Err(()),
        };
        if !self.choices.is_empty() && !self.choices.contains(&text) {
            return Err(());
        }
        Ok(true)
    }
}

/// Checks field sets against declared arguments.
#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    arguments: Vec<Argument>,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Validates `fields` against the declared arguments.
    ///
    /// Every failing argument is reported together. With `strict`, fields
    /// that were not declared reject the request as well.
    pub fn parse_args(&self, mut fields: Map<String, Value>, strict: bool) -> ApiResult<Arguments> {
        let mut parsed = Map::new();
        let mut invalid = BTreeMap::new();

        for argument in &self.arguments {
            let Some(value) = fields.remove(argument.name) else {
                continue;
            };
            match argument.check(&value) {
                Ok(true) => {
                    parsed.insert(argument.name.to_string(), value);
                }
                Ok(false) => {}
                Err(()) => {
                    invalid.insert(argument.name.to_string(), argument.help.to_string());
                }
            }
        }

        if !invalid.is_empty() {
            return Err(ApiError::InvalidArguments(invalid));
        }
        if strict && !fields.is_empty() {
            let mut unknown: Vec<String> = fields.into_iter().map(|(name, _)| name).collect();
            unknown.sort();
            return Err(ApiError::UnknownArguments(unknown));
        }
        Ok(Arguments(parsed))
    }
}

/// Arguments that passed validation. Absent fields are simply missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

static USER_PARSER: LazyLock<RequestParser> = LazyLock::new(|| {
    RequestParser::new()
        .argument(Argument::text("name", "Name of the user"))
        .argument(Argument::text("gender", "Gender of the user").choices(&Gender::CHOICES))
});

/// Parser for the `name` and `gender` arguments of the user endpoints.
pub fn user_parser() -> &'static RequestParser {
    &USER_PARSER
}

/// Raw fields of a request, gathered from the query string and the body.
///
/// The body may be a JSON object, an `application/x-www-form-urlencoded`
/// form or a `multipart/form-data` form (file parts are skipped). Body fields
/// override query fields of the same name. An empty body contributes nothing.
#[derive(Debug, Clone, Default)]
pub struct RequestFields(pub Map<String, Value>);

/// How a request body is encoded, judged by its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart,
    Json,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let media_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .unwrap_or_default();

        if media_type.eq_ignore_ascii_case(URL_ENCODED) {
            Self::UrlEncoded
        } else if media_type.eq_ignore_ascii_case(MULTIPART) {
            Self::Multipart
        } else {
            Self::Json
        }
    }
}

const URL_ENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Rewrites the media type of `Content-Type` to its lowercase spelling,
/// keeping any parameters. axum's form extractors match it case-sensitively.
fn normalize_media_type(headers: &mut HeaderMap, media_type: &str) {
    let value = match headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split_once(';'))
    {
        Some((_, params)) => format!("{media_type};{params}"),
        None => media_type.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(CONTENT_TYPE, value);
    }
}

fn text_field(name: String, value: String) -> (String, Value) {
    (name, Value::String(value))
}

impl<S> FromRequest<S> for RequestFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
        let mut fields: Map<String, Value> =
            query.into_iter().map(|(name, value)| text_field(name, value)).collect();

        match BodyKind::from_headers(req.headers()) {
            BodyKind::UrlEncoded => {
                normalize_media_type(req.headers_mut(), URL_ENCODED);
                let Form(form) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
                fields.extend(form.into_iter().map(|(name, value)| text_field(name, value)));
            }
            BodyKind::Multipart => {
                normalize_media_type(req.headers_mut(), MULTIPART);
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
                while let Some(field) = multipart
                    .next_field()
                    .await
                    .map_err(|e| ApiError::MalformedBody(e.body_text()))?
                {
                    if field.file_name().is_some() {
                        continue;
                    }
                    let Some(name) = field.name().map(str::to_owned) else {
                        continue;
                    };
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
                    fields.insert(name, Value::String(value));
                }
            }
            BodyKind::Json => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
                fields.extend(json_fields(&body)?);
            }
        }

        Ok(Self(fields))
    }
}

fn json_fields(body: &[u8]) -> ApiResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::MalformedBody("expected a JSON object".into())),
        Err(e) => Err(ApiError::MalformedBody(e.to_string())),
    }
}
