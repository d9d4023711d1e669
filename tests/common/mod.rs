#![allow(dead_code)]

use brrtplus::host::RouteTable;
use brrtplus::{ResourceHandle, StaticResource};
use http::Method;
use serde_json::Value;

/// An echo handler: serves GET and is identified by its name.
pub fn echo(name: &str) -> ResourceHandle {
    StaticResource::new(name).method(Method::GET, None).into()
}

/// What the route table would serve at `path`: `"<Handler> <reply>"`.
pub fn fetch(table: &RouteTable, path: &str) -> Option<String> {
    let matched = table.route(path)?;
    let reply = match matched.options.args.get("reply") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    Some(format!("{} {}", matched.handler.name(), reply))
}

pub const GREETING_DOC: &str = "Get a greeting endpoint.
    ---
    description: Get a greeting
    responses:
        200:
            description: A greeting to the client
    ";

pub const OTHER_GREETING_DOC: &str = "Get a greeting endpoint.
    ---
    description: Get a greeting from another handler
    responses:
        200:
            description: A greeting to the client from another handler
    ";
