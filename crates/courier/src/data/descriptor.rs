use serde::Serialize;
use serde_json::Value;

use super::method::Method;

/// What to send: verb, target URI and an optional JSON body.
///
/// The body is only put on the wire for verbs where
/// [`Method::carries_body`] holds; for the others it is kept but ignored.
///
/// # Examples
///
/// ```
/// use courier::data::{Method, MethodDescriptor};
/// use serde_json::json;
///
/// let get = MethodDescriptor::get("/users/42");
/// assert_eq!(get.method(), Method::Get);
/// assert!(get.data().is_none());
///
/// let post = MethodDescriptor::post("/users", json!({ "name": "ada" }));
/// assert_eq!(post.data(), Some(&json!({ "name": "ada" })));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    method: Method,
    uri:    String,
    body:   Option<Value>,
}

impl MethodDescriptor {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self { Self::new(Method::Get, uri) }

    pub fn head(uri: impl Into<String>) -> Self { Self::new(Method::Head, uri) }

    pub fn options(uri: impl Into<String>) -> Self { Self::new(Method::Options, uri) }

    pub fn trace(uri: impl Into<String>) -> Self { Self::new(Method::Trace, uri) }

    pub fn connect(uri: impl Into<String>) -> Self { Self::new(Method::Connect, uri) }

    pub fn delete(uri: impl Into<String>) -> Self { Self::new(Method::Delete, uri) }

    pub fn post(uri: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, uri).with_body(body)
    }

    pub fn put(uri: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, uri).with_body(body)
    }

    pub fn patch(uri: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, uri).with_body(body)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the body.
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self, serde_json::Error> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    pub fn method(&self) -> Method { self.method }

    pub fn uri(&self) -> &str { &self.uri }

    pub fn data(&self) -> Option<&Value> { self.body.as_ref() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct NewUser<'a> {
        name: &'a str,
        age:  u8,
    }

    #[test]
    fn verb_constructors_set_method() {
        assert_eq!(MethodDescriptor::head("/x").method(), Method::Head);
        assert_eq!(MethodDescriptor::options("/x").method(), Method::Options);
        assert_eq!(MethodDescriptor::trace("/x").method(), Method::Trace);
        assert_eq!(MethodDescriptor::connect("/x").method(), Method::Connect);
        assert_eq!(MethodDescriptor::delete("/x").method(), Method::Delete);
        assert_eq!(MethodDescriptor::put("/x", json!(1)).method(), Method::Put);
        assert_eq!(MethodDescriptor::patch("/x", json!(1)).method(), Method::Patch);
    }

    #[test]
    fn with_json_serializes_struct() {
        let descriptor = MethodDescriptor::new(Method::Post, "/users")
            .with_json(&NewUser { name: "ada", age: 36 })
            .unwrap();
        assert_eq!(descriptor.uri(), "/users");
        assert_eq!(descriptor.data(), Some(&json!({ "name": "ada", "age": 36 })));
    }

    #[test]
    fn delete_may_hold_body() {
        let descriptor = MethodDescriptor::delete("/users/1").with_body(json!({ "force": true }));
        assert_eq!(descriptor.data(), Some(&json!({ "force": true })));
    }
}
