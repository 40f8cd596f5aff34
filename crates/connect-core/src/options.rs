//! Request options carried from the application to the wallet prompt.
//!
//! Options may hold `onFinish`/`onCancel` callbacks. Callbacks cannot cross a
//! serialization boundary (URL, message payload, persisted blob), so
//! [`sanitize`] produces a copy with both cleared before anything is encoded.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Invoked with the wallet's response payload.
pub type FinishCallback = Arc<dyn Fn(&Value) + Send + Sync>;
/// Invoked when the user dismisses the prompt.
pub type CancelCallback = Arc<dyn Fn() + Send + Sync>;

/// Field names of the callbacks in the wire form.
const CALLBACK_KEYS: [&str; 2] = ["onFinish", "onCancel"];

/// Options for a wallet request.
///
/// Serializing emits the plain fields only; callbacks are never written out.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub on_finish: Option<FinishCallback>,
    pub on_cancel: Option<CancelCallback>,
    fields: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the fields of a JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn on_finish(mut self, callback: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(callback));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn has_callbacks(&self) -> bool {
        self.on_finish.is_some() || self.on_cancel.is_some()
    }

    /// Call `on_finish` if one is set.
    pub fn finish(&self, payload: &Value) {
        if let Some(cb) = &self.on_finish {
            cb(payload);
        }
    }

    /// Call `on_cancel` if one is set.
    pub fn cancel(&self) {
        if let Some(cb) = &self.on_cancel {
            cb();
        }
    }

    /// Plain fields as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("on_finish", &self.on_finish.as_ref().map(|_| "<fn>"))
            .field("on_cancel", &self.on_cancel.as_ref().map(|_| "<fn>"))
            .field("fields", &self.fields)
            .finish()
    }
}

impl Serialize for RequestOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Copy `options` with `on_finish` and `on_cancel` cleared.
///
/// Both are cleared whether or not they were set, including plain fields
/// named `onFinish`/`onCancel`; every other field is copied unchanged.
pub fn sanitize(options: &RequestOptions) -> RequestOptions {
    let mut fields = options.fields.clone();
    for key in CALLBACK_KEYS {
        fields.remove(key);
    }
    RequestOptions {
        on_finish: None,
        on_cancel: None,
        fields,
    }
}
