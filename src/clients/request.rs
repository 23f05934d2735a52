//! Per-request options and script trigger normalization.
//!
//! The Data API accepts triggered scripts in two shapes: an explicit
//! `scripts` sequence of `{name, phase, param}` entries, and flat
//! `script.<phase>` / `script.<phase>.param` keys. [`RequestOptions`] models
//! both; [`RequestOptions::build_scripts`] merges them into one ordered
//! sequence of [`ScriptTrigger`] values so downstream code only ever handles
//! a single representation.
//!
//! # Merge Order
//!
//! Array entries come first, in the order given, followed by scalar-derived
//! entries in prerequest, presort, default order. Nothing is deduplicated and
//! nothing is dropped. When the merged sequence is projected onto the wire's
//! flat keys, the last trigger for each phase wins, because the wire has one
//! slot per phase.
//!
//! # Example
//!
//! ```rust
//! use fmdata::{RequestOptions, ScriptPhase, ScriptTrigger};
//! use serde_json::json;
//!
//! let options = RequestOptions::new()
//!     .script_prerequest("Prep Script", Some(json!(2)))
//!     .scripts(vec![ScriptTrigger::new("Log Script", ScriptPhase::Default, None)]);
//!
//! let merged = options.build_scripts();
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged[0].name, "Log Script");
//! assert_eq!(merged[1].param.as_deref(), Some("2"));
//! ```

use std::time::Duration;

use serde_json::{Map, Value};

/// The phase at which a triggered script runs on the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptPhase {
    /// Runs before the request is processed.
    Prerequest,
    /// Runs before the result set is sorted.
    Presort,
    /// Runs after the request completes. This is the phase used when a
    /// trigger does not name one.
    #[default]
    Default,
}

impl ScriptPhase {
    /// Returns the flat wire key for this phase (without the `.param` suffix).
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::Prerequest => "script.prerequest",
            Self::Presort => "script.presort",
            Self::Default => "script",
        }
    }
}

/// A server-side script invocation attached to a request.
///
/// The `param` is stored already coerced to a string, because the Data API
/// only accepts string script parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptTrigger {
    /// The name of the script on the server.
    pub name: String,
    /// The phase at which the script runs.
    pub phase: ScriptPhase,
    /// The script parameter, coerced to a string.
    pub param: Option<String>,
}

impl ScriptTrigger {
    /// Creates a new trigger, coercing a non-string `param` to its compact
    /// JSON text (`2` becomes `"2"`, `{"data":true}` becomes
    /// `"{\"data\":true}"`).
    #[must_use]
    pub fn new(name: impl Into<String>, phase: ScriptPhase, param: Option<Value>) -> Self {
        Self {
            name: name.into(),
            phase,
            param: param.map(coerce_param),
        }
    }
}

/// Coerces a script parameter to the string form the wire requires.
///
/// Strings pass through untouched; everything else is serialized to compact
/// JSON text.
fn coerce_param(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// A script supplied through the flat `script.<phase>` keys rather than the
/// `scripts` sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ScalarScript {
    name: String,
    param: Option<String>,
}

/// Options applied to a single data operation.
///
/// Covers the per-request timeout, both shapes of triggered scripts, and the
/// find-specific paging knobs. All fields are optional; `RequestOptions::new()`
/// (or `default()`) applies nothing.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    scripts: Vec<ScriptTrigger>,
    script: Option<ScalarScript>,
    script_prerequest: Option<ScalarScript>,
    script_presort: Option<ScalarScript>,
    limit: Option<u64>,
    offset: Option<u64>,
    sort: Option<Value>,
}

impl RequestOptions {
    /// Creates an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-request timeout.
    ///
    /// A timeout that elapses before the server responds resolves to a
    /// connection-class error with its own code; it never hangs the caller.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the explicit `scripts` sequence. Order is preserved.
    #[must_use]
    pub fn scripts(mut self, scripts: Vec<ScriptTrigger>) -> Self {
        self.scripts = scripts;
        self
    }

    /// Sets the flat `script` / `script.param` pair (default phase).
    #[must_use]
    pub fn script(mut self, name: impl Into<String>, param: Option<Value>) -> Self {
        self.script = Some(ScalarScript {
            name: name.into(),
            param: param.map(coerce_param),
        });
        self
    }

    /// Sets the flat `script.prerequest` / `script.prerequest.param` pair.
    #[must_use]
    pub fn script_prerequest(mut self, name: impl Into<String>, param: Option<Value>) -> Self {
        self.script_prerequest = Some(ScalarScript {
            name: name.into(),
            param: param.map(coerce_param),
        });
        self
    }

    /// Sets the flat `script.presort` / `script.presort.param` pair.
    #[must_use]
    pub fn script_presort(mut self, name: impl Into<String>, param: Option<Value>) -> Self {
        self.script_presort = Some(ScalarScript {
            name: name.into(),
            param: param.map(coerce_param),
        });
        self
    }

    /// Limits the number of records a find returns.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` records of a find result.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the find sort specification, passed through to the server as
    /// given (a sequence of `{fieldName, sortOrder}` objects).
    #[must_use]
    pub fn sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Merges both script shapes into one ordered sequence.
    ///
    /// Array entries first, in given order; scalar-derived entries appended
    /// in prerequest, presort, default order. No entry is dropped.
    #[must_use]
    pub fn build_scripts(&self) -> Vec<ScriptTrigger> {
        let mut merged = self.scripts.clone();
        let scalars = [
            (ScriptPhase::Prerequest, &self.script_prerequest),
            (ScriptPhase::Presort, &self.script_presort),
            (ScriptPhase::Default, &self.script),
        ];
        for (phase, scalar) in scalars {
            if let Some(scalar) = scalar {
                merged.push(ScriptTrigger {
                    name: scalar.name.clone(),
                    phase,
                    param: scalar.param.clone(),
                });
            }
        }
        merged
    }

    /// Projects the merged script sequence onto the wire's flat keys.
    ///
    /// The wire holds one script slot per phase, so the last trigger for each
    /// phase in the merged sequence is the one transmitted.
    #[must_use]
    pub(crate) fn script_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for trigger in self.build_scripts() {
            let key = trigger.phase.wire_key();
            upsert(&mut params, key.to_string(), trigger.name);
            if let Some(param) = trigger.param {
                upsert(&mut params, format!("{key}.param"), param);
            }
        }
        params
    }

    /// Writes the script keys into a JSON request body.
    pub(crate) fn apply_to_body(&self, body: &mut Map<String, Value>) {
        for (key, value) in self.script_params() {
            body.insert(key, Value::String(value));
        }
    }

    /// Writes the find-specific paging keys into a JSON request body.
    pub(crate) fn apply_find_paging(&self, body: &mut Map<String, Value>) {
        if let Some(limit) = self.limit {
            body.insert("limit".to_string(), Value::String(limit.to_string()));
        }
        if let Some(offset) = self.offset {
            body.insert("offset".to_string(), Value::String(offset.to_string()));
        }
        if let Some(sort) = &self.sort {
            body.insert("sort".to_string(), sort.clone());
        }
    }
}

/// Replaces an existing key in the pair list or appends a new one.
fn upsert(params: &mut Vec<(String, String)>, key: String, value: String) {
    if let Some(entry) = params.iter_mut().find(|(existing, _)| *existing == key) {
        entry.1 = value;
    } else {
        params.push((key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_scripts_preserves_array_order() {
        let options = RequestOptions::new().scripts(vec![
            ScriptTrigger::new("First", ScriptPhase::Prerequest, None),
            ScriptTrigger::new("Second", ScriptPhase::Default, None),
            ScriptTrigger::new("Third", ScriptPhase::Presort, None),
        ]);

        let merged = options.build_scripts();
        let names: Vec<&str> = merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_build_scripts_appends_scalars_after_array() {
        let options = RequestOptions::new()
            .script_prerequest("Scalar Script", Some(json!("A Parameter")))
            .scripts(vec![
                ScriptTrigger::new("Array Script", ScriptPhase::Default, None),
                ScriptTrigger::new("Array Script", ScriptPhase::Presort, None),
            ]);

        let merged = options.build_scripts();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "Array Script");
        assert_eq!(merged[2].name, "Scalar Script");
        assert_eq!(merged[2].phase, ScriptPhase::Prerequest);
    }

    #[test]
    fn test_build_scripts_keeps_duplicate_phases() {
        // One prerequest trigger from each shape: both survive the merge.
        let options = RequestOptions::new()
            .script_prerequest("Scalar", None)
            .scripts(vec![ScriptTrigger::new("Array", ScriptPhase::Prerequest, None)]);

        let merged = options.build_scripts();
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|t| t.phase == ScriptPhase::Prerequest));
    }

    #[test]
    fn test_scalar_order_is_prerequest_presort_default() {
        let options = RequestOptions::new()
            .script("Last", None)
            .script_presort("Middle", None)
            .script_prerequest("First", None);

        let merged = options.build_scripts();
        let names: Vec<&str> = merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Middle", "Last"]);
    }

    #[test]
    fn test_numeric_params_are_stringified() {
        let trigger = ScriptTrigger::new("Script", ScriptPhase::Default, Some(json!(2)));
        assert_eq!(trigger.param.as_deref(), Some("2"));
    }

    #[test]
    fn test_object_params_are_stringified() {
        let trigger =
            ScriptTrigger::new("Script", ScriptPhase::Presort, Some(json!({"data": true})));
        assert_eq!(trigger.param.as_deref(), Some(r#"{"data":true}"#));
    }

    #[test]
    fn test_string_params_pass_through_unquoted() {
        let trigger =
            ScriptTrigger::new("Script", ScriptPhase::Default, Some(json!("A Parameter")));
        assert_eq!(trigger.param.as_deref(), Some("A Parameter"));
    }

    #[test]
    fn test_script_params_last_trigger_per_phase_wins() {
        let options = RequestOptions::new()
            .script_prerequest("Scalar", Some(json!("scalar-param")))
            .scripts(vec![ScriptTrigger::new(
                "Array",
                ScriptPhase::Prerequest,
                Some(json!("array-param")),
            )]);

        let params = options.script_params();
        assert_eq!(
            params,
            vec![
                ("script.prerequest".to_string(), "Scalar".to_string()),
                ("script.prerequest.param".to_string(), "scalar-param".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_to_body_writes_flat_keys() {
        let options = RequestOptions::new()
            .script("After", Some(json!(2)))
            .script_prerequest("Before", None);

        let mut body = Map::new();
        options.apply_to_body(&mut body);

        assert_eq!(body["script.prerequest"], json!("Before"));
        assert_eq!(body["script"], json!("After"));
        assert_eq!(body["script.param"], json!("2"));
        assert!(!body.contains_key("script.prerequest.param"));
    }

    #[test]
    fn test_apply_find_paging() {
        let options = RequestOptions::new()
            .limit(2)
            .offset(10)
            .sort(json!([{"fieldName": "name", "sortOrder": "ascend"}]));

        let mut body = Map::new();
        options.apply_find_paging(&mut body);

        assert_eq!(body["limit"], json!("2"));
        assert_eq!(body["offset"], json!("10"));
        assert_eq!(body["sort"][0]["fieldName"], json!("name"));
    }

    #[test]
    fn test_empty_options_produce_no_params() {
        let options = RequestOptions::new();
        assert!(options.build_scripts().is_empty());
        assert!(options.script_params().is_empty());
        assert!(options.request_timeout().is_none());
    }
}
