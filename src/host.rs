//! Host-facing call surface
//!
//! Hosts call functions by name with positional numeric arguments and get a
//! structured value back: `{"success": true, "image": "<base64>"}` or
//! `{"error": "<message>"}`. Errors never escape as panics.
//!
//! Names live in a process-wide registry that is filled by an explicit
//! [`register_builtins`] call at startup and never emptied.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{render_walk, Error, RenderParameters, Result, WalkConfig, WalkImage};

/// Name the walk renderer is registered under
pub const WALK: &str = "walk";

/// Positional arguments of `walk`, in order
pub const WALK_ARGS: [&str; 4] = ["stepLength", "numSteps", "width", "height"];

/// Structured result of a host call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WalkResponse {
    Success { success: bool, image: String },
    Failure { error: String },
}

impl WalkResponse {
    pub fn success(image: &WalkImage) -> Self {
        WalkResponse::Success {
            success: true,
            image: image.to_base64(),
        }
    }

    pub fn failure(err: &Error) -> Self {
        WalkResponse::Failure {
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WalkResponse::Success { success: true, .. })
    }

    pub fn to_json(&self) -> Value {
        // Serialization of these two shapes cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A callable registered with the host
pub type Handler = Arc<dyn Fn(&[Value]) -> WalkResponse + Send + Sync>;

static REGISTRY: OnceLock<Mutex<HashMap<String, Handler>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<String, Handler>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Bind `name` to `handler`, replacing any earlier binding.
pub fn register<F>(name: &str, handler: F)
where
    F: Fn(&[Value]) -> WalkResponse + Send + Sync + 'static,
{
    let mut map = registry().lock().unwrap_or_else(|e| e.into_inner());
    map.insert(name.to_string(), Arc::new(handler));
    debug!("registered host function `{}`", name);
}

/// Register `walk`, bound to `config`.
pub fn register_builtins(config: WalkConfig) {
    register(WALK, move |args| walk(args, &config));
}

pub fn is_registered(name: &str) -> bool {
    registry()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(name)
}

/// Call a registered function by name.
pub fn invoke(name: &str, args: &[Value]) -> WalkResponse {
    // Clone the handler out so the lock is not held while rendering
    let handler = registry()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(name)
        .cloned();
    match handler {
        Some(handler) => handler(args),
        None => {
            warn!("call to unregistered function `{}`", name);
            WalkResponse::failure(&Error::UnknownFunction(name.to_string()))
        }
    }
}

/// Marshal positional arguments into [`RenderParameters`].
///
/// `None` marks an argument that is not a number. The arity check runs
/// first. Integer arguments are truncated toward zero.
pub fn parse_numbers(args: &[Option<f64>]) -> Result<RenderParameters> {
    if args.len() != WALK_ARGS.len() {
        return Err(Error::Arity {
            expected: WALK_ARGS.len(),
            got: args.len(),
        });
    }
    let mut values = [0.0f64; 4];
    for (i, (&arg, name)) in args.iter().zip(WALK_ARGS).enumerate() {
        values[i] = arg.ok_or_else(|| Error::Validation(format!("{name} must be a number")))?;
    }
    Ok(RenderParameters {
        step_length: values[0],
        num_steps: values[1].trunc() as i64,
        width: values[2].trunc() as i64,
        height: values[3].trunc() as i64,
    })
}

/// Run the `walk` contract over already-extracted numbers with a custom
/// renderer. The renderer is not called when marshalling fails.
pub fn walk_numbers_with<F>(args: &[Option<f64>], render: F) -> WalkResponse
where
    F: FnOnce(&RenderParameters) -> Result<WalkImage>,
{
    let result = parse_numbers(args).and_then(|params| render(&params));
    match result {
        Ok(image) => WalkResponse::success(&image),
        Err(err) => {
            warn!("walk failed: {}", err);
            WalkResponse::failure(&err)
        }
    }
}

pub fn walk_numbers(args: &[Option<f64>], config: &WalkConfig) -> WalkResponse {
    walk_numbers_with(args, |params| render_walk(params, config))
}

/// The `walk` entry point over JSON values.
pub fn walk(args: &[Value], config: &WalkConfig) -> WalkResponse {
    let numbers: Vec<Option<f64>> = args.iter().map(Value::as_f64).collect();
    walk_numbers(&numbers, config)
}

/// One request line of the native serve protocol:
/// `{"call": "walk", "args": [10, 5, 200, 200]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub call: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Decode a request line and invoke it. Malformed lines produce an error
/// response rather than failing the loop.
pub fn handle_line(line: &str) -> WalkResponse {
    match serde_json::from_str::<CallRequest>(line) {
        Ok(req) => invoke(&req.call, &req.args),
        Err(e) => WalkResponse::failure(&Error::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    const ARITY_MSG: &str = "Expected 4 arguments: stepLength, numSteps, width, height";

    #[test]
    fn arity_errors_skip_rendering() {
        for n in [0usize, 1, 3, 5, 8] {
            let args = vec![Some(1.0); n];
            let called = Cell::new(false);
            let resp = walk_numbers_with(&args, |_| {
                called.set(true);
                Err(Error::Other("unreachable".into()))
            });
            assert_eq!(
                resp,
                WalkResponse::Failure {
                    error: ARITY_MSG.to_string()
                }
            );
            assert!(!called.get());
        }
    }

    #[test]
    fn parse_truncates_integers() {
        let p = parse_numbers(&[Some(2.5), Some(3.9), Some(201.7), Some(-0.5)]).unwrap();
        assert_eq!(p.step_length, 2.5);
        assert_eq!(p.num_steps, 3);
        assert_eq!(p.width, 201);
        assert_eq!(p.height, 0);
    }

    #[test]
    fn non_numeric_argument_is_rejected() {
        let err = parse_numbers(&[Some(1.0), None, Some(1.0), Some(1.0)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters: numSteps must be a number");
    }

    #[test]
    fn response_json_shapes() {
        let ok = WalkResponse::Success {
            success: true,
            image: "AAAA".into(),
        };
        assert_eq!(ok.to_json(), json!({"success": true, "image": "AAAA"}));
        let err = WalkResponse::Failure { error: "boom".into() };
        assert_eq!(err.to_json(), json!({"error": "boom"}));

        let back: WalkResponse = serde_json::from_value(json!({"error": "x"})).unwrap();
        assert!(!back.is_success());
    }

    #[test]
    fn walk_over_json_values() {
        let resp = walk(&[json!(10), json!(5), json!(40), json!(30)], &WalkConfig::default());
        assert!(resp.is_success());

        let resp = walk(&[json!(10), json!("5"), json!(40), json!(30)], &WalkConfig::default());
        assert!(!resp.is_success());
    }

    #[test]
    fn registry_dispatch() {
        register("test_echo_error", |args| WalkResponse::Failure {
            error: format!("{} args", args.len()),
        });
        assert!(is_registered("test_echo_error"));
        assert_eq!(
            invoke("test_echo_error", &[json!(1), json!(2)]),
            WalkResponse::Failure {
                error: "2 args".into()
            }
        );
        let missing = invoke("test_never_registered", &[]);
        assert_eq!(
            missing,
            WalkResponse::Failure {
                error: "Unknown function: test_never_registered".into()
            }
        );
    }

    #[test]
    fn malformed_lines_become_error_responses() {
        let resp = handle_line("not json");
        match resp {
            WalkResponse::Failure { error } => assert!(error.starts_with("Malformed request")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
