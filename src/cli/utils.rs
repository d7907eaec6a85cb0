use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Print a success message; in JSON mode object `data` is merged into the envelope
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            match data {
                Some(Value::Object(extra)) => {
                    if let Some(envelope) = response.as_object_mut() {
                        envelope.extend(extra);
                    }
                }
                Some(other) => response["data"] = other,
                None => {}
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a value as pretty JSON, or as `key: value` lines in text mode
pub fn output_value(output_format: OutputFormat, value: &Value) -> anyhow::Result<()> {
    match (output_format, value) {
        (OutputFormat::Text, Value::Object(map)) => {
            for (key, field) in map {
                match field {
                    Value::String(s) => println!("{}: {}", key, s),
                    other => println!("{}: {}", key, other),
                }
            }
        }
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
