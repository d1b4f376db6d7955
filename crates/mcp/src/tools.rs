//! Tool definitions derived from the operation registry.

use operations::{Operation, OperationDescriptor, ParamKind};
use serde_json::{json, Map, Value};

/// JSON schema describing the arguments of one operation.
pub fn input_schema(descriptor: &OperationDescriptor) -> Value {
    let mut properties = Map::new();
    for param in descriptor.params {
        let mut schema = json!({
            "type": param.kind.json_type(),
            "description": param.description,
        });
        if param.kind == ParamKind::Array {
            schema["items"] = match param.name {
                "recipients" => json!({
                    "type": "object",
                    "properties": { "email": { "type": "string" }, "name": { "type": "string" } },
                    "required": ["email"]
                }),
                "contacts" => json!({
                    "type": "object",
                    "properties": {
                        "email": { "type": "string" },
                        "firstName": { "type": "string" },
                        "lastName": { "type": "string" },
                        "custom1": { "type": "string" },
                        "custom2": { "type": "string" }
                    },
                    "required": ["email"]
                }),
                _ => json!({ "type": "string" }),
            };
        }
        properties.insert(param.name.to_string(), schema);
    }

    let required: Vec<&str> = descriptor
        .params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// `tools/list` entry for one operation.
pub fn tool_definition(descriptor: &OperationDescriptor) -> Value {
    json!({
        "name": descriptor.tool_name(),
        "description": descriptor.description,
        "inputSchema": input_schema(descriptor),
    })
}

/// Every tool, in registry order.
pub fn tool_definitions() -> Vec<Value> {
    Operation::ALL
        .iter()
        .map(|op| tool_definition(op.descriptor()))
        .collect()
}
