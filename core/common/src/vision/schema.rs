//! 品種判定レスポンスのJSONスキーマ
//!
//! ベンダーに渡すresponse_format。confidenceの[0,1]や必須フィールドは
//! ここで強制され、ローカルでは再検証しない。

use serde_json::{json, Value};

/// response_formatに埋め込むスキーマ名
pub const SCHEMA_NAME: &str = "breed_identification_response";

/// 品種判定レスポンスのスキーマ本体
pub fn breed_identification_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "breedName": {
                "type": "string",
                "description": "The identified breed name"
            },
            "confidence": {
                "type": "number",
                "minimum": 0,
                "maximum": 1,
                "description": "Confidence level between 0 and 1"
            },
            "breedInfo": {
                "type": "object",
                "properties": {
                    "origin": { "type": "string", "description": "Geographic origin of the breed" },
                    "type": { "type": "string", "description": "Type classification (e.g., Dairy Cattle, Water Buffalo)" },
                    "characteristics": { "type": "string", "description": "Physical and behavioral characteristics" },
                    "primaryUse": { "type": "string", "description": "Primary use of the breed" },
                    "averageWeight": { "type": "string", "description": "Average weight range" },
                    "milkYield": { "type": "string", "description": "Average milk yield if applicable" }
                },
                "required": ["origin", "type", "characteristics", "primaryUse"],
                "additionalProperties": false
            },
            "analysisNotes": {
                "type": "string",
                "description": "Additional analysis notes and reasoning for identification"
            },
            "alternativePossibilities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "breedName": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
                    },
                    "required": ["breedName", "confidence"]
                },
                "description": "Other possible breed identifications with lower confidence"
            }
        },
        "required": ["breedName", "confidence", "breedInfo", "analysisNotes"],
        "additionalProperties": false
    })
}

/// chat/completionsに渡すresponse_formatオブジェクト
pub fn breed_identification_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": breed_identification_schema()
        }
    })
}
