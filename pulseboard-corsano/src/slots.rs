//! Reshaping intra-day slot data into a staging table.

use pulseboard_elastic::Table;
use serde_json::{Map, Value};

/// Collect every `slots` array in a summaries response into one table.
///
/// The walk descends objects and arrays; an object carrying a `slots`
/// array contributes one row per slot, tagged with a leading `type`
/// column naming the key the object was found under (null at the top
/// level or inside arrays). Row order follows the walk.
pub fn extract_slots(data: &Value) -> Table {
    let mut table = Table::new();
    collect_slots(data, None, &mut table);
    table
}

fn collect_slots(data: &Value, key: Option<&str>, table: &mut Table) {
    match data {
        Value::Object(map) => {
            if let Some(slots) = map.get("slots").and_then(Value::as_array) {
                for slot in slots {
                    let mut row = Map::new();
                    row.insert(
                        "type".to_string(),
                        key.map_or(Value::Null, |key| Value::String(key.to_string())),
                    );
                    if let Some(fields) = slot.as_object() {
                        for (field, value) in fields {
                            row.insert(field.clone(), value.clone());
                        }
                    }
                    table.push(row);
                }
            } else {
                for (child_key, child) in map {
                    collect_slots(child, Some(child_key), table);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_slots(item, None, table);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slots_tagged_with_parent_key() {
        let data = json!({
            "activity": {
                "slots": [
                    { "time": "08:00", "steps": 300 },
                    { "time": "09:00", "steps": 1200 }
                ]
            },
            "heart_rate": {
                "slots": [
                    { "time": "08:00", "bpm": 61 }
                ]
            }
        });

        let table = extract_slots(&data);

        assert_eq!(table.len(), 3);
        assert_eq!(table.columns()[0], "type");
        assert_eq!(table.rows()[0]["type"], json!("activity"));
        assert_eq!(table.rows()[0]["steps"], json!(300));
        assert_eq!(table.rows()[2]["type"], json!("heart_rate"));
        assert_eq!(table.rows()[2]["bpm"], json!(61));
    }

    #[test]
    fn test_slots_found_through_arrays() {
        let data = json!({
            "data": [
                { "activity": { "slots": [{ "steps": 300 }] } },
                { "activity": { "slots": [{ "steps": 500 }] } }
            ]
        });

        let table = extract_slots(&data);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1]["steps"], json!(500));
        assert_eq!(table.rows()[1]["type"], json!("activity"));
    }

    #[test]
    fn test_no_slots_yields_empty_table() {
        let data = json!({ "activity": { "total_steps": 9000 } });
        assert!(extract_slots(&data).is_empty());
    }
}
