use crate::error::Error;
use crate::models::checklist::DEFAULT_RULES;
use crate::models::day_score::ScoreWeights;
use crate::scoring::composite::DEFAULT_PERIOD_DAYS;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 2;

/// Sanitized scoring knobs read out of the settings file.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub period_days: u32,
    pub weights: ScoreWeights,
    pub low_score_threshold: u8,
    pub default_rules: Vec<String>,
}

pub fn load_settings(data_dir: &Path) -> crate::Result<Value> {
    let path = settings_path(data_dir);
    fs::create_dir_all(data_dir)
        .map_err(|e| Error::Settings(format!("failed to create data directory: {e}")))?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| Error::Settings(format!("failed to read settings.json: {e}")))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({}))
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

/// Merge a partial settings object into the stored file; unrelated keys
/// survive.
pub fn save_settings(data_dir: &Path, settings: Value) -> crate::Result<Value> {
    let path = settings_path(data_dir);

    let mut merged = load_settings(data_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

/// Typed view of the scoring-relevant settings, sanitized.
pub fn load_scoring_settings(data_dir: &Path) -> crate::Result<ScoringSettings> {
    let settings = load_settings(data_dir)?;

    let period_days = settings
        .get("periodDays")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_PERIOD_DAYS as u64)
        .clamp(1, 31) as u32;

    let low_score_threshold = settings
        .get("lowScoreThreshold")
        .and_then(Value::as_u64)
        .unwrap_or(60)
        .clamp(0, 100) as u8;

    let weights = settings
        .get("weights")
        .cloned()
        .and_then(|v| serde_json::from_value::<ScoreWeights>(v).ok())
        .unwrap_or_default()
        .normalized();

    let default_rules = settings
        .get("defaultRules")
        .and_then(Value::as_array)
        .map(|rules| {
            rules
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|rules| !rules.is_empty())
        .unwrap_or_else(|| DEFAULT_RULES.iter().map(|r| r.to_string()).collect());

    Ok(ScoringSettings {
        period_days,
        weights,
        low_score_threshold,
        default_rules,
    })
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

fn write_settings_file(path: &Path, settings: &Value) -> crate::Result<()> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| Error::Settings(format!("failed to serialize settings: {e}")))?;
    fs::write(path, raw).map_err(|e| Error::Settings(format!("failed to write settings.json: {e}")))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    deep_merge_defaults(&mut out, &defaults);

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        migrate_weights_from_percentages(&mut out);
    }

    if version < 2 {
        // V2 introduces the checklist seed list and notification flag.
        ensure_key(&mut out, "defaultRules", json!(DEFAULT_RULES));
        ensure_key(&mut out, "notificationsEnabled", json!(true));
    }

    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "periodDays": DEFAULT_PERIOD_DAYS,
        "weights": ScoreWeights::default(),
        "lowScoreThreshold": 60,
        "defaultRules": DEFAULT_RULES,
        "notificationsEnabled": true
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object())
    else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn ensure_key(target: &mut Value, key: &str, value: Value) {
    if let Some(obj) = target.as_object_mut() {
        obj.entry(key.to_string()).or_insert(value);
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

/// Early builds stored weights as 0-100 percentages.
fn migrate_weights_from_percentages(settings: &mut Value) {
    let Some(weights) = settings.get_mut("weights").and_then(Value::as_object_mut) else {
        return;
    };

    let has_percentage_like_values = weights.values().any(|v| v.as_f64().unwrap_or(0.0) > 1.0);
    if !has_percentage_like_values {
        return;
    }

    for value in weights.values_mut() {
        if let Some(v) = value.as_f64() {
            *value = json!(v / 100.0);
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "periodDays", 1, 31, DEFAULT_PERIOD_DAYS as u64);
    clamp_u64(obj, "lowScoreThreshold", 0, 100, 60);
    ensure_bool(obj, "notificationsEnabled", true);

    // The seed list must be a non-empty array of strings.
    let rules_valid = obj
        .get("defaultRules")
        .and_then(Value::as_array)
        .map(|rules| !rules.is_empty() && rules.iter().all(Value::is_string))
        .unwrap_or(false);
    if !rules_valid {
        obj.insert("defaultRules".to_string(), json!(DEFAULT_RULES));
    }

    let weights = obj
        .get("weights")
        .cloned()
        .and_then(|v| serde_json::from_value::<ScoreWeights>(v).ok())
        .unwrap_or_default()
        .normalized();
    obj.insert("weights".to_string(), json!(weights));
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
