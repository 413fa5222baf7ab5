//! Build script for stride-sim
//!
//! Validates motion.toml at compile time so the embedded default
//! configuration always loads.

use std::fs;
use std::path::Path;

/// Keys that must be strictly positive wherever they appear
const POSITIVE_KEYS: &[&str] = &[
    "tick_duration",
    "mass",
    "moment_of_inertia",
    "move_acceleration",
    "turn_acceleration",
    "tolerance",
    "max_elapsed_s",
    "translation_rate",
    "rotation_rate",
    "speed",
    "max_velocity",
];

/// Keys that must not be negative
const NON_NEGATIVE_KEYS: &[&str] = &[
    "linear_damping",
    "angular_damping",
    "move_speed",
    "turn_speed",
    "position_epsilon",
    "rotation_epsilon",
    "scalar_epsilon",
];

const JOINTS: &[&str] = &["lift", "extend", "rotate"];

const MAX_CACHE_SIZE: i64 = 64;

fn main() {
    println!("cargo:rerun-if-changed=motion.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("motion.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read motion.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in motion.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_top_level(&config, &mut errors);

    if let Some(table) = config.get("agent").and_then(|v| v.as_table()) {
        validate_section("agent", table, &mut errors);
    }
    if let Some(table) = config.get("kinematic").and_then(|v| v.as_table()) {
        validate_section("kinematic", table, &mut errors);
    }
    validate_joints(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid motion configuration", &errors);
    }
}

/// Panic with a boxed list of errors
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Read an integer or float
fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn validate_top_level(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(version) = config.get("version") {
        if version.as_integer() != Some(1) {
            errors.push("version must be 1".to_string());
        }
    }

    if let Some(mode) = config.get("tick_mode") {
        match mode.as_str() {
            Some("stepped") | Some("batch") => {}
            _ => errors.push("tick_mode must be 'stepped' or 'batch'".to_string()),
        }
    }

    if let Some(ticks) = config.get("max_ticks") {
        if !matches!(ticks.as_integer(), Some(n) if n >= 1) {
            errors.push("max_ticks must be an integer >= 1".to_string());
        }
    }

    if let Some(table) = config.as_table() {
        validate_section("top level", table, errors);
    }
}

fn validate_section(name: &str, table: &toml::Table, errors: &mut Vec<String>) {
    for (key, value) in table {
        if value.is_table() {
            continue;
        }

        let positive = POSITIVE_KEYS.contains(&key.as_str());
        let non_negative = NON_NEGATIVE_KEYS.contains(&key.as_str());
        if positive || non_negative {
            match as_number(value) {
                Some(n) if positive && n <= 0.0 => {
                    errors.push(format!("[{}] {} must be > 0", name, key));
                }
                Some(n) if n < 0.0 => {
                    errors.push(format!("[{}] {} must be >= 0", name, key));
                }
                Some(_) => {}
                None => errors.push(format!("[{}] {} must be a number", name, key)),
            }
        }

        if key == "cache_size" {
            match value.as_integer() {
                Some(n) if (1..=MAX_CACHE_SIZE).contains(&n) => {}
                _ => errors.push(format!("[{}] cache_size must be 1-{}", name, MAX_CACHE_SIZE)),
            }
        }
    }
}

fn validate_joints(config: &toml::Value, errors: &mut Vec<String>) {
    let joints = match config.get("joints") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[joints] must be a table".to_string());
            return;
        }
        None => return,
    };

    for (name, joint) in joints {
        if !JOINTS.contains(&name.as_str()) {
            errors.push(format!("[joints.{}] unknown joint, expected lift/extend/rotate", name));
            continue;
        }

        let joint = match joint {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[joints.{}] must be a table", name));
                continue;
            }
        };

        let section = format!("joints.{}", name);
        validate_section(&section, joint, errors);

        let min = joint.get("min").and_then(as_number);
        let max = joint.get("max").and_then(as_number);
        if let (Some(min), Some(max)) = (min, max) {
            if min >= max {
                errors.push(format!("[joints.{}] min must be below max", name));
            }
        }
    }
}
