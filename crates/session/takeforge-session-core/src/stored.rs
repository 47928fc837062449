use serde::{Deserialize, Serialize};

use takeforge_curve::{Curve, Interpolation, Keyframe};
use takeforge_events::{AnimKey, EventTemplate};

use crate::animation::{Animation, AnimationLibrary};
use crate::error::SessionError;

/// Parse a stored library document into a validated [`AnimationLibrary`].
///
/// Notes:
/// - Keys may be `[time, value, slopeIn, slopeOut]`, `[time, value]` (flat
///   tangents) or objects with the same field names.
/// - Child event ranges are `[min, max]` pairs; omitted fields take the
///   authoring defaults.
/// - The library is validated before it is returned: templates must be well
///   formed and template references must not form a cycle.
pub fn parse_library_json(s: &str) -> Result<AnimationLibrary, SessionError> {
    let stored: StoredLibrary = serde_json::from_str(s)?;

    let mut lib = AnimationLibrary::new();
    for sa in stored.animations {
        let key = AnimKey::new(sa.group, sa.name);
        let mut curves = Vec::with_capacity(sa.curves.len());
        for sc in sa.curves {
            let keys = sc.keys.into_iter().map(Keyframe::from).collect();
            let curve = Curve::new(sc.name, keys)
                .map_err(|source| SessionError::Curve {
                    owner: key.clone(),
                    source,
                })?
                .with_interpolation(sc.interpolation)
                .owned_by_analysis(sc.owned_by_analysis);
            curves.push(curve);
        }
        let animation = Animation {
            key: key.clone(),
            curves,
            template: sa.template,
            frame_rate: sa.frame_rate,
        };
        if lib.insert(animation).is_some() {
            return Err(SessionError::DuplicateAnimation(key));
        }
    }
    lib.validate()?;
    Ok(lib)
}

/// Stored form of a library, keys written as 4-tuples.
pub fn export_library_json(lib: &AnimationLibrary) -> serde_json::Value {
    let stored = StoredLibrary {
        animations: lib
            .iter()
            .map(|a| StoredAnimation {
                group: a.key.group.clone(),
                name: a.key.name.clone(),
                frame_rate: a.frame_rate,
                curves: a
                    .curves
                    .iter()
                    .map(|c| StoredCurve {
                        name: c.name().to_string(),
                        owned_by_analysis: c.is_owned_by_analysis(),
                        interpolation: c.interpolation(),
                        keys: c
                            .keys()
                            .iter()
                            .map(|k| StoredKey::Full(k.time, k.value, k.slope_in, k.slope_out))
                            .collect(),
                    })
                    .collect(),
                template: a.template.clone(),
            })
            .collect(),
    };
    serde_json::to_value(&stored).unwrap_or(serde_json::Value::Null)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
struct StoredLibrary {
    #[serde(default)]
    animations: Vec<StoredAnimation>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAnimation {
    group: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frame_rate: Option<f64>,
    #[serde(default)]
    curves: Vec<StoredCurve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<EventTemplate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCurve {
    name: String,
    #[serde(default)]
    owned_by_analysis: bool,
    #[serde(default)]
    interpolation: Interpolation,
    #[serde(default)]
    keys: Vec<StoredKey>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredKey {
    Full(f64, f64, f64, f64),
    Flat(f64, f64),
    Object {
        time: f64,
        value: f64,
        #[serde(default, rename = "slopeIn")]
        slope_in: f64,
        #[serde(default, rename = "slopeOut")]
        slope_out: f64,
    },
}

impl From<StoredKey> for Keyframe {
    fn from(k: StoredKey) -> Self {
        match k {
            StoredKey::Full(t, v, si, so) => Keyframe::new(t, v, si, so),
            StoredKey::Flat(t, v) => Keyframe::flat(t, v),
            StoredKey::Object {
                time,
                value,
                slope_in,
                slope_out,
            } => Keyframe::new(time, value, slope_in, slope_out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeforge_events::TemplateSource;

    const DOC: &str = r#"{
        "animations": [
            {
                "group": "_HeadGestureLib",
                "name": "_Blink",
                "frameRate": 60,
                "curves": [
                    { "name": "_Blink", "keys": [[0, 0, 0, 0], [0.5, 1], { "time": 1, "value": 0 }] }
                ]
            },
            {
                "group": "_HeadGestureLib",
                "name": "Blinker",
                "template": {
                    "revision": 2,
                    "groups": [[{
                        "target": { "group": "_HeadGestureLib", "name": "_Blink" },
                        "eventId": "b",
                        "startTime": [0, 0.5],
                        "conditions": { "probability": 0.9 }
                    }]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_all_key_shapes() {
        let lib = parse_library_json(DOC).unwrap();
        assert_eq!(lib.len(), 2);
        let blink = lib.get(&AnimKey::new("_HeadGestureLib", "_Blink")).unwrap();
        assert_eq!(blink.frame_rate, Some(60.0));
        let keys = blink.curves[0].keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1], Keyframe::flat(0.5, 1.0));
        assert_eq!(blink.duration(), 1.0);
        assert!(lib.has_template(&AnimKey::new("_HeadGestureLib", "Blinker")));
    }

    #[test]
    fn rejects_bad_keys_and_duplicates() {
        let backwards = r#"{ "animations": [ { "group": "g", "name": "a",
            "curves": [ { "name": "c", "keys": [[1, 0], [0, 1]] } ] } ] }"#;
        assert!(matches!(
            parse_library_json(backwards),
            Err(SessionError::Curve { .. })
        ));

        let twice = r#"{ "animations": [ { "group": "g", "name": "a" }, { "group": "g", "name": "a" } ] }"#;
        assert!(matches!(
            parse_library_json(twice),
            Err(SessionError::DuplicateAnimation(k)) if k.name == "a"
        ));

        assert!(matches!(
            parse_library_json("{ not json"),
            Err(SessionError::Parse(_))
        ));
    }

    #[test]
    fn export_reparses_to_the_same_library() {
        let lib = parse_library_json(DOC).unwrap();
        let text = export_library_json(&lib).to_string();
        assert_eq!(parse_library_json(&text).unwrap(), lib);
    }
}
