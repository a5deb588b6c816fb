use rand::{seq::IteratorRandom, Rng};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::json;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::ManifestError;

pub const SCENE_COUNT: usize = 12;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, AsRefStr,
)]
pub enum Song {
    Armageddon,
    Extinguisher,
    RewindThat,
    WontBackDown,
}

impl Song {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::iter().choose(rng).unwrap_or(Self::Armageddon)
    }

    pub fn asset_path(&self) -> String {
        format!("/music/{}.mp3", self.as_ref())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Planet {
    Mars,
    Jupiter,
    Saturn,
    Mercury,
    Neptune,
    Uranus,
    Venus,
    Moon,
}

impl Planet {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::iter().choose(rng).unwrap_or(Self::Moon)
    }

    pub fn asset_path(&self) -> String {
        format!("/planets/{}.glb", self.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneActor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRepo {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub stars: Option<u32>,
}

/// What a scene shows besides its caption.
///
/// Tags the renderer does not know, and scenes without an animation, end up
/// as [`Animation::Stars`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Animation {
    Intro,
    #[serde(rename_all = "camelCase")]
    Flashback { date_from: String, date_to: String },
    Languages { languages: Vec<String> },
    People { people: Vec<SceneActor> },
    Contributions,
    Repos { repos: Vec<SceneRepo> },
    Months { color: String },
    Number { number: u64 },
    AllStats,
    Conclusion,
    #[default]
    #[serde(other)]
    Stars,
}

impl Animation {
    pub const TAGS: [&'static str; 11] = [
        "intro",
        "flashback",
        "languages",
        "people",
        "contributions",
        "repos",
        "months",
        "number",
        "allStats",
        "conclusion",
        "stars",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Flashback { .. } => "flashback",
            Self::Languages { .. } => "languages",
            Self::People { .. } => "people",
            Self::Contributions => "contributions",
            Self::Repos { .. } => "repos",
            Self::Months { .. } => "months",
            Self::Number { .. } => "number",
            Self::AllStats => "allStats",
            Self::Conclusion => "conclusion",
            Self::Stars => "stars",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub text: String,
    #[serde(default, deserialize_with = "animation")]
    pub animation: Animation,
}

impl Scene {
    pub fn new(text: impl Into<String>, animation: Animation) -> Self {
        Self {
            text: text.into(),
            animation,
        }
    }
}

/// Raw output of the generative step, before post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedManifest {
    pub scenes: Vec<Scene>,
    #[serde(default, deserialize_with = "lenient")]
    pub song: Option<Song>,
    #[serde(default, deserialize_with = "lenient")]
    pub planet: Option<Planet>,
}

impl GeneratedManifest {
    pub fn from_json(arguments: &str) -> Result<Self, ManifestError> {
        let generated: Self = serde_json::from_str(arguments)
            .map_err(|e| ManifestError::Malformed(e.to_string()))?;
        generated.validate()?;
        Ok(generated)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.scenes.len() != SCENE_COUNT {
            return Err(ManifestError::SceneCount {
                expected: SCENE_COUNT,
                actual: self.scenes.len(),
            });
        }
        Ok(())
    }

    /// Fills in a song and a planet where the model left them out.
    pub fn into_manifest<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Manifest, ManifestError> {
        let actual = self.scenes.len();
        let scenes: [Scene; SCENE_COUNT] =
            self.scenes
                .try_into()
                .map_err(|_| ManifestError::SceneCount {
                    expected: SCENE_COUNT,
                    actual,
                })?;

        Ok(Manifest {
            song: self.song.unwrap_or_else(|| Song::random(rng)),
            planet: self.planet.unwrap_or_else(|| Planet::random(rng)),
            scenes,
        })
    }
}

/// The compiled story. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub song: Song,
    pub planet: Planet,
    pub scenes: [Scene; SCENE_COUNT],
}

impl Manifest {
    pub fn scene(&self, slot: usize) -> &Scene {
        &self.scenes[slot.min(SCENE_COUNT - 1)]
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

/// Unknown or missing tags become [`Animation::Stars`]; a known tag whose
/// payload does not fit is an error.
fn animation<'de, D>(deserializer: D) -> Result<Animation, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(Animation::default());
    };
    let known = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|tag| Animation::TAGS.contains(&tag));
    if !known {
        return Ok(Animation::default());
    }
    serde_json::from_value(value).map_err(serde::de::Error::custom)
}

/// JSON schema of the `renderVideo` function the model is forced to call.
pub fn manifest_schema() -> serde_json::Value {
    let tagged = |tag: &str, properties: serde_json::Value, required: &[&str]| {
        let mut all_required = vec!["type"];
        all_required.extend_from_slice(required);
        let mut props = serde_json::Map::new();
        props.insert("type".to_string(), json!({ "type": "string", "enum": [tag] }));
        if let serde_json::Value::Object(extra) = properties {
            props.extend(extra);
        }
        json!({
            "type": "object",
            "properties": props,
            "required": all_required,
            "additionalProperties": false,
        })
    };
    let color = json!({ "type": "string", "description": "Hex color, e.g. #38bdf8" });

    let animation = json!({
        "anyOf": [
            tagged("intro", json!({}), &[]),
            tagged(
                "flashback",
                json!({
                    "dateFrom": { "type": "string", "description": "ISO date" },
                    "dateTo": { "type": "string", "description": "ISO date" },
                }),
                &["dateFrom", "dateTo"],
            ),
            tagged(
                "languages",
                json!({ "languages": { "type": "array", "items": { "type": "string" } } }),
                &["languages"],
            ),
            tagged(
                "people",
                json!({
                    "people": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "login": { "type": "string" },
                                "avatarUrl": { "type": "string" },
                            },
                            "required": ["login"],
                        },
                    },
                }),
                &["people"],
            ),
            tagged("contributions", json!({}), &[]),
            tagged(
                "repos",
                json!({
                    "repos": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "color": color,
                                "stars": { "type": "integer" },
                            },
                            "required": ["name", "color"],
                        },
                    },
                }),
                &["repos"],
            ),
            tagged("months", json!({ "color": color }), &["color"]),
            tagged(
                "number",
                json!({ "number": { "type": "integer", "minimum": 0 } }),
                &["number"],
            ),
            tagged("allStats", json!({}), &[]),
            tagged("conclusion", json!({}), &[]),
        ],
    });

    json!({
        "type": "object",
        "properties": {
            "scenes": {
                "type": "array",
                "minItems": SCENE_COUNT,
                "maxItems": SCENE_COUNT,
                "items": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Caption shown on screen" },
                        "animation": animation,
                    },
                    "required": ["text", "animation"],
                },
            },
        },
        "required": ["scenes"],
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    fn scenes_json(count: usize) -> String {
        let scenes: Vec<_> = (0..count)
            .map(|i| json!({ "text": format!("scene {i}"), "animation": { "type": "conclusion" } }))
            .collect();
        json!({ "scenes": scenes }).to_string()
    }

    #[test]
    fn every_tag_is_parsed() {
        let cases = [
            (json!({ "type": "intro" }), "intro"),
            (
                json!({ "type": "flashback", "dateFrom": "2024-01-01", "dateTo": "2024-03-01" }),
                "flashback",
            ),
            (json!({ "type": "languages", "languages": ["rust"] }), "languages"),
            (json!({ "type": "people", "people": [{ "login": "a" }] }), "people"),
            (json!({ "type": "contributions" }), "contributions"),
            (
                json!({ "type": "repos", "repos": [{ "name": "a", "color": "#fff" }] }),
                "repos",
            ),
            (json!({ "type": "months", "color": "#fff" }), "months"),
            (json!({ "type": "number", "number": 42 }), "number"),
            (json!({ "type": "allStats" }), "allStats"),
            (json!({ "type": "conclusion" }), "conclusion"),
        ];

        for (animation, tag) in cases {
            let scene: Scene =
                serde_json::from_value(json!({ "text": "t", "animation": animation })).unwrap();
            assert_eq!(scene.animation.tag(), tag);
        }
    }

    #[test]
    fn unknown_or_missing_animation_falls_back_to_stars() {
        let unknown: Scene =
            serde_json::from_value(json!({ "text": "t", "animation": { "type": "confetti" } }))
                .unwrap();
        assert_eq!(unknown.animation, Animation::Stars);

        let missing: Scene = serde_json::from_value(json!({ "text": "t" })).unwrap();
        assert_eq!(missing.animation, Animation::Stars);

        let untagged: Scene =
            serde_json::from_value(json!({ "text": "t", "animation": { "number": 3 } })).unwrap();
        assert_eq!(untagged.animation, Animation::Stars);
    }

    #[test]
    fn known_tag_with_bad_payload_is_malformed() {
        for broken in [
            json!({ "type": "number", "number": "lots" }),
            json!({ "type": "repos" }),
            json!({ "type": "months", "color": 3 }),
        ] {
            let mut value: serde_json::Value = serde_json::from_str(&scenes_json(12)).unwrap();
            value["scenes"][3]["animation"] = broken;
            assert!(matches!(
                GeneratedManifest::from_json(&value.to_string()),
                Err(ManifestError::Malformed(_))
            ));
        }
    }

    #[test]
    fn tags_match_variants() {
        let variants = [
            Animation::Intro,
            Animation::Flashback {
                date_from: String::new(),
                date_to: String::new(),
            },
            Animation::Languages { languages: vec![] },
            Animation::People { people: vec![] },
            Animation::Contributions,
            Animation::Repos { repos: vec![] },
            Animation::Months {
                color: String::new(),
            },
            Animation::Number { number: 0 },
            Animation::AllStats,
            Animation::Conclusion,
            Animation::Stars,
        ];
        let tags: Vec<_> = variants.iter().map(Animation::tag).collect();
        assert_eq!(tags, Animation::TAGS);
    }

    #[test]
    fn scene_count_is_enforced() {
        assert!(GeneratedManifest::from_json(&scenes_json(12)).is_ok());
        assert_eq!(
            GeneratedManifest::from_json(&scenes_json(11)).unwrap_err(),
            ManifestError::SceneCount {
                expected: 12,
                actual: 11
            }
        );
        assert!(matches!(
            GeneratedManifest::from_json("{\"scenes\": 3}"),
            Err(ManifestError::Malformed(_))
        ));
    }

    #[test]
    fn missing_song_and_planet_are_assigned() {
        let generated = GeneratedManifest::from_json(&scenes_json(12)).unwrap();
        assert!(generated.song.is_none());

        let mut rng = StepRng::new(0, 0x9e37_79b9_7f4a_7c15);
        for _ in 0..16 {
            let manifest = generated.clone().into_manifest(&mut rng).unwrap();
            assert!(Song::iter().any(|song| song == manifest.song));
            assert!(Planet::iter().any(|planet| planet == manifest.planet));
        }
    }

    #[test]
    fn model_supplied_song_is_kept_and_invalid_one_replaced() {
        let mut value: serde_json::Value = serde_json::from_str(&scenes_json(12)).unwrap();
        value["song"] = json!("RewindThat");
        value["planet"] = json!("pluto");
        let generated = GeneratedManifest::from_json(&value.to_string()).unwrap();
        assert_eq!(generated.song, Some(Song::RewindThat));
        assert_eq!(generated.planet, None);

        let manifest = generated.into_manifest(&mut StepRng::new(3, 7)).unwrap();
        assert_eq!(manifest.song, Song::RewindThat);
    }

    #[test]
    fn manifest_round_trips_through_storage() {
        let generated = GeneratedManifest::from_json(&scenes_json(12)).unwrap();
        let manifest = generated.into_manifest(&mut StepRng::new(0, 1)).unwrap();
        let stored = serde_json::to_value(&manifest).unwrap();
        assert_eq!(stored["scenes"].as_array().unwrap().len(), SCENE_COUNT);
        let loaded: Manifest = serde_json::from_value(stored).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn asset_paths() {
        assert_eq!(Song::WontBackDown.asset_path(), "/music/WontBackDown.mp3");
        assert_eq!(Planet::Saturn.asset_path(), "/planets/saturn.glb");
        assert_eq!(Song::iter().count(), 4);
        assert_eq!(Planet::iter().count(), 8);
    }

    #[test]
    fn schema_pins_scene_count() {
        let schema = manifest_schema();
        assert_eq!(schema["properties"]["scenes"]["minItems"], 12);
        assert_eq!(schema["properties"]["scenes"]["maxItems"], 12);
        let variants = schema["properties"]["scenes"]["items"]["properties"]["animation"]["anyOf"]
            .as_array()
            .unwrap();
        assert_eq!(variants.len(), 10);
    }
}
