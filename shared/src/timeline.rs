use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

use crate::{Animation, Manifest, Planet, SceneActor, Stats, SCENE_COUNT};

pub const SLOT_SECONDS: u64 = 5;
pub const DEFAULT_FPS: u64 = 30;

const SIMPLIFIED_BACKDROP: &str = "/assets/sky.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Full,
    /// Static backdrop, used for constrained output targets.
    Simplified,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub fov: f32,
}

impl Camera {
    pub const DEFAULT: Camera = Camera::new([0.0, 0.0, 5.0], 75.0);

    pub const fn new(position: [f32; 3], fov: f32) -> Self {
        Self {
            position,
            look_at: [0.0, 0.0, 0.0],
            fov,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoBadge {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Background {
    Planet { planet: Planet, asset: String },
    Clock,
    LanguageIcons { languages: Vec<String> },
    Avatars { people: Vec<SceneActor> },
    ContributionGraph { total: u32 },
    RepoList { repos: Vec<RepoBadge> },
    MonthBars { months: [u32; 12], color: String },
    Galaxy,
    Starfield,
    StaticImage { asset: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub commits: u32,
    pub pulls: u32,
    pub reviews: u32,
    pub repos: u32,
    pub contributions: u32,
    pub stars_given: Option<u32>,
    pub stars_received: Option<u32>,
    pub followers: Option<u32>,
    pub following: Option<u32>,
    pub top_language: Option<String>,
    pub coding_streak_in_days: u32,
    pub first_contribution_date: Option<NaiveDate>,
}

impl From<&Stats> for StatsSnapshot {
    fn from(stats: &Stats) -> Self {
        Self {
            commits: stats.commits,
            pulls: stats.pulls,
            reviews: stats.reviews,
            repos: stats.repos,
            contributions: stats.contributions,
            stars_given: stats.stars.map(|stars| stars.given),
            stars_received: stats.stars.map(|stars| stars.received),
            followers: stats
                .top_follows
                .as_ref()
                .map(|follows| follows.followers.total_count),
            following: stats
                .top_follows
                .as_ref()
                .map(|follows| follows.following.total_count),
            top_language: stats
                .top_languages
                .as_ref()
                .and_then(|languages| languages.first())
                .map(|language| language.common_name.clone()),
            coding_streak_in_days: stats.coding_streak_in_days,
            first_contribution_date: stats.first_contribution_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Title,
    #[serde(rename_all = "camelCase")]
    DateRange { date_from: String, date_to: String },
    Activity(StatsSnapshot),
    Summary(StatsSnapshot),
    Counter { target: u64, value: u64, display: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub text: String,
    pub element: Option<Element>,
    /// `@username` chrome shown on every scene.
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescriptor {
    pub slot: usize,
    pub variant: String,
    /// First frame of the slot.
    pub from: u64,
    pub camera: Camera,
    pub background: Background,
    pub content: Content,
    /// Foreground opacity for the requested frame, `0.0..=1.0`.
    pub reveal: f32,
    /// Large numeric overlay, only set in simplified mode.
    pub overlay: Option<String>,
    pub audio: String,
}

/// Maps frame numbers onto the twelve scene slots of a manifest.
///
/// Rendering is a pure function of the manifest, the stats and the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    fps: u64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Timeline {
    pub fn new(fps: u64) -> Self {
        Self { fps: fps.max(1) }
    }

    pub fn fps(&self) -> u64 {
        self.fps
    }

    pub fn slot_duration(&self) -> u64 {
        SLOT_SECONDS * self.fps
    }

    pub fn duration_in_frames(&self) -> u64 {
        self.slot_duration() * SCENE_COUNT as u64
    }

    /// `floor(frame / D)`, holding the last scene for overflow frames.
    pub fn active_slot(&self, frame: u64) -> usize {
        let slot = frame / self.slot_duration();
        slot.min(SCENE_COUNT as u64 - 1) as usize
    }

    pub fn render(
        &self,
        manifest: &Manifest,
        stats: &Stats,
        frame: u64,
        mode: RenderMode,
    ) -> SceneDescriptor {
        let slot = self.active_slot(frame);
        let scene = manifest.scene(slot);
        let from = slot as u64 * self.slot_duration();
        let elapsed = frame.saturating_sub(from);
        let delay = self.reveal_delay(&scene.animation);

        let (camera, background, element) = match &scene.animation {
            Animation::Intro => (
                Camera::new([0.0, 0.0, 6.0], 45.0),
                Background::Planet {
                    planet: manifest.planet,
                    asset: manifest.planet.asset_path(),
                },
                Some(Element::Title),
            ),
            Animation::Flashback { date_from, date_to } => (
                Camera::DEFAULT,
                Background::Clock,
                Some(Element::DateRange {
                    date_from: date_from.clone(),
                    date_to: date_to.clone(),
                }),
            ),
            Animation::Languages { languages } => (
                Camera::new([0.0, 2.0, 8.0], 60.0),
                Background::LanguageIcons {
                    languages: languages.clone(),
                },
                None,
            ),
            Animation::People { people } => (
                Camera::new([0.0, 0.0, 10.0], 60.0),
                Background::Avatars {
                    people: people.clone(),
                },
                None,
            ),
            Animation::Contributions => (
                Camera::new([0.0, 4.0, 9.0], 55.0),
                Background::ContributionGraph {
                    total: stats.contributions,
                },
                Some(Element::Activity(stats.into())),
            ),
            Animation::Repos { repos } => (
                Camera::new([4.0, 2.0, 8.0], 60.0),
                Background::RepoList {
                    repos: repos
                        .iter()
                        .map(|repo| RepoBadge {
                            name: repo.name.clone(),
                            color: repo.color.clone(),
                        })
                        .collect(),
                },
                None,
            ),
            Animation::Months { color } => (
                Camera::new([0.0, 3.0, 10.0], 55.0),
                Background::MonthBars {
                    months: stats.monthly_contributions(),
                    color: color.clone(),
                },
                None,
            ),
            Animation::Number { number } => (
                Camera::DEFAULT,
                Background::Galaxy,
                Some(self.counter(*number, elapsed.saturating_sub(delay))),
            ),
            Animation::AllStats => (
                Camera::new([0.0, 0.0, 14.0], 60.0),
                Background::Starfield,
                Some(Element::Summary(stats.into())),
            ),
            Animation::Conclusion => (Camera::DEFAULT, Background::Starfield, None),
            Animation::Stars => (Camera::DEFAULT, Background::Starfield, None),
        };

        let (background, overlay) = match mode {
            RenderMode::Full => (background, None),
            RenderMode::Simplified => (
                Background::StaticImage {
                    asset: SIMPLIFIED_BACKDROP.to_string(),
                },
                match &scene.animation {
                    Animation::Number { number } => Some(format_number(*number)),
                    _ => None,
                },
            ),
        };

        SceneDescriptor {
            slot,
            variant: scene.animation.tag().to_string(),
            from,
            camera,
            background,
            content: Content {
                text: scene.text.clone(),
                element,
                handle: format!("@{}", stats.username),
            },
            reveal: self.reveal(elapsed, delay),
            overlay,
            audio: manifest.song.asset_path(),
        }
    }

    fn reveal_delay(&self, animation: &Animation) -> u64 {
        match animation {
            Animation::Intro => self.fps,
            _ => self.fps / 2,
        }
    }

    fn fade_duration(&self) -> u64 {
        (self.fps / 2).max(1)
    }

    fn reveal(&self, elapsed: u64, delay: u64) -> f32 {
        if elapsed < delay {
            return 0.0;
        }
        let progress = (elapsed - delay) as f32 / self.fade_duration() as f32;
        progress.min(1.0)
    }

    // Counts up to the target during the first second after reveal starts.
    fn counter(&self, target: u64, since_reveal: u64) -> Element {
        let value = if since_reveal >= self.fps {
            target
        } else {
            (target as f64 * since_reveal as f64 / self.fps as f64).round() as u64
        };
        Element::Counter {
            target,
            value,
            display: format_number(value),
        }
    }
}

fn format_number(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ContributionDay, Highlights, Scene, SceneRepo, Song, StatsBuilder, Week, YearRange,
    };

    fn manifest(animations: Vec<Animation>) -> Manifest {
        let mut animations = animations.into_iter();
        let scenes = std::array::from_fn(|i| {
            Scene::new(
                format!("scene {i}"),
                animations.next().unwrap_or(Animation::Conclusion),
            )
        });
        Manifest {
            song: Song::Extinguisher,
            planet: Planet::Neptune,
            scenes,
        }
    }

    fn stats() -> Stats {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        StatsBuilder::new(
            Highlights {
                username: "octocat".to_string(),
                commits: 10,
                contributions: 40,
                ..Default::default()
            },
            YearRange::new(2024),
        )
        .contributions_history(Some(vec![Week {
            first_day: date,
            contribution_days: vec![ContributionDay::new(date, 40)],
        }]))
        .build()
    }

    #[test]
    fn slot_boundaries() {
        let timeline = Timeline::new(30);
        assert_eq!(timeline.slot_duration(), 150);
        assert_eq!(timeline.active_slot(0), 0);
        assert_eq!(timeline.active_slot(149), 0);
        assert_eq!(timeline.active_slot(150), 1);
        assert_eq!(timeline.active_slot(1799), 11);
        assert_eq!(timeline.active_slot(3600), 11);
        assert_eq!(timeline.duration_in_frames(), 1800);
    }

    #[test]
    fn slot_is_floor_of_frame_over_duration() {
        for fps in [1, 24, 30, 60] {
            let timeline = Timeline::new(fps);
            let d = timeline.slot_duration();
            for frame in (0..d * 14).step_by(7) {
                let expected = (frame / d).min(11) as usize;
                assert_eq!(timeline.active_slot(frame), expected);
            }
        }
    }

    #[test]
    fn render_is_idempotent() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Number { number: 1234 }]);
        let stats = stats();
        for frame in [0, 20, 75, 149, 150, 900, 5000] {
            assert_eq!(
                timeline.render(&manifest, &stats, frame, RenderMode::Full),
                timeline.render(&manifest, &stats, frame, RenderMode::Full)
            );
        }
    }

    #[test]
    fn descriptor_starts_at_slot_offset() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![]);
        let descriptor = timeline.render(&manifest, &stats(), 3600, RenderMode::Full);
        assert_eq!(descriptor.slot, 11);
        assert_eq!(descriptor.from, 1650);
        assert_eq!(descriptor.content.text, "scene 11");
        assert_eq!(descriptor.audio, "/music/Extinguisher.mp3");
        assert_eq!(descriptor.content.handle, "@octocat");
    }

    #[test]
    fn intro_shows_the_manifest_planet() {
        let timeline = Timeline::new(30);
        let scene: crate::Scene = serde_json::from_value(serde_json::json!({
            "text": "Welcome back",
            "animation": { "type": "intro", "planet": "mars" }
        }))
        .unwrap();
        let manifest = manifest(vec![scene.animation]);

        let first = timeline.render(&manifest, &stats(), 0, RenderMode::Full);
        assert_eq!(
            first.background,
            Background::Planet {
                planet: Planet::Neptune,
                asset: "/planets/neptune.glb".to_string()
            }
        );
        assert_eq!(first.content.element, Some(Element::Title));
    }

    #[test]
    fn stars_is_the_default_arm() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Stars]);
        let descriptor = timeline.render(&manifest, &stats(), 10, RenderMode::Full);
        assert_eq!(descriptor.variant, "stars");
        assert_eq!(descriptor.background, Background::Starfield);
        assert_eq!(descriptor.camera, Camera::DEFAULT);
        assert_eq!(descriptor.content.element, None);
    }

    #[test]
    fn repos_are_reduced_to_name_and_color() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Repos {
            repos: vec![SceneRepo {
                name: "hello-world".to_string(),
                color: "#f97316".to_string(),
                stars: Some(5),
            }],
        }]);
        let descriptor = timeline.render(&manifest, &stats(), 0, RenderMode::Full);
        assert_eq!(
            descriptor.background,
            Background::RepoList {
                repos: vec![RepoBadge {
                    name: "hello-world".to_string(),
                    color: "#f97316".to_string()
                }]
            }
        );
    }

    #[test]
    fn months_use_the_history_series() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Months {
            color: "#22d3ee".to_string(),
        }]);
        let descriptor = timeline.render(&manifest, &stats(), 0, RenderMode::Full);
        let Background::MonthBars { months, color } = descriptor.background else {
            panic!("expected month bars");
        };
        assert_eq!(months[4], 40);
        assert_eq!(color, "#22d3ee");
    }

    #[test]
    fn reveal_ramps_after_delay() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Conclusion, Animation::Intro]);
        let stats = stats();
        let opacity = |frame| timeline.render(&manifest, &stats, frame, RenderMode::Full).reveal;

        assert_eq!(opacity(0), 0.0);
        assert_eq!(opacity(14), 0.0);
        assert!(opacity(20) > 0.0 && opacity(20) < 1.0);
        assert_eq!(opacity(30), 1.0);
        assert_eq!(opacity(149), 1.0);

        // intro waits a full second
        assert_eq!(opacity(150 + 29), 0.0);
        assert_eq!(opacity(150 + 45), 1.0);

        let mut last = 0.0;
        for frame in 0..150 {
            let current = opacity(frame);
            assert!(current >= last);
            last = current;
        }
    }

    #[test]
    fn number_counts_up() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Number { number: 2000 }]);
        let stats = stats();
        let counter = |frame| {
            match timeline
                .render(&manifest, &stats, frame, RenderMode::Full)
                .content
                .element
            {
                Some(Element::Counter { value, display, .. }) => (value, display),
                other => panic!("unexpected element {other:?}"),
            }
        };

        assert_eq!(counter(0).0, 0);
        assert_eq!(counter(30), (1000, "1,000".to_string()));
        assert_eq!(counter(100), (2000, "2,000".to_string()));
    }

    #[test]
    fn simplified_mode_only_overlays_numbers() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![
            Animation::Number { number: 365 },
            Animation::Languages {
                languages: vec!["rust".to_string()],
            },
        ]);
        let stats = stats();

        let number = timeline.render(&manifest, &stats, 0, RenderMode::Simplified);
        assert_eq!(
            number.background,
            Background::StaticImage {
                asset: "/assets/sky.jpg".to_string()
            }
        );
        assert_eq!(number.overlay.as_deref(), Some("365"));

        let languages = timeline.render(&manifest, &stats, 150, RenderMode::Simplified);
        assert_eq!(languages.overlay, None);
        assert_eq!(languages.slot, 1);

        let full = timeline.render(&manifest, &stats, 0, RenderMode::Full);
        assert_eq!(full.overlay, None);
    }

    #[test]
    fn snapshots_reflect_stats() {
        let timeline = Timeline::new(30);
        let manifest = manifest(vec![Animation::Contributions, Animation::AllStats]);
        let stats = stats();

        let contributions = timeline.render(&manifest, &stats, 0, RenderMode::Full);
        let Some(Element::Activity(snapshot)) = contributions.content.element else {
            panic!("expected activity snapshot");
        };
        assert_eq!(snapshot.commits, 10);
        assert_eq!(snapshot.coding_streak_in_days, 1);
        assert_eq!(snapshot.stars_received, None);

        let all = timeline.render(&manifest, &stats, 150, RenderMode::Full);
        assert!(matches!(all.content.element, Some(Element::Summary(_))));
    }
}
