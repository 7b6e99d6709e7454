use std::collections::HashSet;
use std::fs;
use std::path::Path;

use arq_core::{EngineConfig, GeoPoint};
use serde::{Deserialize, Serialize};

use crate::deeplink::ar_link;
use crate::error::{CatalogError, Result};
use crate::paths::{CONFIG_FILE_NAME, resolve_base_dir};

/// Task location as written in the catalog file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn to_geo(self) -> arq_core::Result<GeoPoint> {
        GeoPoint::new(self.lat, self.lng)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestTask {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl QuestTask {
    /// Explicit AR target, if the task is tied to a place.
    pub fn target(&self) -> Option<GeoPoint> {
        self.coordinates.and_then(|c| c.to_geo().ok())
    }

    /// Deep link into the AR view; `None` for tasks without a place.
    pub fn ar_link(&self) -> Option<String> {
        self.target().map(|p| ar_link(&p))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<QuestTask>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    engine: EngineConfig,
    quests: Vec<Quest>,
}

/// Engine configuration plus the quests offered to the player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Catalog {
    pub engine: EngineConfig,
    pub quests: Vec<Quest>,
}

impl Catalog {
    /// Default engine settings and the built-in Astana quests.
    pub fn builtin() -> Self {
        Self {
            engine: EngineConfig::default(),
            quests: builtin_quests(),
        }
    }

    /// Parse a catalog from TOML. A file without quests keeps the
    /// built-in ones, so a config-only file just tunes the engine.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        file.engine.validate()?;
        let quests = if file.quests.is_empty() {
            builtin_quests()
        } else {
            file.quests
        };
        let catalog = Self {
            engine: file.engine,
            quests,
        };
        catalog.check()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            quests = catalog.quests.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Resolve the catalog: an explicit path must exist; otherwise
    /// `<data dir>/arquest.toml` is used when present, else the builtin.
    pub fn open(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = resolve_base_dir().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            tracing::debug!(path = %candidate.display(), "no catalog file, using builtin");
            Ok(Self::builtin())
        }
    }

    pub fn find_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    /// Look up a task by quest and task id. Task ids repeat across quests.
    pub fn find_task(&self, quest_id: &str, task_id: &str) -> Option<&QuestTask> {
        self.find_quest(quest_id)?
            .tasks
            .iter()
            .find(|t| t.id == task_id)
    }

    /// Render the engine section back to TOML.
    pub fn engine_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        #[derive(Serialize)]
        struct EngineSection<'a> {
            engine: &'a EngineConfig,
        }
        toml::to_string(&EngineSection {
            engine: &self.engine,
        })
    }

    fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for quest in &self.quests {
            if !seen.insert(quest.id.as_str()) {
                return Err(CatalogError::InvalidData(format!(
                    "duplicate quest id '{}'",
                    quest.id
                )));
            }
            let mut task_ids = HashSet::new();
            for task in &quest.tasks {
                if !task_ids.insert(task.id.as_str()) {
                    return Err(CatalogError::InvalidData(format!(
                        "duplicate task id '{}' in quest '{}'",
                        task.id, quest.id
                    )));
                }
                if let Some(c) = task.coordinates {
                    c.to_geo().map_err(|e| {
                        CatalogError::InvalidData(format!(
                            "task '{}/{}': {e}",
                            quest.id, task.id
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn task(id: &str, text: &str, coordinates: Option<(f64, f64)>) -> QuestTask {
    QuestTask {
        id: id.to_string(),
        text: text.to_string(),
        coordinates: coordinates.map(|(lat, lng)| Coordinates { lat, lng }),
    }
}

fn builtin_quests() -> Vec<Quest> {
    vec![
        Quest {
            id: "q1".to_string(),
            title: "The Capital's Heart".to_string(),
            description: "Explore the area around Baiterek Tower and discover the symbols of modern Astana.".to_string(),
            tasks: vec![
                task("t1", "Take an elevator to the top of Baiterek Tower.", Some((51.1283, 71.4305))),
                task("t2", "Find the \"Akorda\" Presidential Palace and take a picture.", Some((51.1257, 71.4462))),
                task("t3", "Walk across the Water-Green Boulevard.", None),
            ],
        },
        Quest {
            id: "q2".to_string(),
            title: "Future Forward".to_string(),
            description: "Visit the futuristic Khan Shatyr and experience entertainment under the giant tent.".to_string(),
            tasks: vec![
                task("t1", "Buy a souvenir from one of the shops.", None),
                task("t2", "Go for a ride on the monorail inside.", None),
                task("t3", "Visit the indoor beach club on the top floor.", Some((51.1323, 71.4036))),
            ],
        },
        Quest {
            id: "q3".to_string(),
            title: "Pyramid of Peace".to_string(),
            description: "Discover the unique architecture and purpose of the Palace of Peace and Reconciliation.".to_string(),
            tasks: vec![
                task("t1", "Take a guided tour of the pyramid.", Some((51.1230, 71.4634))),
                task("t2", "Admire the view of the city from the upper levels.", None),
                task("t3", "Attend a concert in the opera hall if available.", None),
            ],
        },
    ]
}
