//! JSON template loading
//!
//! A data root holds one directory per template kind:
//! - `Units/`: troop stats
//! - `Skills/`: which unit a skill summons and what it costs
//! - `Schools/`: skill lists and dominance
//! - `Summoners/`: one leader per side
//! - `Field/`: obstacle coordinates

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, TemplateError};
use crate::core::types::{GridPos, Side};
use crate::game::Game;
use crate::knowledge::{Production, School, SchoolsTable, Skill};
use crate::spatial::Field;
use crate::units::{SummonerDescriptor, UnitDescriptor};

/// Troop template as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub name: String,
    pub school: String,
    pub initiative: f64,
    pub max_amount: u32,
    pub damage: f64,
    pub entity_hp: f64,
    pub speed: i32,
    pub defence: f64,
    pub xp_for_destroy: f64,
    /// A number, or the string "NULL" for troops without morale
    #[serde(default, deserialize_with = "morality_or_null")]
    pub morality: Option<f64>,
}

impl From<UnitTemplate> for UnitDescriptor {
    fn from(t: UnitTemplate) -> Self {
        UnitDescriptor {
            name: t.name,
            school: t.school,
            initiative: t.initiative,
            max_amount: t.max_amount,
            damage: t.damage,
            entity_hp: t.entity_hp,
            speed: t.speed,
            defence: t.defence,
            xp_for_destroy: t.xp_for_destroy,
            morality: t.morality,
        }
    }
}

fn morality_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) if text == "NULL" => Ok(None),
        Some(Raw::Text(text)) => Err(D::Error::custom(format!("invalid morality {:?}", text))),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTemplate {
    /// Name of the unit template this skill summons
    pub entity: String,
    #[serde(rename = "type")]
    pub production: Production,
    pub name: String,
    pub min_knowledge: f64,
    pub required_energy: f64,
    #[serde(default)]
    pub knowledge_coefficient: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolTemplate {
    pub name: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub dominant_for: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderTemplate {
    pub team: Side,
    pub name: String,
    pub initiative: f64,
    pub damage: f64,
    pub max_hp: f64,
    pub accumulation_coefficient: f64,
    pub max_energy: f64,
    /// `[school, knowledge]` pairs
    #[serde(default)]
    pub schools_knowledge: Vec<(String, f64)>,
}

impl From<LeaderTemplate> for SummonerDescriptor {
    fn from(t: LeaderTemplate) -> Self {
        SummonerDescriptor {
            team: t.team,
            name: t.name,
            initiative: t.initiative,
            damage: t.damage,
            max_hp: t.max_hp,
            accumulation_coefficient: t.accumulation_coefficient,
            max_energy: t.max_energy,
            knowledge: t.schools_knowledge.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldTemplate {
    #[serde(default)]
    pub obstacles: Vec<(i32, i32)>,
}

/// Everything needed to set up a match
#[derive(Debug, Clone)]
pub struct Catalog {
    pub units: BTreeMap<String, UnitDescriptor>,
    pub schools: SchoolsTable,
    pub player: SummonerDescriptor,
    pub enemy: SummonerDescriptor,
    pub obstacles: Vec<GridPos>,
}

impl Catalog {
    pub fn unit(&self, name: &str) -> Option<&UnitDescriptor> {
        self.units.get(name)
    }

    pub fn leader(&self, side: Side) -> &SummonerDescriptor {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Land field of the given size with this catalog's obstacles
    pub fn build_field(&self, width: usize, height: usize) -> std::result::Result<Field, TemplateError> {
        let mut field = Field::new(width, height);
        for &pos in &self.obstacles {
            if !field.place_obstacle(pos) {
                return Err(TemplateError::ObstacleOutOfBounds { x: pos.x, y: pos.y });
            }
        }
        Ok(field)
    }
}

/// Parse one JSON document, naming the file on failure
pub fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> std::result::Result<T, TemplateError> {
    serde_json::from_str(content).map_err(|source| TemplateError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn read_file(path: &Path) -> std::result::Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Every `.json` file in a directory, in file-name order
pub fn load_json_dir<T: DeserializeOwned>(dir: &Path) -> std::result::Result<Vec<T>, TemplateError> {
    let io_error = |source: std::io::Error| TemplateError::Io {
        path: dir.display().to_string(),
        source,
    };
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| parse_json(&read_file(path)?, path))
        .collect()
}

/// Resolve skill and school templates into a schools table
pub fn build_schools(
    units: &BTreeMap<String, UnitDescriptor>,
    skills: Vec<SkillTemplate>,
    schools: Vec<SchoolTemplate>,
) -> std::result::Result<SchoolsTable, TemplateError> {
    let mut skill_map: BTreeMap<String, Skill> = BTreeMap::new();
    for t in skills {
        let descriptor = units.get(&t.entity).ok_or_else(|| TemplateError::UnknownUnit {
            skill: t.name.clone(),
            unit: t.entity.clone(),
        })?;
        let mut skill = Skill::new(
            t.name.clone(),
            descriptor.clone(),
            t.production,
            t.min_knowledge,
            t.required_energy,
        );
        skill.knowledge_coefficient = t.knowledge_coefficient;
        skill_map.insert(t.name, skill);
    }

    let mut table = SchoolsTable::new();
    for t in schools {
        let mut school = School::new(t.name.clone()).with_dominance(t.dominant_for);
        for name in &t.skills {
            let skill = skill_map.get(name).ok_or_else(|| TemplateError::UnknownSkill {
                school: t.name.clone(),
                skill: name.clone(),
            })?;
            school = school.with_skill(skill.clone());
        }
        table.add_school(school);
    }
    Ok(table)
}

/// Read the whole template tree under `root`
pub fn load_catalog(root: &Path) -> std::result::Result<Catalog, TemplateError> {
    let units: BTreeMap<String, UnitDescriptor> = load_json_dir::<UnitTemplate>(&root.join("Units"))?
        .into_iter()
        .map(|t| (t.name.clone(), UnitDescriptor::from(t)))
        .collect();
    let skills: Vec<SkillTemplate> = load_json_dir(&root.join("Skills"))?;
    let school_templates: Vec<SchoolTemplate> = load_json_dir(&root.join("Schools"))?;
    let schools = build_schools(&units, skills, school_templates)?;

    let mut player = None;
    let mut enemy = None;
    for leader in load_json_dir::<LeaderTemplate>(&root.join("Summoners"))? {
        let slot = match leader.team {
            Side::Player => &mut player,
            Side::Enemy => &mut enemy,
        };
        if slot.is_none() {
            *slot = Some(SummonerDescriptor::from(leader));
        } else {
            tracing::warn!("Ignoring extra {} leader template {}", leader.team, leader.name);
        }
    }
    let player = player.ok_or_else(|| TemplateError::Missing("player leader".into()))?;
    let enemy = enemy.ok_or_else(|| TemplateError::Missing("enemy leader".into()))?;

    let obstacles = load_json_dir::<FieldTemplate>(&root.join("Field"))?
        .into_iter()
        .flat_map(|f| f.obstacles)
        .map(|(x, y)| GridPos::new(x, y))
        .collect();

    tracing::info!(
        "Loaded {} units, {} schools, {} skills from {}",
        units.len(),
        schools.schools_amount(),
        schools.skills_amount(),
        root.display()
    );

    Ok(Catalog {
        units,
        schools,
        player,
        enemy,
        obstacles,
    })
}

impl Game {
    /// Field, schools and both leaders at their start cells
    pub fn from_catalog(catalog: &Catalog, config: SimulationConfig) -> Result<Game> {
        let field = catalog.build_field(config.field_width, config.field_height)?;
        let mut game = Game::new(field, catalog.schools.clone(), config);
        for side in [Side::Player, Side::Enemy] {
            let start = game.leader_start(side);
            game.deploy_leader(catalog.leader(side), start)?;
        }
        Ok(game)
    }
}
