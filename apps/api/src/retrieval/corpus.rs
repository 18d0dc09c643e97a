//! Reference-profile corpus backed by a flat JSON file.
//!
//! The whole file is held in memory behind a `RwLock`. Writes go to a temp file in the
//! same directory and are persisted over the original, so readers of the file never
//! observe a partial write.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::models::{ReferenceProfile, StudentProfile};
use crate::profile::normalize::{coerce_list, normalize};

const MAJOR_MATCH_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusStatistics {
    pub total_profiles: usize,
    pub by_grade: BTreeMap<u8, usize>,
    pub by_major: BTreeMap<String, usize>,
    pub by_college: BTreeMap<String, usize>,
}

pub struct ProfileStore {
    path: PathBuf,
    records: RwLock<Vec<ReferenceProfile>>,
}

impl ProfileStore {
    /// Opens the corpus, seeding the file when it is missing or empty.
    /// A corrupt file is left untouched and the seed data is served from memory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let records = match fs::read_to_string(&path) {
            Ok(contents) if !contents.trim().is_empty() => match parse_records(&contents) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        "Profile corpus at {} is unreadable, serving seed data: {e:#}",
                        path.display()
                    );
                    seed_profiles()
                }
            },
            Ok(_) => seed_file(&path)?,
            Err(e) if e.kind() == ErrorKind::NotFound => seed_file(&path)?,
            Err(e) => {
                warn!(
                    "Profile corpus at {} could not be read, serving seed data: {e}",
                    path.display()
                );
                seed_profiles()
            }
        };

        info!("Profile corpus loaded: {} profiles", records.len());
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn get_all_references(&self) -> Vec<ReferenceProfile> {
        self.read().clone()
    }

    pub fn get_all_profiles(&self) -> Vec<StudentProfile> {
        self.read().iter().map(|r| r.profile.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Scores each profile by `|common interests| + 1.5 * |common majors|` against the
    /// keywords (case-insensitive). Profiles with no overlap are excluded.
    pub fn search_by_interests(&self, keywords: &[String], top_k: usize) -> Vec<StudentProfile> {
        let wanted: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let records = self.read();

        let mut matches: Vec<(f64, &StudentProfile)> = records
            .iter()
            .map(|r| &r.profile)
            .filter_map(|profile| {
                let interests = lowercase_set(&profile.interests);
                let majors = lowercase_set(&profile.target_majors);
                let common_interests = wanted.intersection(&interests).count();
                let common_majors = wanted.intersection(&majors).count();
                let score = common_interests as f64 + common_majors as f64 * MAJOR_MATCH_WEIGHT;
                (score > 0.0).then_some((score, profile))
            })
            .collect();

        matches.sort_by(|a, b| b.0.total_cmp(&a.0));
        matches
            .into_iter()
            .take(top_k)
            .map(|(_, profile)| profile.clone())
            .collect()
    }

    pub fn search_by_major(&self, major: &str, top_k: usize) -> Vec<StudentProfile> {
        self.search_by_field(major, top_k, |p| &p.target_majors)
    }

    pub fn search_by_college(&self, college: &str, top_k: usize) -> Vec<StudentProfile> {
        self.search_by_field(college, top_k, |p| &p.target_colleges)
    }

    /// Bidirectional case-insensitive substring match, corpus order.
    fn search_by_field(
        &self,
        query: &str,
        top_k: usize,
        field: impl Fn(&StudentProfile) -> &Vec<String>,
    ) -> Vec<StudentProfile> {
        let query = query.to_lowercase();
        self.read()
            .iter()
            .map(|r| &r.profile)
            .filter(|profile| {
                field(profile).iter().any(|value| {
                    let value = value.to_lowercase();
                    value.contains(&query) || query.contains(&value)
                })
            })
            .take(top_k)
            .cloned()
            .collect()
    }

    /// Appends a record and persists the whole corpus. Returns the new count.
    pub fn add_profile(&self, record: ReferenceProfile) -> Result<usize> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = records.clone();
        updated.push(record);
        write_atomic(&self.path, &updated)?;
        *records = updated;
        info!("Added profile to corpus ({} total)", records.len());
        Ok(records.len())
    }

    pub fn statistics(&self) -> CorpusStatistics {
        let records = self.read();
        let mut stats = CorpusStatistics {
            total_profiles: records.len(),
            ..Default::default()
        };
        for profile in records.iter().map(|r| &r.profile) {
            *stats.by_grade.entry(profile.current_grade.value()).or_default() += 1;
            for major in &profile.target_majors {
                *stats.by_major.entry(major.clone()).or_default() += 1;
            }
            for college in &profile.target_colleges {
                *stats.by_college.entry(college.clone()).or_default() += 1;
            }
        }
        stats
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ReferenceProfile>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a corpus record from loose JSON, funneling the profile through `normalize`.
pub fn reference_from_raw(raw: &Value) -> ReferenceProfile {
    ReferenceProfile {
        profile: normalize(raw),
        colleges_admitted: coerce_list(raw.get("colleges_admitted")),
        final_major: raw
            .get("final_major")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
    }
}

fn seed_file(path: &Path) -> Result<Vec<ReferenceProfile>> {
    let seed = seed_profiles();
    write_atomic(path, &seed)?;
    info!("Seeded profile corpus at {} ({} profiles)", path.display(), seed.len());
    Ok(seed)
}

fn parse_records(contents: &str) -> Result<Vec<ReferenceProfile>> {
    let raw: Vec<Value> =
        serde_json::from_str(contents).context("Profile corpus must be a JSON array")?;
    Ok(raw.iter().map(reference_from_raw).collect())
}

fn write_atomic(path: &Path, records: &[ReferenceProfile]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let json = serde_json::to_string_pretty(records).context("Failed to serialize profiles")?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(json.as_bytes())
        .context("Failed to write profile corpus")?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn lowercase_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|i| i.to_lowercase()).collect()
}

fn seed_profiles() -> Vec<ReferenceProfile> {
    [
        json!({
            "name": "Sample Student 1",
            "current_grade": 12,
            "interests": ["Computer Science", "Mathematics", "Robotics"],
            "academic_strengths": ["Math", "Science"],
            "courses_taken": ["AP Calculus", "AP Computer Science", "AP Physics"],
            "extracurriculars": ["Robotics Club", "Math Olympiad"],
            "target_colleges": ["MIT", "Stanford", "UC Berkeley"],
            "target_majors": ["Computer Science", "Engineering"]
        }),
        json!({
            "name": "Sample Student 2",
            "current_grade": 12,
            "interests": ["Biology", "Medicine", "Research"],
            "academic_strengths": ["Biology", "Chemistry"],
            "courses_taken": ["AP Biology", "AP Chemistry", "AP Statistics"],
            "extracurriculars": ["Science Research", "Hospital Volunteer"],
            "target_colleges": ["Johns Hopkins", "Harvard", "Yale"],
            "target_majors": ["Biology", "Pre-Med"]
        }),
    ]
    .iter()
    .map(reference_from_raw)
    .collect()
}
