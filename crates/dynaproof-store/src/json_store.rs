//! Profile store backed by a single JSON file.
//!
//! The file maps learner ids to profiles. Every operation re-reads the file
//! under the store's lock, so several processes pointed at the same data
//! directory see each other's writes. Writes go to a temporary file in the
//! same directory which is then renamed over the existing file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tempfile::NamedTempFile;

use dynaproof_core::error::AssessmentError;
use dynaproof_core::model::{LearnerId, LearnerProfile};
use dynaproof_core::traits::{new_learner_id, ProfileStore};

/// Raw entries, kept as JSON values so one unreadable profile does not
/// destroy the others on the next write.
type RawProfiles = BTreeMap<LearnerId, Value>;

/// File-backed [`ProfileStore`].
#[derive(Debug)]
pub struct JsonProfileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonProfileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids of every stored profile.
    pub fn ids(&self) -> Result<Vec<LearnerId>, AssessmentError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.into_keys().collect())
    }

    fn load(&self) -> Result<RawProfiles, AssessmentError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RawProfiles::new()),
            Err(e) => return Err(e.into()),
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "profile file is not valid UTF-8, starting empty: {e}"
                );
                return Ok(RawProfiles::new());
            }
        };
        let content = content.trim_start_matches('\u{feff}');
        if content.trim().is_empty() {
            return Ok(RawProfiles::new());
        }

        match serde_json::from_str::<RawProfiles>(content) {
            Ok(profiles) => Ok(profiles),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "profile file is not a JSON object, starting empty: {e}"
                );
                Ok(RawProfiles::new())
            }
        }
    }

    fn save(&self, profiles: &RawProfiles) -> Result<(), AssessmentError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(profiles)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn decode(id: &str, raw: Value) -> Result<LearnerProfile, AssessmentError> {
        let mut profile: LearnerProfile = serde_json::from_value(raw)
            .map_err(|e| AssessmentError::MalformedPersistedState(format!("{id}: {e}")))?;
        profile.migrate();
        Ok(profile)
    }

    fn lookup(profiles: &RawProfiles, id: &str) -> Result<LearnerProfile, AssessmentError> {
        let raw = profiles
            .get(id)
            .cloned()
            .ok_or_else(|| AssessmentError::ProfileNotFound(id.to_string()))?;
        Self::decode(id, raw)
    }
}

impl ProfileStore for JsonProfileStore {
    fn get(&self, id: &str) -> Result<LearnerProfile, AssessmentError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Self::lookup(&self.load()?, id)
    }

    fn put(&self, id: &str, profile: LearnerProfile) -> Result<(), AssessmentError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profiles = self.load()?;
        profiles.insert(id.to_string(), serde_json::to_value(&profile)?);
        self.save(&profiles)
    }

    fn create(
        &self,
        name: &str,
        surname: &str,
        class_label: &str,
    ) -> Result<(LearnerId, LearnerProfile), AssessmentError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profiles = self.load()?;

        let mut id = new_learner_id();
        while profiles.contains_key(&id) {
            id = new_learner_id();
        }
        let profile = LearnerProfile::new(name, surname, class_label);
        profiles.insert(id.clone(), serde_json::to_value(&profile)?);
        self.save(&profiles)?;

        tracing::debug!(learner = %id, path = %self.path.display(), "profile created");
        Ok((id, profile))
    }

    fn update(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut LearnerProfile) -> Result<(), AssessmentError>,
    ) -> Result<LearnerProfile, AssessmentError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profiles = self.load()?;
        let mut profile = Self::lookup(&profiles, id)?;

        apply(&mut profile)?;

        profiles.insert(id.to_string(), serde_json::to_value(&profile)?);
        self.save(&profiles)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use dynaproof_core::model::DifficultyTier;

    fn store() -> (tempfile::TempDir, JsonProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("learners.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.ids().unwrap().is_empty());
        assert!(matches!(
            store.get("abc"),
            Err(AssessmentError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn create_persists_across_instances() {
        let (dir, store) = store();
        let (id, profile) = store.create("Ada", "Kaya", "7-A").unwrap();

        let reopened = JsonProfileStore::new(dir.path().join("learners.json"));
        assert_eq!(reopened.get(&id).unwrap(), profile);
        assert_eq!(reopened.ids().unwrap(), vec![id]);
    }

    #[test]
    fn update_writes_back_only_on_success() {
        let (_dir, store) = store();
        let (id, _) = store.create("Ada", "Kaya", "7-A").unwrap();

        let err = store
            .update(&id, &mut |p| {
                p.questions_answered = 9;
                Err(AssessmentError::NoCurrentQuestion)
            })
            .unwrap_err();
        assert!(matches!(err, AssessmentError::NoCurrentQuestion));
        assert_eq!(store.get(&id).unwrap().questions_answered, 0);

        let updated = store
            .update(&id, &mut |p| {
                p.score_history.push(60);
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.score_history, vec![60]);
        assert_eq!(store.get(&id).unwrap().score_history, vec![60]);
    }

    #[test]
    fn bom_and_empty_content_are_tolerated() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "\u{feff}").unwrap();
        assert!(store.ids().unwrap().is_empty());

        std::fs::write(store.path(), "\u{feff}{\"x1\": {\"ad\": \"Ada\", \"soyad\": \"Kaya\"}}")
            .unwrap();
        assert_eq!(store.get("x1").unwrap().name, "Ada");
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.ids().unwrap().is_empty());

        let (id, _) = store.create("Ada", "Kaya", "7-A").unwrap();
        assert!(store.get(&id).is_ok());
    }

    #[test]
    fn non_utf8_file_starts_empty() {
        let (_dir, store) = store();
        std::fs::write(store.path(), [0xff, 0xfe, 0x00, 0x7b, 0xc3]).unwrap();
        assert!(store.ids().unwrap().is_empty());

        let (id, profile) = store.create("Ada", "Kaya", "7-A").unwrap();
        assert_eq!(store.get(&id).unwrap(), profile);
        assert_eq!(store.ids().unwrap(), vec![id]);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let (_dir, store) = store();
        let store = Arc::new(store);
        let (id, _) = store.create("Ada", "Kaya", "7-A").unwrap();

        std::thread::scope(|s| {
            for n in 0..8u32 {
                let store = Arc::clone(&store);
                let id = &id;
                s.spawn(move || {
                    store
                        .update(id, &mut |p| {
                            p.score_history.push(n * 10);
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        let mut history = store.get(&id).unwrap().score_history;
        history.sort_unstable();
        assert_eq!(history, (0..8).map(|n| n * 10).collect::<Vec<_>>());
    }

    #[test]
    fn malformed_entry_does_not_hide_others() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            r#"{"bad": {"name": 7}, "good": {"name": "Ada", "surname": "Kaya"}}"#,
        )
        .unwrap();

        assert!(matches!(
            store.get("bad"),
            Err(AssessmentError::MalformedPersistedState(_))
        ));
        store
            .update("good", &mut |p| {
                p.class_label = "7-B".into();
                Ok(())
            })
            .unwrap();

        // the unreadable entry survives the rewrite untouched
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["bad"]["name"], 7);
        assert_eq!(store.get("good").unwrap().class_label, "7-B");
    }

    #[test]
    fn legacy_profile_is_migrated_on_read() {
        let (_dir, store) = store();
        let legacy = r#"{
            "a1b2c3d4": {
                "ad": "Ada",
                "soyad": "Kaya",
                "sinif": "7-A",
                "gecmis_puanlar": [],
                "gecmis_sorular": [
                    {"soru_no": 1, "konu": "rasyonel", "zorluk": "temel", "soru": "q1", "puan": 80},
                    {"soru_no": 2, "konu": "rasyonel", "zorluk": "orta", "soru": "q2", "puan": 0}
                ],
                "soru_sayisi": 1,
                "kayit_zamani": "2024-03-01T10:15:30.123456"
            }
        }"#;
        std::fs::write(store.path(), legacy).unwrap();

        let profile = store.get("a1b2c3d4").unwrap();
        assert_eq!(profile.full_name(), "Ada Kaya");
        assert_eq!(profile.questions_answered, 1);
        assert_eq!(profile.questions_asked[0].score, Some(80));
        assert_eq!(profile.questions_asked[1].score, None);
        assert_eq!(profile.questions_asked[1].difficulty, DifficultyTier::Intermediate);
        assert_eq!(profile.score_history, vec![80]);
        assert!(profile.registered_at.is_some());
    }
}
