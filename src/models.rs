use serde::{Deserialize, Serialize};

/// One record as stored by the hosted-records backend.
///
/// List responses key records by id and leave it out of the body, single-record
/// responses carry it as `id`. Both end up in `record_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Record<F> {
    #[serde(default, alias = "id")]
    pub record_id: String,
    pub createdat: String,
    #[serde(default)]
    pub updatedat: Option<String>,
    #[serde(default)]
    pub fields: F,
}

/// The field set of one collection.
pub trait RecordFields {
    const COLLECTION: Collection;

    /// The domain date of the record, if the collection has one.
    fn record_date(&self) -> Option<&str> {
        None
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value the backend sent that this build does not know about.
            Unrecognized(String),
        }

        impl $name {
            pub fn as_wire(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Unrecognized(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unrecognized(raw) => raw,
                    known => known.as_wire().to_string(),
                }
            }
        }
    };
}

wire_enum! {
    /// Ordered from lightest to hardest.
    pub enum Intensity {
        VeryLight => ("sehr_leicht", "Sehr leicht"),
        Light => ("leicht", "Leicht"),
        Medium => ("mittel", "Mittel"),
        High => ("hoch", "Hoch"),
        VeryHigh => ("sehr_hoch", "Sehr hoch"),
        Maximal => ("maximal", "Maximal"),
    }
}

wire_enum! {
    /// Ordered from worst to best.
    pub enum Mood {
        VeryBad => ("sehr_schlecht", "Sehr schlecht"),
        Bad => ("schlecht", "Schlecht"),
        Neutral => ("neutral", "Neutral"),
        Good => ("gut", "Gut"),
        VeryGood => ("sehr_gut", "Sehr gut"),
        Excellent => ("ausgezeichnet", "Ausgezeichnet"),
    }
}

wire_enum! {
    pub enum GoalCategory {
        WeightLoss => ("gewichtsabnahme", "Gewichtsabnahme"),
        MuscleGain => ("muskelaufbau", "Muskelaufbau"),
        Endurance => ("ausdauer", "Ausdauer"),
        Strength => ("kraft", "Kraft"),
        Flexibility => ("flexibilitaet", "Flexibilität"),
        GeneralFitness => ("allgemeine_fitness", "Allgemeine Fitness"),
        Other => ("sonstiges", "Sonstiges"),
    }
}

wire_enum! {
    pub enum GoalStatus {
        NotStarted => ("nicht_begonnen", "Nicht begonnen"),
        InProgress => ("in_arbeit", "In Arbeit"),
        Achieved => ("erreicht", "Erreicht"),
        Paused => ("pausiert", "Pausiert"),
        Abandoned => ("aufgegeben", "Aufgegeben"),
    }
}

wire_enum! {
    pub enum ExerciseCategory {
        Strength => ("krafttraining", "Krafttraining"),
        Endurance => ("ausdauertraining", "Ausdauertraining"),
        Flexibility => ("flexibilitaet", "Flexibilität"),
        Balance => ("balance", "Balance"),
        Hiit => ("hiit", "HIIT"),
        Cardio => ("cardio", "Cardio"),
        Yoga => ("yoga", "Yoga"),
        Pilates => ("pilates", "Pilates"),
        Other => ("sonstiges", "Sonstiges"),
    }
}

impl GoalStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress | Self::NotStarted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExerciseFields {
    #[serde(rename = "uebungsname", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "kategorie", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExerciseCategory>,
    #[serde(rename = "zielmuskeln", default, skip_serializing_if = "Option::is_none")]
    pub target_muscles: Option<String>,
    #[serde(rename = "beschreibung", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GoalFields {
    #[serde(rename = "zielbezeichnung", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "zielkategorie", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<GoalCategory>,
    #[serde(rename = "zielwert", default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<String>,
    #[serde(rename = "zieldatum", default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(rename = "aktueller_status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
    #[serde(rename = "notizen_ziel", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MeasurementFields {
    #[serde(rename = "messdatum", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "gewicht", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "koerperfettanteil", default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(rename = "muskelmasse", default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    #[serde(rename = "bauchumfang", default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(rename = "brustumfang", default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(rename = "hueftumfang", default, skip_serializing_if = "Option::is_none")]
    pub hip: Option<f64>,
    #[serde(rename = "oberarmumfang", default, skip_serializing_if = "Option::is_none")]
    pub upper_arm: Option<f64>,
    #[serde(rename = "oberschenkelumfang", default, skip_serializing_if = "Option::is_none")]
    pub thigh: Option<f64>,
    #[serde(rename = "notizen_messung", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionFields {
    #[serde(rename = "trainingsdauer", default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(rename = "intensitaet", default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(rename = "kalorien", default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(rename = "stimmung", default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(rename = "notizen_training", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "trainingsdatum", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "ausgefuehrte_uebungen", default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<String>,
}

impl RecordFields for ExerciseFields {
    const COLLECTION: Collection = Collection::Exercises;
}

impl RecordFields for GoalFields {
    const COLLECTION: Collection = Collection::Goals;
}

impl RecordFields for MeasurementFields {
    const COLLECTION: Collection = Collection::Measurements;

    fn record_date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl RecordFields for SessionFields {
    const COLLECTION: Collection = Collection::Sessions;

    fn record_date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

pub type Exercise = Record<ExerciseFields>;
pub type Goal = Record<GoalFields>;
pub type Measurement = Record<MeasurementFields>;
pub type Session = Record<SessionFields>;

/// The four record collections hosted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Exercises,
    Goals,
    Measurements,
    Sessions,
}

impl Collection {
    pub fn app_id(self) -> &'static str {
        match self {
            Self::Exercises => "6981cc8a4b3fbde2c92a2299",
            Self::Goals => "6981cc8f4250fc57a9a63a6e",
            Self::Measurements => "6981cc90bd34b0752d169796",
            Self::Sessions => "6981cc906bdf8cfb3e2d5422",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Exercises => "exercises",
            Self::Goals => "goals",
            Self::Measurements => "measurements",
            Self::Sessions => "sessions",
        }
    }
}

/// The three collections the dashboard is computed from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub sessions: Vec<Session>,
    pub measurements: Vec<Measurement>,
    pub goals: Vec<Goal>,
}

/// Input of the "log a session" form, as typed by the user.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionForm {
    pub date: String,
    #[serde(default)]
    pub duration_minutes: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub calories: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyProgress {
    pub count: usize,
    pub goal: u32,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightPoint {
    pub date: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub generated_at: String,
    pub weekly_progress: WeeklyProgress,
    pub latest_weight: Option<f64>,
    pub streak: u32,
    pub calories_this_week: f64,
    pub weight_series: Vec<WeightPoint>,
    pub recent_sessions: Vec<Session>,
    pub active_goals: Vec<Goal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entry_without_id_deserializes() {
        let json = r#"{"createdat":"2024-06-10T08:00:00","updatedat":null,"fields":{"trainingsdatum":"2024-06-10T07:30","kalorien":420,"intensitaet":"hoch"}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.record_id, "");
        assert_eq!(session.fields.calories, Some(420.0));
        assert_eq!(session.fields.intensity, Some(Intensity::High));
        assert_eq!(session.fields.record_date(), Some("2024-06-10T07:30"));
    }

    #[test]
    fn single_record_id_lands_in_record_id() {
        let json = r#"{"id":"abc","createdat":"2024-06-10T08:00:00","fields":{}}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.record_id, "abc");
        assert_eq!(goal.updatedat, None);
    }

    #[test]
    fn unknown_enum_value_is_kept_verbatim() {
        let json = r#"{"aktueller_status":"archiviert","zielkategorie":"kraft"}"#;
        let fields: GoalFields = serde_json::from_str(json).unwrap();
        assert_eq!(
            fields.status,
            Some(GoalStatus::Unrecognized("archiviert".to_string()))
        );
        assert_eq!(fields.category, Some(GoalCategory::Strength));

        let back = serde_json::to_value(&fields).unwrap();
        assert_eq!(back["aktueller_status"], "archiviert");
        assert_eq!(back["zielkategorie"], "kraft");
    }

    #[test]
    fn only_open_statuses_are_active() {
        assert!(GoalStatus::NotStarted.is_active());
        assert!(GoalStatus::InProgress.is_active());
        assert!(!GoalStatus::Achieved.is_active());
        assert!(!GoalStatus::Paused.is_active());
        assert!(!GoalStatus::Abandoned.is_active());
        assert!(!GoalStatus::Unrecognized("x".into()).is_active());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let fields = SessionFields {
            calories: Some(300.0),
            ..SessionFields::default()
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value, serde_json::json!({ "kalorien": 300.0 }));
    }
}
