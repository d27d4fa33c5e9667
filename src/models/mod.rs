use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Per-serving nutrition facts for a single food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NutritionRecord {
    pub calories: u32,
    pub protein: &'static str,
    pub carbs: &'static str,
    pub fat: &'static str,
}

/// Nutrition facts keyed by food name, serialized as a JSON object that keeps
/// the order the foods were extracted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionFacts(Vec<(&'static str, NutritionRecord)>);

impl NutritionFacts {
    pub fn push(&mut self, food: &'static str, record: NutritionRecord) {
        self.0.push((food, record));
    }
}

#[cfg(test)]
impl NutritionFacts {
    pub fn get(&self, food: &str) -> Option<&NutritionRecord> {
        self.0
            .iter()
            .find(|(name, _)| *name == food)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn foods(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }
}

impl Serialize for NutritionFacts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (food, record) in &self.0 {
            map.serialize_entry(food, record)?;
        }
        map.end()
    }
}

/// Successful `/analyze` payload.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub description: String,
    pub foods: Vec<&'static str>,
    pub nutrition: NutritionFacts,
    pub health_tip: &'static str,
    pub confidence: String,
    pub analysis_time: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub gemini_configured: bool,
    pub supported_formats: &'static [&'static str],
    pub nutrition_database_size: usize,
}
