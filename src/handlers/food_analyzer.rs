use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AnalyzeError;
use crate::handlers::image_intake::{self, ImageUpload};
use crate::models::AnalysisResult;
use crate::services::{AIService, NutritionDatabase, FOOD_ANALYSIS_PROMPT};

const BASE_CONFIDENCE: usize = 75;
const CONFIDENCE_PER_FOOD: usize = 3;
const MAX_CONFIDENCE: usize = 95;

/// Heuristic score from the number of recognised foods, e.g. "84.0".
pub fn confidence_score(food_count: usize) -> String {
    let score = (BASE_CONFIDENCE + CONFIDENCE_PER_FOOD * food_count).min(MAX_CONFIDENCE);
    format!("{:.1}", score as f64)
}

pub struct FoodAnalyzer {
    ai: Arc<dyn AIService>,
    nutrition: Arc<NutritionDatabase>,
}

impl FoodAnalyzer {
    pub fn new(ai: Arc<dyn AIService>, nutrition: Arc<NutritionDatabase>) -> Self {
        Self { ai, nutrition }
    }

    pub async fn analyze(&self, upload: ImageUpload) -> Result<AnalysisResult, AnalyzeError> {
        let started = Instant::now();

        image_intake::validate_file_name(&upload.file_name)?;

        log::info!(
            "📸 Analyzing upload '{}' ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        let bytes = upload.bytes;
        let image = tokio::task::spawn_blocking(move || image_intake::decode_image(&bytes))
            .await
            .map_err(|e| AnalyzeError::Internal(e.into()))??;

        let description = self
            .ai
            .describe_food_image(FOOD_ANALYSIS_PROMPT, &image)
            .await
            .map_err(AnalyzeError::Model)?;

        let result = self.summarize(description, started.elapsed());
        log::info!(
            "✅ Successfully analyzed image. Found {} food items.",
            result.foods.len()
        );
        Ok(result)
    }

    /// Turns a model description into the response payload.
    pub fn summarize(&self, description: String, elapsed: Duration) -> AnalysisResult {
        let foods = self.nutrition.extract_foods(&description);
        let nutrition = self.nutrition.lookup(&foods);
        let health_tip = self.nutrition.select_health_tip(&foods);
        let confidence = confidence_score(foods.len());

        AnalysisResult {
            success: true,
            description,
            foods,
            nutrition,
            health_tip,
            confidence,
            analysis_time: format!("{:.1}", elapsed.as_secs_f64()),
        }
    }
}
