pub mod ai_service;
pub mod gemini; // Google Gemini vision model
pub mod nutrition;

pub use ai_service::{AIService, FOOD_ANALYSIS_PROMPT};
pub use gemini::GeminiService;
pub use nutrition::NutritionDatabase;
