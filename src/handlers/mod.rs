pub mod food_analyzer;
pub mod image_intake;

pub use food_analyzer::FoodAnalyzer;
pub use image_intake::ImageUpload;
