use anyhow::Result;
use image::RgbImage;

/// Instructions sent alongside every food photo.
pub const FOOD_ANALYSIS_PROMPT: &str = "\
Analyze this food image and provide detailed information. Please:

1. Describe what food items you can see in the image
2. List the specific food items/ingredients visible
3. Provide details about the preparation style, colors, and presentation
4. Mention any garnishes, accompaniments, or side dishes
5. Describe the overall meal composition

Be specific about food names (e.g., if you see Indian bread, specify if it's chapati, naan, or roti).
Focus on identifying individual food components rather than just dish names.";

/// Trait for vision-language model backends (Gemini, test doubles, ...)
#[async_trait::async_trait]
pub trait AIService: Send + Sync {
    /// Free-form description of `image`, guided by `prompt`.
    async fn describe_food_image(&self, prompt: &str, image: &RgbImage) -> Result<String>;
}
