use std::collections::HashSet;

use crate::models::{NutritionFacts, NutritionRecord};

/// Most foods reported for a single image.
pub const MAX_FOODS: usize = 6;

const fn record(
    calories: u32,
    protein: &'static str,
    carbs: &'static str,
    fat: &'static str,
) -> NutritionRecord {
    NutritionRecord {
        calories,
        protein,
        carbs,
        fat,
    }
}

// Order matters: extraction walks the table top to bottom.
const NUTRITION_TABLE: &[(&str, NutritionRecord)] = &[
    ("rice", record(130, "2.7g", "28g", "0.3g")),
    ("dal", record(170, "9g", "22g", "0.5g")),
    ("lentils", record(170, "9g", "22g", "0.5g")),
    ("chapati", record(100, "3g", "18g", "1g")),
    ("roti", record(100, "3g", "18g", "1g")),
    ("naan", record(150, "4g", "25g", "3g")),
    ("bread", record(120, "4g", "22g", "2g")),
    ("pasta", record(200, "7g", "42g", "1g")),
    ("noodles", record(180, "6g", "35g", "2g")),
    ("chicken", record(165, "31g", "0g", "3.6g")),
    ("mutton", record(250, "26g", "0g", "17g")),
    ("fish", record(140, "28g", "0g", "3g")),
    ("egg", record(70, "6g", "1g", "5g")),
    ("paneer", record(265, "18g", "3g", "20g")),
    ("tofu", record(76, "8g", "2g", "4.8g")),
    ("potato", record(77, "2g", "17g", "0.1g")),
    ("tomato", record(18, "1g", "4g", "0.2g")),
    ("onion", record(40, "1g", "9g", "0.1g")),
    ("carrot", record(25, "1g", "6g", "0.1g")),
    ("spinach", record(23, "3g", "4g", "0.4g")),
    ("broccoli", record(25, "3g", "5g", "0.3g")),
    ("cauliflower", record(25, "2g", "5g", "0.3g")),
    ("bell pepper", record(20, "1g", "5g", "0.2g")),
    ("cabbage", record(25, "1g", "6g", "0.1g")),
    ("cucumber", record(16, "1g", "4g", "0.1g")),
    ("apple", record(52, "0g", "14g", "0.2g")),
    ("banana", record(89, "1g", "23g", "0.3g")),
    ("orange", record(43, "1g", "11g", "0.1g")),
    ("grapes", record(67, "1g", "17g", "0.2g")),
    ("mango", record(60, "1g", "15g", "0.4g")),
    ("milk", record(60, "3g", "5g", "3.2g")),
    ("yogurt", record(59, "10g", "4g", "0.4g")),
    ("cheese", record(113, "7g", "1g", "9g")),
    ("butter", record(717, "1g", "0g", "81g")),
    ("ghee", record(900, "0g", "0g", "100g")),
    ("oil", record(884, "0g", "0g", "100g")),
    ("nuts", record(607, "20g", "16g", "54g")),
    ("almonds", record(575, "21g", "22g", "49g")),
    ("cashews", record(553, "18g", "30g", "44g")),
    ("sugar", record(387, "0g", "100g", "0g")),
    ("honey", record(304, "0g", "82g", "0g")),
    ("quinoa", record(120, "4g", "22g", "2g")),
    ("oats", record(68, "2g", "12g", "1.4g")),
    ("corn", record(86, "3g", "19g", "1.4g")),
    ("idli", record(58, "2g", "12g", "0.5g")),
    ("dosa", record(85, "2g", "16g", "1g")),
    ("sambar", record(65, "3g", "10g", "2g")),
    ("rasam", record(35, "1g", "7g", "1g")),
    ("coconut chutney", record(85, "1g", "3g", "8g")),
];

const HEALTH_TIPS: [&str; 10] = [
    "🌈 Try to 'eat the rainbow' by including fruits and vegetables of different colors in your meals - each color provides unique nutrients and antioxidants!",
    "🍽️ Follow the plate method: fill half your plate with vegetables, one quarter with lean protein, and one quarter with whole grains for optimal nutrition.",
    "💧 Stay hydrated! Your body needs adequate water for digestion, nutrient absorption, and overall cellular function.",
    "🐌 Practice mindful eating by chewing slowly and paying attention to hunger cues - this improves digestion and helps prevent overeating.",
    "🥜 Include healthy fats like nuts, seeds, and avocados in your diet - they're essential for brain health and nutrient absorption.",
    "🕐 Try to eat regular meals throughout the day to maintain steady blood sugar levels and sustained energy.",
    "🧂 Limit processed foods and excess sodium - fresh, whole foods provide better nutrition and natural flavors.",
    "🏃‍♀️ Combine good nutrition with regular physical activity for optimal health and wellbeing.",
    "🍊 Vitamin C-rich foods like citrus fruits help boost immune function and iron absorption from plant-based foods.",
    "🥬 Dark leafy greens are nutritional powerhouses packed with vitamins A, C, K, and folate - try to include them daily!",
];

const RAINBOW_TIP: usize = 0;
const PLATE_METHOD_TIP: usize = 1;
const HYDRATION_TIP: usize = 2;
const HEALTHY_FATS_TIP: usize = 4;

const COLORFUL_VEGETABLES: [&str; 4] = ["spinach", "broccoli", "carrot", "tomato"];
const HEALTHY_FATS: [&str; 3] = ["nuts", "almonds", "cashews"];

fn contains_any(foods: &[&str], group: &[&str]) -> bool {
    foods.iter().any(|food| group.contains(food))
}

struct FoodEntry {
    name: &'static str,
    record: NutritionRecord,
}

/// Read-only food dictionary: the nutrition table doubles as the keyword
/// vocabulary for extraction. Built once at startup and shared.
pub struct NutritionDatabase {
    entries: Vec<FoodEntry>,
    tips: Vec<&'static str>,
}

impl NutritionDatabase {
    pub fn builtin() -> Self {
        let entries = NUTRITION_TABLE
            .iter()
            .map(|&(name, record)| FoodEntry { name, record })
            .collect();

        Self {
            entries,
            tips: HEALTH_TIPS.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Known foods mentioned in `text`, in table order, at most [`MAX_FOODS`].
    ///
    /// Matching is loose on purpose: a multi-word food matches when any one
    /// of its words shows up anywhere in the text, so "bell pepper" is found
    /// in "black pepper". Substrings count too ("rice" matches "licorice").
    pub fn extract_foods(&self, text: &str) -> Vec<&'static str> {
        let text = text.to_lowercase();
        let mut seen = HashSet::new();

        self.entries
            .iter()
            .map(|entry| entry.name)
            .filter(|name| {
                text.contains(name) || name.split_whitespace().any(|word| text.contains(word))
            })
            .filter(|name| seen.insert(*name))
            .take(MAX_FOODS)
            .collect()
    }

    pub fn lookup(&self, foods: &[&str]) -> NutritionFacts {
        let mut facts = NutritionFacts::default();
        for food in foods {
            match self.entries.iter().find(|entry| entry.name == *food) {
                Some(entry) => facts.push(entry.name, entry.record),
                None => log::debug!("No nutrition entry for '{}', skipping", food),
            }
        }
        facts
    }

    /// First matching rule wins: colorful vegetables, then a full plate,
    /// then healthy fats, with hydration as the fallback.
    pub fn select_health_tip(&self, foods: &[&str]) -> &'static str {
        let index = if contains_any(foods, &COLORFUL_VEGETABLES) {
            RAINBOW_TIP
        } else if foods.len() >= 4 {
            PLATE_METHOD_TIP
        } else if contains_any(foods, &HEALTHY_FATS) {
            HEALTHY_FATS_TIP
        } else {
            HYDRATION_TIP
        };

        self.tips[index]
    }
}

#[cfg(test)]
impl NutritionDatabase {
    pub fn food_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn get(&self, food: &str) -> Option<&NutritionRecord> {
        self.entries
            .iter()
            .find(|entry| entry.name == food)
            .map(|entry| &entry.record)
    }
}
