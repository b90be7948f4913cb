use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(json)]
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub creator_id: Uuid,
    pub is_ai_generated: bool,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A recipe payload that has not been persisted yet: a direct user
/// submission, an LLM generation the user decided to keep, or an external
/// provider record being mirrored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
}

impl RecipeDraft {
    /// Field requirements branch on origin: regular recipes must carry a
    /// description, an image and a source URL; AI-generated recipes may
    /// omit those but every ingredient needs a quantity and a unit, and
    /// the instruction list must not be empty.
    pub fn validate(&self, is_ai_generated: bool) -> Result<(), String> {
        let mut problems: Vec<String> = Vec::new();

        if self.title.trim().is_empty() {
            problems.push("title must not be empty".to_string());
        }

        if is_ai_generated {
            if self.instructions.is_empty() {
                problems.push("instructions must not be empty".to_string());
            }
            for (i, ingredient) in self.ingredients.iter().enumerate() {
                if ingredient.quantity.is_none() {
                    problems.push(format!("ingredients[{i}].quantity is required"));
                }
                if ingredient.unit.is_none() {
                    problems.push(format!("ingredients[{i}].unit is required"));
                }
            }
        } else {
            if self.description.as_deref().unwrap_or("").trim().is_empty() {
                problems.push("description is required".to_string());
            }
            if self.image_url.as_deref().unwrap_or("").trim().is_empty() {
                problems.push("image_url is required".to_string());
            }
            if self.source_url.as_deref().unwrap_or("").trim().is_empty() {
                problems.push("sourceUrl is required".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
}

impl Recipe {
    pub fn from_draft(draft: RecipeDraft, creator_id: Uuid, is_ai_generated: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            image_url: draft.image_url,
            cooking_time: draft.cooking_time,
            servings: draft.servings,
            creator_id,
            is_ai_generated,
            source_url: draft.source_url,
            created_at: Utc::now(),
        }
    }

    pub fn apply_patch(&mut self, patch: RecipePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = instructions;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(cooking_time) = patch.cooking_time {
            self.cooking_time = Some(cooking_time);
        }
        if let Some(servings) = patch.servings {
            self.servings = Some(servings);
        }
        if let Some(source_url) = patch.source_url {
            self.source_url = Some(source_url);
        }
    }
}

/// A bookmark target as sent by a client. Externally sourced and
/// AI-generated recipes have no local record yet; resolution maps every
/// variant onto one durable local id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RecipeRef {
    Local { id: Uuid },
    External { id: String },
    AiGenerated { recipe: RecipeDraft },
}

/// Listing/search row shape: recipe columns joined with the creator's
/// username as `publisher`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub publisher: Option<String>,
    #[sqlx(json)]
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ai_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Test".to_string(),
            description: None,
            ingredients: vec![Ingredient {
                quantity: Some(1.0),
                unit: Some("cup".to_string()),
                description: "rice".to_string(),
            }],
            instructions: vec!["Boil".to_string()],
            image_url: None,
            cooking_time: Some(20),
            servings: Some(2),
            source_url: None,
        }
    }

    fn regular_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Carbonara".to_string(),
            description: Some("Roman pasta".to_string()),
            ingredients: vec![Ingredient {
                quantity: None,
                unit: None,
                description: "spaghetti".to_string(),
            }],
            instructions: vec!["Cook pasta".to_string()],
            image_url: Some("https://example.com/carbonara.jpg".to_string()),
            cooking_time: Some(25),
            servings: Some(4),
            source_url: Some("https://example.com/carbonara".to_string()),
        }
    }

    #[test]
    fn test_ai_draft_relaxes_description_and_urls() {
        assert!(ai_draft().validate(true).is_ok());
    }

    #[test]
    fn test_ai_draft_requires_ingredient_quantity_and_unit() {
        let mut draft = ai_draft();
        draft.ingredients[0].quantity = None;
        draft.ingredients[0].unit = None;

        let err = draft.validate(true).unwrap_err();
        assert!(err.contains("ingredients[0].quantity"));
        assert!(err.contains("ingredients[0].unit"));
    }

    #[test]
    fn test_ai_draft_requires_instructions() {
        let mut draft = ai_draft();
        draft.instructions.clear();

        let err = draft.validate(true).unwrap_err();
        assert!(err.contains("instructions"));
    }

    #[test]
    fn test_regular_draft_allows_bare_ingredients() {
        assert!(regular_draft().validate(false).is_ok());
    }

    #[test]
    fn test_regular_draft_requires_description_image_and_source() {
        let mut draft = regular_draft();
        draft.description = None;
        draft.image_url = None;
        draft.source_url = Some("  ".to_string());

        let err = draft.validate(false).unwrap_err();
        assert!(err.contains("description"));
        assert!(err.contains("image_url"));
        assert!(err.contains("sourceUrl"));
    }

    #[test]
    fn test_title_always_required() {
        let mut draft = ai_draft();
        draft.title = " ".to_string();

        assert!(draft.validate(true).is_err());
        let mut draft = regular_draft();
        draft.title = String::new();
        assert!(draft.validate(false).is_err());
    }

    #[test]
    fn test_from_draft_assigns_id_and_creator() {
        let creator = Uuid::new_v4();
        let recipe = Recipe::from_draft(ai_draft(), creator, true);

        assert_eq!(recipe.creator_id, creator);
        assert!(recipe.is_ai_generated);
        assert_eq!(recipe.title, "Test");
    }

    #[test]
    fn test_apply_patch_merges_only_provided_fields() {
        let creator = Uuid::new_v4();
        let mut recipe = Recipe::from_draft(regular_draft(), creator, false);

        recipe.apply_patch(RecipePatch {
            title: Some("Updated".to_string()),
            servings: Some(6),
            ..Default::default()
        });

        assert_eq!(recipe.title, "Updated");
        assert_eq!(recipe.servings, Some(6));
        assert_eq!(recipe.description, Some("Roman pasta".to_string()));
        assert_eq!(recipe.cooking_time, Some(25));
    }

    #[test]
    fn test_recipe_ref_tagged_serialization() {
        let local = RecipeRef::Local { id: Uuid::new_v4() };
        let json = serde_json::to_string(&local).unwrap();
        assert!(json.contains("\"type\":\"local\""));

        let external: RecipeRef =
            serde_json::from_str(r#"{"type":"external","id":"5ed6604591c37cdc054bc886"}"#).unwrap();
        assert_eq!(
            external,
            RecipeRef::External {
                id: "5ed6604591c37cdc054bc886".to_string()
            }
        );

        let ai = RecipeRef::AiGenerated { recipe: ai_draft() };
        let json = serde_json::to_string(&ai).unwrap();
        assert!(json.contains("\"type\":\"aiGenerated\""));
        let roundtrip: RecipeRef = serde_json::from_str(&json).unwrap();
        assert_eq!(ai, roundtrip);
    }
}
