use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user_id: Uuid, recipe_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            recipe_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_creation() {
        let user_id = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();
        let bookmark = Bookmark::new(user_id, recipe_id);

        assert_eq!(bookmark.user_id, user_id);
        assert_eq!(bookmark.recipe_id, recipe_id);
    }
}
