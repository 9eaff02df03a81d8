//! Category Entity

use chrono::{DateTime, Utc};
use kernel::id::CategoryId;

/// Course category
#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        let slug = platform::code::slugify(&name);

        Self {
            category_id: CategoryId::new(),
            name,
            slug,
            description,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_slug() {
        let category = Category::new("Web Development".to_string(), None);
        assert_eq!(category.slug, "web-development");
        assert!(category.is_active);
        assert_eq!(category.sort_order, 0);
    }
}
