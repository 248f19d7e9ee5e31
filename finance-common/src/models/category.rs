use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::categories;

#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Identifiable, Queryable, Selectable,
)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCategory<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub color: &'a str,
    pub icon: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl From<NewCategory<'_>> for Category {
    fn from(new_category: NewCategory<'_>) -> Self {
        Category {
            id: new_category.id,
            name: String::from(new_category.name),
            color: String::from(new_category.color),
            icon: new_category.icon.map(String::from),
            created_at: new_category.created_at,
        }
    }
}

/// A category every fresh installation starts out with.
pub struct DefaultCategory {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_CATEGORIES: [DefaultCategory; 7] = [
    DefaultCategory {
        name: "Food",
        color: "#FF6B6B",
        icon: "🍔",
    },
    DefaultCategory {
        name: "Transportation",
        color: "#4ECDC4",
        icon: "🚗",
    },
    DefaultCategory {
        name: "Entertainment",
        color: "#45B7D1",
        icon: "🎬",
    },
    DefaultCategory {
        name: "Shopping",
        color: "#96CEB4",
        icon: "🛍️",
    },
    DefaultCategory {
        name: "Bills",
        color: "#FFEAA7",
        icon: "💡",
    },
    DefaultCategory {
        name: "Healthcare",
        color: "#DDA0DD",
        icon: "🏥",
    },
    DefaultCategory {
        name: "Other",
        color: "#B0B0B0",
        icon: "📝",
    },
];
