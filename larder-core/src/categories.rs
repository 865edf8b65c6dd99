//! Curated category table: one Japanese category name expands into several
//! English search keywords and Rakuten category keywords.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub icon: &'static str,
    pub english_keywords: &'static [&'static str],
    pub rakuten_keywords: &'static [&'static str],
}

impl Category {
    /// Keywords to send to Rakuten; the category name itself if none are listed.
    pub fn rakuten_queries(&self) -> Vec<&'static str> {
        if self.rakuten_keywords.is_empty() {
            vec![self.name]
        } else {
            self.rakuten_keywords.to_vec()
        }
    }
}

pub static CATEGORIES: &[Category] = &[
    Category {
        name: "人気メニュー",
        icon: "🔥",
        english_keywords: &["popular", "trending", "best"],
        rakuten_keywords: &["人気", "定番"],
    },
    Category {
        name: "定番の肉料理",
        icon: "🍖",
        english_keywords: &["meat", "beef", "pork", "chicken", "steak"],
        rakuten_keywords: &["肉料理", "鶏肉", "豚肉", "牛肉"],
    },
    Category {
        name: "定番の魚料理",
        icon: "🐟",
        english_keywords: &["fish", "seafood", "salmon", "tuna"],
        rakuten_keywords: &["魚料理", "魚"],
    },
    Category {
        name: "卵料理",
        icon: "🥚",
        english_keywords: &["egg", "omelet", "scramble"],
        rakuten_keywords: &["卵料理", "卵"],
    },
    Category {
        name: "ご飯もの",
        icon: "🍚",
        english_keywords: &["rice", "bowl", "fried rice", "donburi"],
        rakuten_keywords: &["ご飯もの", "丼"],
    },
    Category {
        name: "パスタ",
        icon: "🍝",
        english_keywords: &["pasta", "spaghetti", "carbonara"],
        rakuten_keywords: &["パスタ", "スパゲッティ"],
    },
    Category {
        name: "麺・粉物料理",
        icon: "🍜",
        english_keywords: &["noodle", "ramen", "udon", "soba"],
        rakuten_keywords: &["麺類", "うどん", "そば"],
    },
    Category {
        name: "汁物・スープ",
        icon: "🍲",
        english_keywords: &["soup", "stew", "miso soup"],
        rakuten_keywords: &["汁物", "スープ"],
    },
    Category {
        name: "鍋料理",
        icon: "🍯",
        english_keywords: &["hot pot", "nabe", "stew"],
        rakuten_keywords: &["鍋", "鍋料理"],
    },
    Category {
        name: "サラダ",
        icon: "🥗",
        english_keywords: &["salad", "vegetable", "caesar"],
        rakuten_keywords: &["サラダ"],
    },
    Category {
        name: "パン",
        icon: "🍞",
        english_keywords: &["bread", "sandwich", "toast"],
        rakuten_keywords: &["パン", "サンドイッチ"],
    },
    Category {
        name: "お菓子",
        icon: "🍰",
        english_keywords: &["dessert", "cake", "cookie", "sweet"],
        rakuten_keywords: &["お菓子", "スイーツ"],
    },
    Category {
        name: "簡単料理・時短",
        icon: "⚡",
        english_keywords: &["quick", "easy", "simple"],
        rakuten_keywords: &["簡単", "時短"],
    },
    Category {
        name: "節約料理",
        icon: "💰",
        english_keywords: &["budget", "cheap", "economy"],
        rakuten_keywords: &["節約", "節約料理"],
    },
    Category {
        name: "健康料理",
        icon: "🥬",
        english_keywords: &["healthy", "diet", "low carb"],
        rakuten_keywords: &["健康", "ヘルシー"],
    },
    Category {
        name: "中華料理",
        icon: "🥟",
        english_keywords: &["chinese", "dumpling", "fried rice"],
        rakuten_keywords: &["中華", "中華料理"],
    },
    Category {
        name: "韓国料理",
        icon: "🌶️",
        english_keywords: &["korean", "kimchi", "bibimbap"],
        rakuten_keywords: &["韓国料理", "キムチ"],
    },
    Category {
        name: "イタリア料理",
        icon: "🇮🇹",
        english_keywords: &["italian", "pasta", "pizza"],
        rakuten_keywords: &["イタリアン", "イタリア料理"],
    },
];

pub fn find_category(name: &str) -> Result<&'static Category, RequestError> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| RequestError::UnknownCategory(name.to_string()))
}

/// Owned, serializable view of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub name: String,
    pub icon: String,
    pub english_keywords: Vec<String>,
    pub rakuten_keywords: Vec<String>,
}

impl From<&Category> for CategoryInfo {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.to_string(),
            icon: category.icon.to_string(),
            english_keywords: category.english_keywords.iter().map(|k| k.to_string()).collect(),
            rakuten_keywords: category.rakuten_keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

pub fn list_categories() -> Vec<CategoryInfo> {
    CATEGORIES.iter().map(CategoryInfo::from).collect()
}
