use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// One ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Json<Vec<Ingredient>>,
}

impl Drink {
    /// Abbreviated representation served on the public menu: ingredient names
    /// stay off it.
    pub fn short(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "recipe": self
                .recipe
                .iter()
                .map(|i| json!({ "color": i.color, "parts": i.parts }))
                .collect::<Vec<_>>(),
        })
    }

    /// Full representation for baristas, ingredient names included.
    pub fn long(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "recipe": self.recipe.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcha() -> Drink {
        Drink {
            id: 7,
            title: "Matcha Shake".to_string(),
            recipe: Json(vec![
                Ingredient {
                    name: "milk".to_string(),
                    color: "grey".to_string(),
                    parts: 1,
                },
                Ingredient {
                    name: "matcha".to_string(),
                    color: "green".to_string(),
                    parts: 3,
                },
            ]),
        }
    }

    #[test]
    fn short_hides_ingredient_names() {
        let value = matcha().short();
        assert_eq!(value["title"], "Matcha Shake");
        assert_eq!(value["recipe"][0]["color"], "grey");
        assert!(value["recipe"][0].get("name").is_none());
    }

    #[test]
    fn long_keeps_ingredient_names() {
        let value = matcha().long();
        assert_eq!(value["recipe"][1]["name"], "matcha");
        assert_eq!(value["recipe"][1]["parts"], 3);
    }
}
