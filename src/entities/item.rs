use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recyclable-material category as exposed by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub image_url: String,
}

/// Row of the `items` table.
#[derive(Clone, Debug, FromRow)]
pub struct ItemRecord {
    pub id: i32,
    pub title: String,
    pub image: String,
}

impl ItemRecord {
    pub fn into_item(self, uploads_url: &str) -> Item {
        Item {
            id: self.id,
            image_url: format!("{}/{}", uploads_url, self.image),
            title: self.title,
        }
    }
}

/// Catalog inserted into an empty `items` table: `(title, image)`.
pub const CATALOG: [(&str, &str); 6] = [
    ("Lâmpadas", "lampadas.svg"),
    ("Pilhas e Baterias", "baterias.svg"),
    ("Papéis e Papelão", "papeis-papelao.svg"),
    ("Resíduos Eletrônicos", "eletronicos.svg"),
    ("Resíduos Orgânicos", "organicos.svg"),
    ("Óleo de Cozinha", "oleo.svg"),
];
