use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card: Reference data for a tracked card printing
// ---------------------------------------------------------------------------

/// A tradable card. Showcase printings are distinct cards with their own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub name: String,
    pub is_showcase: bool,
    pub set_code: String,
    pub rarity: Option<String>,
    pub domain: Option<String>,
    pub cost: Option<i64>,
    pub ability: Option<String>,
    pub image_url: Option<String>,
}

impl Card {
    /// Name shown in pickers, marking showcase variants.
    pub fn display_name(&self) -> String {
        if self.is_showcase {
            format!("{} (\u{2728} Showcase)", self.name)
        } else {
            self.name.clone()
        }
    }
}
