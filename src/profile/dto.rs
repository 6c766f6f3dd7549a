use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the user usually gets to the shops; biases purchase suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Bike,
    Walk,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bike => "bike",
            TransportMode::Walk => "walk",
        }
    }
}

/// A `profiles` row; the id doubles as the user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub transport_mode: TransportMode,
}
