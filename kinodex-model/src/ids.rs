use uuid::Uuid;

/// Strongly typed ID for catalog items.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy,
    serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ItemID(pub Uuid);

impl Default for ItemID {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemID {
    pub fn new() -> Self {
        ItemID(Uuid::now_v7())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse from the canonical hyphenated form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(ItemID)
    }
}

impl AsRef<Uuid> for ItemID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ItemID {
    fn from(value: Uuid) -> Self {
        ItemID(value)
    }
}

impl std::fmt::Display for ItemID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
