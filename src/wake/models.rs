// src/wake/models.rs
use std::fmt;

/// Widest id the report site accepts (seven digits, zero padded).
pub const MAX_ENTITY_ID: u32 = 9_999_999;

/// The six report tabs extracted for every property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Account,
    Building,
    Land,
    Deeds,
    Notes,
    Sales,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Account,
        Tab::Building,
        Tab::Land,
        Tab::Deeds,
        Tab::Notes,
        Tab::Sales,
    ];

    /// Key used for this tab in the entity record.
    pub fn name(self) -> &'static str {
        match self {
            Tab::Account => "Account",
            Tab::Building => "Building",
            Tab::Land => "Land",
            Tab::Deeds => "Deeds",
            Tab::Notes => "Notes",
            Tab::Sales => "Sales",
        }
    }

    /// Page on the report site serving this tab.
    pub fn page(self) -> &'static str {
        match self {
            Tab::Sales => "ImpSales",
            other => other.name(),
        }
    }

    /// Building pages are split into cards, one per structure.
    pub fn has_cards(self) -> bool {
        matches!(self, Tab::Building)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric property identifier, rendered zero padded to seven digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub fn new(value: u32) -> Option<Self> {
        (value <= MAX_ENTITY_ID).then_some(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:07}", self.0)
    }
}

/// One document request: a tab for an entity, optionally a building card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRequest {
    pub tab: Tab,
    pub id: EntityId,
    pub card: Option<u32>,
}

impl TabRequest {
    pub fn new(tab: Tab, id: EntityId) -> Self {
        let card = tab.has_cards().then_some(1);
        Self { tab, id, card }
    }

    /// Query parameters in the order the site expects them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("id", self.id.to_string())];
        if let Some(card) = self.card {
            params.push(("cd", format!("{:02}", card)));
        }
        params
    }

    /// Full URL of the page under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let query = self
            .params()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{}.asp?{}", base_url.trim_end_matches('/'), self.tab.page(), query)
    }
}
