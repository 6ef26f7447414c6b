//! Console tabs.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Dashboard,
    Inventory,
    Orders,
    Customers,
    Reviews,
    Settings,
}

impl Tab {
    /// Navigation order.
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Inventory,
        Tab::Orders,
        Tab::Customers,
        Tab::Reviews,
        Tab::Settings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Inventory => "Inventory",
            Tab::Orders => "Orders",
            Tab::Customers => "Customers",
            Tab::Reviews => "Reviews",
            Tab::Settings => "Settings",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}
