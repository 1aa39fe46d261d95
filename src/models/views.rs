use std::fmt;
use std::str::FromStr;

pub const MARKETING_REGIONS: [&str; 6] = [
    "hero",
    "speed-section",
    "plans-section",
    "sim-section",
    "offers-section",
    "faq-section",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardSection {
    #[default]
    Overview,
    History,
    SavedPlans,
    Profile,
}

impl DashboardSection {
    pub fn region(&self) -> &'static str {
        match self {
            DashboardSection::Overview => "overview",
            DashboardSection::History => "history",
            DashboardSection::SavedPlans => "saved-plans",
            DashboardSection::Profile => "profile",
        }
    }
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region())
    }
}

impl FromStr for DashboardSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(DashboardSection::Overview),
            "history" => Ok(DashboardSection::History),
            "saved-plans" | "saved" | "plans" => Ok(DashboardSection::SavedPlans),
            "profile" => Ok(DashboardSection::Profile),
            other => Err(format!("Unknown dashboard section: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Marketing,
    Dashboard(DashboardSection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modal {
    Login,
    Signup,
    Otp { mobile: String },
    Payment { mobile: String, amount: String },
}

/// Everything the renderer needs to decide which regions are on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub page: Page,
    pub modal: Option<Modal>,
}

impl View {
    pub fn visible_regions(&self) -> Vec<&'static str> {
        match self.page {
            Page::Marketing => MARKETING_REGIONS.to_vec(),
            Page::Dashboard(section) => vec!["dashboard", section.region()],
        }
    }
}
