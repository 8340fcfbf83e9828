use serde::Serialize;

/// A California small-claims form that can be downloaded from courts.ca.gov.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCatalogEntry {
    pub form_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub url: &'static str,
}

pub const CATEGORIES: [&str; 3] = ["filing", "judgment", "post-judgment"];

/// The form every submission is filled into.
pub const SC100: &str = "SC-100";

pub static FORMS: &[FormCatalogEntry] = &[
    FormCatalogEntry {
        form_id: "SC-100",
        name: "Plaintiff's Claim and ORDER to Go to Small Claims Court",
        description: "Form to file a small claims lawsuit",
        category: "filing",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc100.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-101",
        name: "Defendant's Claim and ORDER to Go to Small Claims Court (Small Claims)",
        description: "Form for defendant to file a counterclaim",
        category: "filing",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc101.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-103",
        name: "Request to Set Aside Default Judgment",
        description: "Request to set aside a default judgment",
        category: "post-judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc103.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-104",
        name: "Request to Correct or Vacate Judgment",
        description: "Request to correct or vacate a judgment",
        category: "post-judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc104.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-105",
        name: "Request to Enter Default Judgment",
        description: "Request to enter a default judgment",
        category: "judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc105.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-107",
        name: "Request to Enter Judgment",
        description: "Request to enter judgment after trial",
        category: "judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc107.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-108",
        name: "Request to Enter Judgment on Stipulated Agreement",
        description: "Request to enter judgment based on agreement",
        category: "judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc108.pdf",
    },
    FormCatalogEntry {
        form_id: "SC-109",
        name: "Request to Enter Judgment on Settlement Agreement",
        description: "Request to enter judgment based on settlement",
        category: "judgment",
        url: "https://courts.ca.gov/sites/default/files/courts/default/2024-11/sc109.pdf",
    },
];

/// Exact, case-sensitive lookup ("SC-100", not "sc100").
pub fn find(form_id: &str) -> Option<&'static FormCatalogEntry> {
    FORMS.iter().find(|f| f.form_id == form_id)
}

pub fn by_category(category: Option<&str>) -> Vec<&'static FormCatalogEntry> {
    FORMS
        .iter()
        .filter(|f| category.map_or(true, |c| f.category == c))
        .collect()
}
