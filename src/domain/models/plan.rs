use serde::{Deserialize, Serialize};

/// One step of a proposed plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub title: String,
    pub description: String,
    /// User-togglable before the plan is accepted
    #[serde(default = "default_selected")]
    pub selected: bool,
}

const fn default_selected() -> bool {
    true
}

impl PlanStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            selected: true,
        }
    }
}
