//! Persona settings and exchange outcome types.

pub const DEFAULT_SESSION_ID: &str = "boss_session_01";
pub const DEFAULT_PERSISTENCE_ALERT_THRESHOLD: u32 = 3;

/// Template paths, fixed variables and canned replies that give the assistant its voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub system_template: String,
    pub turn_template: String,
    pub location: String,
    pub overload_apology: String,
    pub generic_apology: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            system_template: "core/giulia_assistant".to_string(),
            turn_template: "core/boss_wrapper".to_string(),
            location: "your private office".to_string(),
            overload_apology:
                "The line to headquarters is jammed, boss. Give me a moment and try again."
                    .to_string(),
            generic_apology: "Something went wrong in the office. Check the logs, boss?"
                .to_string(),
        }
    }
}

impl Persona {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_templates(
        mut self,
        system_template: impl Into<String>,
        turn_template: impl Into<String>,
    ) -> Self {
        self.system_template = system_template.into();
        self.turn_template = turn_template.into();
        self
    }

    pub fn with_apologies(
        mut self,
        overload_apology: impl Into<String>,
        generic_apology: impl Into<String>,
    ) -> Self {
        self.overload_apology = overload_apology.into();
        self.generic_apology = generic_apology.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStatus {
    Replied,
    /// The backend stayed overloaded through every retry.
    Overloaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub reply: String,
    pub status: ExchangeStatus,
    /// Whether the history was written after this exchange.
    pub persisted: bool,
}

impl ExchangeOutcome {
    pub fn is_replied(&self) -> bool {
        self.status == ExchangeStatus::Replied
    }
}
