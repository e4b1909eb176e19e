//! SQ3R prompt rotation.
//!
//! The active stage follows page-parity heuristics: even pages suggest
//! `Question`, odd pages `Read`, the first page `Survey` when stepping back,
//! note entry `Recite` and leaving `Review`.

/// One SQ3R study stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sq3rStage {
    Survey,
    Question,
    Read,
    Recite,
    Review,
}

impl Sq3rStage {
    pub const ALL: [Sq3rStage; 5] = [
        Self::Survey,
        Self::Question,
        Self::Read,
        Self::Recite,
        Self::Review,
    ];

    /// Prompt text shown to the reader.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Survey => "Survey the chapter: Look at titles, headings, and any available summaries or key points.",
            Self::Question => "Create questions: What do you expect to learn from this section based on the headings?",
            Self::Read => "Read to answer your questions. Pay attention to the arguments and evidence presented.",
            Self::Recite => "Recite the main points: Without looking at the text, note down what you remember.",
            Self::Review => "Review your notes and the text. Did you capture the key points? What did you miss?",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Survey => "Survey",
            Self::Question => "Question",
            Self::Read => "Read",
            Self::Recite => "Recite",
            Self::Review => "Review",
        }
    }

    /// Stage suggested after paging forward onto `page` (0-based).
    pub fn after_next_page(page: usize) -> Self {
        if page % 2 == 0 {
            Self::Question
        } else {
            Self::Read
        }
    }

    /// Stage suggested after paging back onto `page` (0-based).
    pub fn after_prev_page(page: usize) -> Self {
        if page == 0 {
            Self::Survey
        } else {
            Self::after_next_page(page)
        }
    }
}

/// Current stage plus prompt visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTracker {
    stage: Sq3rStage,
    visible: bool,
}

impl Default for PromptTracker {
    fn default() -> Self {
        Self {
            stage: Sq3rStage::Survey,
            visible: true,
        }
    }
}

impl PromptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Sq3rStage {
        self.stage
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Prompt text, or `None` while hidden.
    pub fn current_prompt(&self) -> Option<&'static str> {
        self.visible.then(|| self.stage.prompt())
    }

    /// Switches stage. An update always re-shows the prompt.
    pub fn update(&mut self, stage: Sq3rStage) {
        self.stage = stage;
        self.visible = true;
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::{PromptTracker, Sq3rStage};

    #[test]
    fn page_parity_selects_stage() {
        assert_eq!(Sq3rStage::after_next_page(1), Sq3rStage::Read);
        assert_eq!(Sq3rStage::after_next_page(2), Sq3rStage::Question);
        assert_eq!(Sq3rStage::after_prev_page(0), Sq3rStage::Survey);
        assert_eq!(Sq3rStage::after_prev_page(3), Sq3rStage::Read);
        assert_eq!(Sq3rStage::after_prev_page(4), Sq3rStage::Question);
    }

    #[test]
    fn tracker_starts_on_survey_and_update_reshows() {
        let mut tracker = PromptTracker::new();
        assert_eq!(tracker.stage(), Sq3rStage::Survey);
        assert!(tracker.current_prompt().unwrap().starts_with("Survey"));

        assert!(!tracker.toggle_visibility());
        assert_eq!(tracker.current_prompt(), None);

        tracker.update(Sq3rStage::Recite);
        assert!(tracker.is_visible());
        assert_eq!(tracker.current_prompt(), Some(Sq3rStage::Recite.prompt()));
    }

    #[test]
    fn every_stage_has_distinct_prompt() {
        let mut prompts: Vec<&str> = Sq3rStage::ALL.iter().map(|stage| stage.prompt()).collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), Sq3rStage::ALL.len());
    }
}
