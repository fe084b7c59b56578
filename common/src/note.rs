/// Text being typed into the note modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    text: String,
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Hand out the trimmed note and clear the draft. Blank drafts are kept.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let note = self.text.trim().to_string();
        self.text.clear();
        Some(note)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
