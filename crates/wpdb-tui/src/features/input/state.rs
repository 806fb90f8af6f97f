//! The cursor is a char index, not a byte index.

use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Clear,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    text: String,
    cursor: usize,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Takes the text, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        mem::take(&mut self.text)
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            self.apply(EditAction::Insert(c));
        }
    }

    pub fn apply(&mut self, action: EditAction) {
        let len = self.text.chars().count();
        match action {
            EditAction::Insert(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            EditAction::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            EditAction::Delete => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            EditAction::Left => self.cursor = self.cursor.saturating_sub(1),
            EditAction::Right => self.cursor = (self.cursor + 1).min(len),
            EditAction::Home => self.cursor = 0,
            EditAction::End => self.cursor = len,
            EditAction::Clear => {
                self.text.clear();
                self.cursor = 0;
            }
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_in_middle_of_multibyte_text() {
        let mut input = InputState::default();
        input.insert_str("p é");
        input.apply(EditAction::Left);
        input.apply(EditAction::Insert('x'));
        assert_eq!(input.text(), "p xé");

        input.apply(EditAction::Backspace);
        input.apply(EditAction::Delete);
        assert_eq!(input.text(), "p ");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_take_clears() {
        let mut input = InputState::default();
        input.set_text("where");
        assert_eq!(input.cursor(), 5);
        assert_eq!(input.take(), "where");
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_paste_drops_control_chars() {
        let mut input = InputState::default();
        input.insert_str("p x\n");
        assert_eq!(input.text(), "p x");
    }
}
