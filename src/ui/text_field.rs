use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable text with a cursor, the default behavior of a textarea.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.value.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .chars()
            .next_back()
            .map_or(0, |c| self.cursor - c.len_utf8())
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            let start = self.prev_boundary();
            self.value.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    fn delete_char_at_cursor(&mut self) {
        let end = self.next_boundary();
        self.value.drain(self.cursor..end);
    }

    fn delete_word_before_cursor(&mut self) {
        let trimmed = self.value[..self.cursor].trim_end_matches(' ');
        let start = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.value.drain(start..self.cursor);
        self.cursor = start;
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply a key press. Returns false for keys a text field ignores.
    pub fn apply_key(&mut self, key: &KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.insert_char('\n'),

            // Delete
            (KeyCode::Backspace, KeyModifiers::ALT) => self.delete_word_before_cursor(),
            (KeyCode::Backspace, _) => self.delete_char_before_cursor(),
            (KeyCode::Delete, _) => self.delete_char_at_cursor(),

            // Navigation
            (KeyCode::Left, _) => self.cursor = self.prev_boundary(),
            (KeyCode::Right, _) => self.cursor = self.next_boundary(),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.cursor = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear_line(),

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),

            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, code: KeyCode) -> bool {
        field.apply_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::default();
        type_str(&mut field, "https://exampel");
        press(&mut field, KeyCode::Backspace);
        press(&mut field, KeyCode::Backspace);
        type_str(&mut field, "le.com");
        assert_eq!(field.value(), "https://example.com");
        assert_eq!(field.cursor(), field.value().len());
    }

    #[test]
    fn test_cursor_respects_multibyte_chars() {
        let mut field = TextField::default();
        field.set("héé");
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.value(), "hé");
        press(&mut field, KeyCode::Home);
        press(&mut field, KeyCode::Delete);
        assert_eq!(field.value(), "é");
        press(&mut field, KeyCode::Right);
        press(&mut field, KeyCode::Right);
        assert_eq!(field.cursor(), "é".len());
    }

    #[test]
    fn test_word_delete_and_clear() {
        let mut field = TextField::default();
        field.set("see https://a.io  ");
        field.apply_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(field.value(), "see ");

        field.apply_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(field.value(), "");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_enter_inserts_newline_and_unknown_keys_are_ignored() {
        let mut field = TextField::default();
        assert!(press(&mut field, KeyCode::Enter));
        assert_eq!(field.value(), "\n");
        assert!(!press(&mut field, KeyCode::F(2)));
        assert!(!field.apply_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
    }
}
