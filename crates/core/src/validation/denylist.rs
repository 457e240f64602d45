/// Case-insensitive substring denylist for titles.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    words: Vec<String>,
}

impl Denylist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// First denylisted word contained in `text`, if any.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.words
            .iter()
            .find(|w| haystack.contains(w.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_regardless_of_case() {
        let list = Denylist::new(["BadWord1"]);
        assert_eq!(list.first_match("A BADWORD1 story"), Some("badword1"));
        assert_eq!(list.first_match("A clean story"), None);
    }

    #[test]
    fn blank_entries_are_ignored() {
        let list = Denylist::new(["", "  "]);
        assert_eq!(list.first_match("anything"), None);
    }
}
