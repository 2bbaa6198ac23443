/// Star rating widget state: a transient hover preview over a committed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarRating {
    max: u8,
    committed: Option<u8>,
    preview: Option<u8>,
    times_rated: u32,
}

impl Default for StarRating {
    fn default() -> Self {
        Self::new(5)
    }
}

impl StarRating {
    pub fn new(max: u8) -> Self {
        Self {
            max: max.max(1),
            committed: None,
            preview: None,
            times_rated: 0,
        }
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    fn clamp(&self, value: u8) -> u8 {
        value.clamp(1, self.max)
    }

    pub fn hover(&mut self, value: u8) {
        self.preview = Some(self.clamp(value));
    }

    pub fn leave(&mut self) {
        self.preview = None;
    }

    /// Commit `value` and return it. Only changes of the committed value count
    /// towards `times_rated`.
    pub fn click(&mut self, value: u8) -> u8 {
        let value = self.clamp(value);
        if self.committed != Some(value) {
            self.times_rated += 1;
        }
        self.committed = Some(value);
        value
    }

    pub fn rating(&self) -> Option<u8> {
        self.committed
    }

    pub fn preview(&self) -> Option<u8> {
        self.preview
    }

    pub fn times_rated(&self) -> u32 {
        self.times_rated
    }

    /// Number of filled stars: the preview while hovering, else the committed value
    pub fn filled(&self) -> u8 {
        self.preview.or(self.committed).unwrap_or(0)
    }

    /// Number shown next to the stars
    pub fn label(&self) -> Option<u8> {
        self.committed.or(self.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_five_stars() {
        let rating = StarRating::default();
        assert_eq!(rating.max(), 5);
        assert_eq!(rating.rating(), None);
        assert_eq!(rating.filled(), 0);
    }

    #[test]
    fn test_hover_then_leave_reveals_committed() {
        let mut rating = StarRating::new(10);
        rating.click(4);
        rating.hover(9);
        assert_eq!(rating.filled(), 9);
        assert_eq!(rating.label(), Some(4));

        rating.leave();
        assert_eq!(rating.filled(), 4);
        assert_eq!(rating.preview(), None);
    }

    #[test]
    fn test_hover_without_commit() {
        let mut rating = StarRating::new(10);
        rating.hover(6);
        assert_eq!(rating.label(), Some(6));
        rating.leave();
        assert_eq!(rating.label(), None);
        assert_eq!(rating.filled(), 0);
    }

    #[test]
    fn test_click_counts_changes() {
        let mut rating = StarRating::new(10);
        assert_eq!(rating.click(7), 7);
        rating.click(7);
        rating.click(8);
        assert_eq!(rating.rating(), Some(8));
        assert_eq!(rating.times_rated(), 2);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut rating = StarRating::new(10);
        assert_eq!(rating.click(0), 1);
        assert_eq!(rating.click(42), 10);
    }
}
