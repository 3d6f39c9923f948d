//! Active-image selection for the product page.

/// An image gallery over a product's ordered image list.
///
/// Starts on the first image. Selecting an index outside the list is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gallery<'a> {
    images: &'a [String],
    selected: usize,
}

impl<'a> Gallery<'a> {
    #[must_use]
    pub const fn new(images: &'a [String]) -> Self {
        Self {
            images,
            selected: 0,
        }
    }

    /// Build a gallery and apply an optional selection, as carried by a
    /// thumbnail link.
    #[must_use]
    pub fn with_selection(images: &'a [String], index: Option<usize>) -> Self {
        let mut gallery = Self::new(images);
        if let Some(index) = index {
            gallery.select(index);
        }
        gallery
    }

    /// Make `index` the active image. Returns `false` and leaves the
    /// selection alone when `index` is out of range.
    pub const fn select(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// The image shown large, or `None` for a product without images.
    #[must_use]
    pub fn active(&self) -> Option<&'a str> {
        self.images.get(self.selected).map(String::as_str)
    }

    /// Thumbnails are only worth showing when there is something to switch to.
    #[must_use]
    pub const fn has_thumbnails(&self) -> bool {
        self.images.len() > 1
    }

    /// `(index, url, is_active)` for each image, in order.
    pub fn thumbnails(&self) -> impl Iterator<Item = (usize, &'a str, bool)> + '_ {
        self.images
            .iter()
            .enumerate()
            .map(move |(i, url)| (i, url.as_str(), i == self.selected))
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn images() -> Vec<String> {
        vec!["front.jpg".into(), "side.jpg".into(), "box.jpg".into()]
    }

    #[test]
    fn defaults_to_first_image() {
        let images = images();
        let gallery = Gallery::new(&images);
        assert_eq!(gallery.selected(), 0);
        assert_eq!(gallery.active(), Some("front.jpg"));
    }

    #[test]
    fn selecting_each_valid_index_shows_that_image() {
        let images = images();
        let mut gallery = Gallery::new(&images);
        for i in 0..images.len() {
            assert!(gallery.select(i));
            assert_eq!(gallery.active(), Some(images[i].as_str()));
        }
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let images = images();
        let gallery = Gallery::with_selection(&images, Some(7));
        assert_eq!(gallery.selected(), 0);
    }

    #[test]
    fn empty_gallery_has_no_active_image() {
        let gallery = Gallery::new(&[]);
        assert!(gallery.active().is_none());
        assert!(!gallery.has_thumbnails());
    }

    #[test]
    fn single_image_hides_thumbnails() {
        let images = vec!["only.jpg".to_owned()];
        assert!(!Gallery::new(&images).has_thumbnails());
    }

    #[test]
    fn thumbnails_mark_the_active_one() {
        let images = images();
        let gallery = Gallery::with_selection(&images, Some(1));
        let active: Vec<usize> = gallery
            .thumbnails()
            .filter(|(_, _, active)| *active)
            .map(|(i, _, _)| i)
            .collect();
        assert_eq!(active, vec![1]);
    }
}
