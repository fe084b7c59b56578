use crate::image::CapturedImage;

/// Carousel over a snapshot of gallery images.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentPreview {
    images: Vec<CapturedImage>,
    position: usize,
}

impl RecentPreview {
    /// Take the first `limit` images (all of them when `limit` is `None`).
    pub fn new(images: &[CapturedImage], limit: Option<usize>) -> Self {
        let take = limit.unwrap_or(images.len()).min(images.len());
        Self {
            images: images[..take].to_vec(),
            position: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&CapturedImage> {
        self.images.get(self.position)
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn can_prev(&self) -> bool {
        self.position > 0
    }

    pub fn can_next(&self) -> bool {
        self.position + 1 < self.images.len()
    }

    pub fn next(&mut self) {
        if self.can_next() {
            self.position += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.can_prev() {
            self.position -= 1;
        }
    }

    /// Previous/next controls only make sense with more than one image.
    pub fn shows_navigation(&self) -> bool {
        self.images.len() > 1
    }

    /// "N photos" badge, hidden for a single image.
    pub fn counter_label(&self) -> Option<String> {
        match self.images.len() {
            0 | 1 => None,
            n => Some(format!("{} photos", n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{EncodedImage, ImageId};

    fn images(n: u64) -> Vec<CapturedImage> {
        (0..n)
            .map(|i| CapturedImage {
                id: ImageId(i),
                image: EncodedImage::from_data_url(format!("data:image/png;base64,{}", i)),
            })
            .collect()
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut preview = RecentPreview::new(&images(3), None);
        preview.prev();
        assert_eq!(preview.position(), 0);
        preview.next();
        preview.next();
        preview.next();
        assert_eq!(preview.position(), 2);
        assert_eq!(preview.current().unwrap().id, ImageId(2));
        assert!(!preview.can_next());
    }

    #[test]
    fn test_limit_takes_most_recent() {
        let preview = RecentPreview::new(&images(5), Some(2));
        assert_eq!(preview.len(), 2);
        assert_eq!(preview.images()[0].id, ImageId(0));

        let preview = RecentPreview::new(&images(1), Some(10));
        assert_eq!(preview.len(), 1);
    }

    #[test]
    fn test_counter_and_navigation_visibility() {
        let empty = RecentPreview::new(&[], None);
        assert!(empty.is_empty());
        assert!(empty.current().is_none());
        assert_eq!(empty.counter_label(), None);

        let single = RecentPreview::new(&images(1), None);
        assert!(!single.shows_navigation());
        assert_eq!(single.counter_label(), None);

        let many = RecentPreview::new(&images(4), None);
        assert!(many.shows_navigation());
        assert_eq!(many.counter_label(), Some("4 photos".to_string()));
    }
}
