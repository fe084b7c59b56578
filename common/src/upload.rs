//! Importing user-selected files into the gallery.
//!
//! All image files of a batch are read concurrently and each one is handed to
//! the caller as soon as its read completes, so the resulting gallery order is
//! completion order, not selection order.

use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::UploadError;
use crate::image::{is_image_mime, EncodedImage};

/// A file picked by the user.
#[allow(async_fn_in_trait)]
pub trait PickedFile {
    fn name(&self) -> String;

    fn mime_type(&self) -> String;

    async fn read_bytes(&self) -> Result<Vec<u8>, UploadError>;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UploadReport {
    pub added: usize,
    /// Names of files skipped because they are not images
    pub skipped: Vec<String>,
    pub failed: Vec<(String, UploadError)>,
}

impl UploadReport {
    /// Files that did not make it into the gallery.
    pub fn rejected(&self) -> usize {
        self.skipped.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.rejected() == 0
    }
}

/// Read every image file in `files` and pass each decoded image to `on_image`
/// as it completes. Failures are isolated per file.
pub async fn ingest<F, C>(files: Vec<F>, mut on_image: C) -> UploadReport
where
    F: PickedFile,
    C: FnMut(EncodedImage),
{
    let mut report = UploadReport::default();
    let mut pending = FuturesUnordered::new();

    for file in files {
        let name = file.name();
        let mime = file.mime_type();
        if !is_image_mime(&mime) {
            log::info!("Skipping non-image file '{}' ({})", name, mime);
            report.skipped.push(name);
            continue;
        }
        pending.push(async move {
            let result = match file.read_bytes().await {
                Ok(bytes) if bytes.is_empty() => Err(UploadError::Empty),
                Ok(bytes) => Ok(EncodedImage::from_bytes(&mime, &bytes)),
                Err(e) => Err(e),
            };
            (name, result)
        });
    }

    while let Some((name, result)) = pending.next().await {
        match result {
            Ok(image) => {
                on_image(image);
                report.added += 1;
            }
            Err(e) => {
                log::warn!("Could not import '{}': {}", name, e);
                report.failed.push((name, e));
            }
        }
    }

    log::info!(
        "Upload finished: {} added, {} skipped, {} failed",
        report.added,
        report.skipped.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeFile {
        name: String,
        mime: String,
        bytes: Result<Vec<u8>, UploadError>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeFile {
        fn new(name: &str, mime: &str, bytes: &[u8]) -> Self {
            Self {
                name: name.to_string(),
                mime: mime.to_string(),
                bytes: Ok(bytes.to_vec()),
                gate: RefCell::new(None),
            }
        }

        fn gated(name: &str) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let file = Self::new(name, "image/png", name.as_bytes());
            *file.gate.borrow_mut() = Some(rx);
            (file, tx)
        }
    }

    impl PickedFile for FakeFile {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn mime_type(&self) -> String {
            self.mime.clone()
        }

        async fn read_bytes(&self) -> Result<Vec<u8>, UploadError> {
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.bytes.clone()
        }
    }

    #[test]
    fn test_non_images_are_skipped() {
        let files = vec![
            FakeFile::new("a.jpg", "image/jpeg", b"a"),
            FakeFile::new("notes.txt", "text/plain", b"hello"),
            FakeFile::new("b.png", "image/png", b"b"),
            FakeFile::new("c.webp", "image/webp", b"c"),
        ];
        let mut added = Vec::new();
        let report = block_on(ingest(files, |image| added.push(image)));

        assert_eq!(report.added, 3);
        assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
        assert!(report.failed.is_empty());

        let mut got: Vec<String> = added.into_iter().map(|i| i.into_string()).collect();
        got.sort();
        let mut want = vec![
            EncodedImage::from_bytes("image/jpeg", b"a").into_string(),
            EncodedImage::from_bytes("image/png", b"b").into_string(),
            EncodedImage::from_bytes("image/webp", b"c").into_string(),
        ];
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn test_failed_read_does_not_abort_batch() {
        let mut broken = FakeFile::new("broken.jpg", "image/jpeg", b"");
        broken.bytes = Err(UploadError::Read("NotReadableError".to_string()));
        let files = vec![
            broken,
            FakeFile::new("empty.png", "image/png", b""),
            FakeFile::new("ok.png", "image/png", b"ok"),
        ];

        let mut added = 0;
        let report = block_on(ingest(files, |_| added += 1));

        assert_eq!(added, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.failed.len(), 2);
        assert!(report
            .failed
            .contains(&("empty.png".to_string(), UploadError::Empty)));
        assert_eq!(report.rejected(), 2);
    }

    #[test]
    fn test_images_arrive_in_completion_order() {
        let (first, first_gate) = FakeFile::gated("first");
        let (second, second_gate) = FakeFile::gated("second");
        let (third, third_gate) = FakeFile::gated("third");

        let arrived = Rc::new(RefCell::new(Vec::new()));
        let report = Rc::new(RefCell::new(None));
        let mut pool = LocalPool::new();
        {
            let arrived = arrived.clone();
            let report = report.clone();
            pool.spawner()
                .spawn_local(async move {
                    let result = ingest(vec![first, second, third], |image| {
                        arrived.borrow_mut().push(image)
                    })
                    .await;
                    *report.borrow_mut() = Some(result);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        third_gate.send(()).unwrap();
        pool.run_until_stalled();
        first_gate.send(()).unwrap();
        pool.run_until_stalled();
        second_gate.send(()).unwrap();
        pool.run_until_stalled();

        let order: Vec<EncodedImage> = arrived.borrow().clone();
        assert_eq!(
            order,
            vec![
                EncodedImage::from_bytes("image/png", b"third"),
                EncodedImage::from_bytes("image/png", b"first"),
                EncodedImage::from_bytes("image/png", b"second"),
            ]
        );
        assert_eq!(report.borrow().as_ref().map(|r| r.added), Some(3));
    }

    #[test]
    fn test_empty_selection() {
        let report = block_on(ingest(Vec::<FakeFile>::new(), |_| {}));
        assert!(report.is_empty());
    }
}
