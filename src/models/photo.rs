//! Captured photos and the capture session that owns them.
//!
//! The session replaces ad-hoc global "photos to process" state: it is
//! created when capture completes, carries the batch through mode
//! selection, and is consumed when processing starts or the user
//! discards it.

use uuid::Uuid;

use crate::pipeline::types::ExtractionMode;

/// One photo handed over by the camera collaborator. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    /// Local file URI/path to the JPEG bytes.
    pub uri: String,
    /// Position in the capture order, stable across the whole pipeline.
    pub local_index: usize,
}

impl CapturedPhoto {
    pub fn new(uri: impl Into<String>, local_index: usize) -> Self {
        Self {
            uri: uri.into(),
            local_index,
        }
    }

    /// Filename the backend sees in the multipart upload.
    pub fn upload_filename(&self) -> String {
        format!("photo_{}.jpg", self.local_index)
    }
}

/// Owner of one batch of captured photos, from capture-complete until
/// the batch is processed or discarded.
#[derive(Debug)]
pub struct CaptureSession {
    id: Uuid,
    photos: Vec<CapturedPhoto>,
    mode: Option<ExtractionMode>,
    user_id: Option<String>,
}

impl CaptureSession {
    pub fn new(photos: Vec<CapturedPhoto>, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            photos,
            mode: None,
            user_id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Mode is chosen once per batch and fixed for the processor run.
    pub fn choose_mode(&mut self, mode: ExtractionMode) {
        self.mode = Some(mode);
    }

    pub fn mode(&self) -> Option<ExtractionMode> {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Hand the photos to the batch processor, ending the session.
    pub fn into_photos(self) -> Vec<CapturedPhoto> {
        self.photos
    }

    /// Drop the batch without processing.
    pub fn discard(self) {
        tracing::debug!(session_id = %self.id, photos = self.photos.len(), "capture session discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_filename_uses_local_index() {
        let photo = CapturedPhoto::new("file:///tmp/a.jpg", 3);
        assert_eq!(photo.upload_filename(), "photo_3.jpg");
    }

    #[test]
    fn session_fixes_mode_once_chosen() {
        let mut session = CaptureSession::new(
            vec![CapturedPhoto::new("file:///tmp/a.jpg", 0)],
            Some("u-1".to_string()),
        );
        assert!(session.mode().is_none());

        session.choose_mode(ExtractionMode::Bill);
        assert_eq!(session.mode(), Some(ExtractionMode::Bill));
        assert_eq!(session.user_id(), Some("u-1"));
    }

    #[test]
    fn into_photos_preserves_capture_order() {
        let session = CaptureSession::new(
            vec![
                CapturedPhoto::new("a", 0),
                CapturedPhoto::new("b", 1),
                CapturedPhoto::new("c", 2),
            ],
            None,
        );
        let photos = session.into_photos();
        let indices: Vec<usize> = photos.iter().map(|p| p.local_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
