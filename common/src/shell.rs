//! Top-level UI coordinator.
//!
//! [`AppShell`] is a reducer: each user or platform [`Intent`] mutates the
//! shell and returns the side effects the host must perform. Leaving
//! [`UiMode::CameraOpen`] by any path always yields [`Effect::StopCamera`],
//! and entering it yields [`Effect::StartCamera`].

use crate::camera::CameraFacing;
use crate::config::AppConfig;
use crate::error::CameraError;
use crate::gallery::GalleryStore;
use crate::image::{CapturedImage, EncodedImage, ImageId};
use crate::note::NoteDraft;
use crate::notify::Toast;
use crate::preview::RecentPreview;
use crate::storage::KeyValueStore;
use crate::upload::UploadReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Gallery,
    CameraOpen,
    TextNoteOpen,
    RecentPicsOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ToggleMenu,
    OpenCamera,
    CloseCamera,
    FlipCamera,
    RetryCamera,
    CameraResult(Result<CameraFacing, CameraError>),
    Captured(EncodedImage),
    OpenUpload,
    ImageUploaded(EncodedImage),
    UploadFinished(UploadReport),
    OpenNote,
    EditNote(String),
    SubmitNote,
    CloseNote,
    OpenRecent,
    RecentNext,
    RecentPrev,
    CloseRecent,
    SelectImage(ImageId),
    CloseViewer,
    DeleteSelected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartCamera(CameraFacing),
    SwitchFacing,
    RetryCamera,
    StopCamera,
    OpenFilePicker,
    Notify(Toast),
}

pub struct AppShell<S: KeyValueStore> {
    gallery: GalleryStore<S>,
    mode: UiMode,
    menu_expanded: bool,
    facing: CameraFacing,
    note: NoteDraft,
    notes: Vec<String>,
    recent: Option<RecentPreview>,
    recent_origin: UiMode,
    recent_limit: Option<usize>,
    selected: Option<ImageId>,
}

impl<S: KeyValueStore> AppShell<S> {
    pub fn new(gallery: GalleryStore<S>, config: &AppConfig) -> Self {
        Self {
            gallery,
            mode: UiMode::Gallery,
            menu_expanded: false,
            facing: config.camera.default_facing,
            note: NoteDraft::new(),
            notes: Vec::new(),
            recent: None,
            recent_origin: UiMode::Gallery,
            recent_limit: config.recent_limit,
            selected: None,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn menu_expanded(&self) -> bool {
        self.menu_expanded
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn gallery(&self) -> &GalleryStore<S> {
        &self.gallery
    }

    pub fn note(&self) -> &NoteDraft {
        &self.note
    }

    /// Notes submitted during this session.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn recent(&self) -> Option<&RecentPreview> {
        self.recent.as_ref()
    }

    /// Image shown in the full-screen viewer.
    pub fn selected(&self) -> Option<&CapturedImage> {
        self.selected.and_then(|id| self.gallery.get(id))
    }

    pub fn dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        let mut effects = Vec::new();

        match intent {
            Intent::ToggleMenu => {
                self.menu_expanded = !self.menu_expanded;
            }
            Intent::OpenCamera => {
                self.menu_expanded = false;
                self.selected = None;
                self.set_mode(UiMode::CameraOpen, &mut effects);
            }
            Intent::CloseCamera => {
                if self.mode == UiMode::CameraOpen {
                    self.set_mode(UiMode::Gallery, &mut effects);
                }
            }
            Intent::FlipCamera => {
                if self.mode == UiMode::CameraOpen {
                    effects.push(Effect::SwitchFacing);
                }
            }
            Intent::RetryCamera => {
                if self.mode == UiMode::CameraOpen {
                    effects.push(Effect::RetryCamera);
                }
            }
            Intent::CameraResult(Ok(facing)) => {
                self.facing = facing;
            }
            Intent::CameraResult(Err(error)) => {
                if self.mode == UiMode::CameraOpen && error.is_user_visible() {
                    effects.push(Effect::Notify(Toast::camera_failed(&error)));
                }
            }
            Intent::Captured(image) => {
                self.gallery.add(image);
                self.set_mode(UiMode::Gallery, &mut effects);
                effects.push(Effect::Notify(Toast::photo_captured()));
            }
            Intent::OpenUpload => {
                self.menu_expanded = false;
                effects.push(Effect::OpenFilePicker);
            }
            Intent::ImageUploaded(image) => {
                self.gallery.add(image);
            }
            Intent::UploadFinished(report) => {
                if !report.is_empty() {
                    self.set_mode(UiMode::Gallery, &mut effects);
                    let toast = if report.added > 0 {
                        Toast::images_uploaded(report.added)
                    } else {
                        Toast::nothing_uploaded(report.rejected())
                    };
                    effects.push(Effect::Notify(toast));
                }
            }
            Intent::OpenNote => {
                self.menu_expanded = false;
                self.note.clear();
                self.set_mode(UiMode::TextNoteOpen, &mut effects);
            }
            Intent::EditNote(text) => {
                self.note.set_text(text);
            }
            Intent::SubmitNote => {
                if let Some(note) = self.note.submit() {
                    log::info!("Text note saved: {}", note);
                    self.notes.push(note);
                    self.set_mode(UiMode::Gallery, &mut effects);
                    effects.push(Effect::Notify(Toast::note_saved()));
                }
            }
            Intent::CloseNote => {
                if self.mode == UiMode::TextNoteOpen {
                    self.note.clear();
                    self.set_mode(UiMode::Gallery, &mut effects);
                }
            }
            Intent::OpenRecent => {
                if self.mode != UiMode::RecentPicsOpen {
                    self.recent_origin = self.mode;
                    self.recent = Some(RecentPreview::new(self.gallery.images(), self.recent_limit));
                    self.set_mode(UiMode::RecentPicsOpen, &mut effects);
                }
            }
            Intent::RecentNext => {
                if let Some(recent) = self.recent.as_mut() {
                    recent.next();
                }
            }
            Intent::RecentPrev => {
                if let Some(recent) = self.recent.as_mut() {
                    recent.prev();
                }
            }
            Intent::CloseRecent => {
                if self.mode == UiMode::RecentPicsOpen {
                    self.recent = None;
                    let origin = self.recent_origin;
                    self.set_mode(origin, &mut effects);
                }
            }
            Intent::SelectImage(id) => {
                if self.gallery.get(id).is_some() {
                    self.selected = Some(id);
                }
            }
            Intent::CloseViewer => {
                self.selected = None;
            }
            Intent::DeleteSelected => {
                if let Some(id) = self.selected.take() {
                    if self.gallery.remove_id(id).is_some() {
                        effects.push(Effect::Notify(Toast::image_deleted()));
                    }
                }
            }
        }

        effects
    }

    /// Flush state before the page goes away.
    pub fn shutdown(&mut self) -> Vec<Effect> {
        self.gallery.flush();
        vec![Effect::StopCamera]
    }

    fn set_mode(&mut self, mode: UiMode, effects: &mut Vec<Effect>) {
        if self.mode == mode {
            return;
        }
        if self.mode == UiMode::CameraOpen {
            effects.push(Effect::StopCamera);
        }
        if mode == UiMode::CameraOpen {
            effects.push(Effect::StartCamera(self.facing));
        }
        log::debug!("UI mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }
}
