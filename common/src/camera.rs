//! Camera session lifecycle.
//!
//! A [`MediaSession`] owns at most one live stream handle. Every `open`
//! releases the previous handle before requesting a new one, and `close`
//! releases unconditionally. Each request carries a generation ticket; a
//! result that resolves after the session was closed or re-opened is stopped
//! on arrival instead of being installed.

use futures::future::{self, Either};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CameraConfig;
use crate::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraFacing {
    #[serde(rename = "environment")]
    Environment, // Back camera
    #[serde(rename = "user")]
    User, // Front camera
}

impl CameraFacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraFacing::Environment => "environment",
            CameraFacing::User => "user",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            CameraFacing::Environment => CameraFacing::User,
            CameraFacing::User => CameraFacing::Environment,
        }
    }
}

/// Parameters for a single stream request. Audio is never requested.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub facing: CameraFacing,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub aspect_ratio: f64,
}

impl StreamRequest {
    pub fn new(config: &CameraConfig, facing: CameraFacing) -> Self {
        Self {
            facing,
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
            aspect_ratio: config.aspect_ratio,
        }
    }
}

/// Exclusive handle to camera output.
pub trait StreamHandle: Clone {
    /// Stop every track. Safe to call on an already stopped stream.
    fn stop_tracks(&self);
}

#[allow(async_fn_in_trait)]
pub trait CameraDevice {
    type Stream: StreamHandle;

    async fn acquire(&self, request: &StreamRequest) -> Result<Self::Stream, CameraError>;
}

/// Where the live stream is rendered.
#[allow(async_fn_in_trait)]
pub trait VideoSurface<S> {
    /// Bind the stream and start playback.
    async fn attach(&self, stream: &S) -> Result<(), CameraError>;

    /// Resolves once the surface can render frames.
    async fn ready(&self);

    fn detach(&self);
}

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, ms: u32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Requesting {
        facing: CameraFacing,
    },
    /// `fallback` is set when readiness was assumed after the timeout.
    Live {
        facing: CameraFacing,
        fallback: bool,
    },
    PermissionDenied {
        facing: CameraFacing,
    },
    DeviceError {
        facing: CameraFacing,
        error: CameraError,
    },
}

struct Inner<S: StreamHandle> {
    state: SessionState,
    stream: Option<S>,
    facing: CameraFacing,
    generation: u64,
}

impl<S: StreamHandle> Inner<S> {
    fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(stream) => {
                stream.stop_tracks();
                true
            }
            None => false,
        }
    }
}

impl<S: StreamHandle> Drop for Inner<S> {
    fn drop(&mut self) {
        if self.release() {
            log::info!("Camera stream released on drop");
        }
    }
}

/// Cloning yields another handle onto the same session.
pub struct MediaSession<D, V, T>
where
    D: CameraDevice,
    V: VideoSurface<D::Stream>,
    T: Timer,
{
    device: Rc<D>,
    surface: Rc<V>,
    timer: Rc<T>,
    config: Rc<CameraConfig>,
    inner: Rc<RefCell<Inner<D::Stream>>>,
}

impl<D, V, T> Clone for MediaSession<D, V, T>
where
    D: CameraDevice,
    V: VideoSurface<D::Stream>,
    T: Timer,
{
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
            surface: self.surface.clone(),
            timer: self.timer.clone(),
            config: self.config.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<D, V, T> MediaSession<D, V, T>
where
    D: CameraDevice,
    V: VideoSurface<D::Stream>,
    T: Timer,
{
    pub fn new(device: D, surface: V, timer: T, config: CameraConfig) -> Self {
        let facing = config.default_facing;
        Self {
            device: Rc::new(device),
            surface: Rc::new(surface),
            timer: Rc::new(timer),
            config: Rc::new(config),
            inner: Rc::new(RefCell::new(Inner {
                state: SessionState::Uninitialized,
                stream: None,
                facing,
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.borrow().state.clone()
    }

    /// Side requested most recently.
    pub fn facing(&self) -> CameraFacing {
        self.inner.borrow().facing
    }

    pub fn is_live(&self) -> bool {
        matches!(self.inner.borrow().state, SessionState::Live { .. })
    }

    pub fn holds_stream(&self) -> bool {
        self.inner.borrow().stream.is_some()
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Acquire a stream for `facing`, attach it, and wait for the surface to
    /// become ready (or for the fallback timeout).
    pub async fn open(&self, facing: CameraFacing) -> Result<CameraFacing, CameraError> {
        let (ticket, had_previous) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.facing = facing;
            let had_previous = inner.release();
            inner.state = SessionState::Requesting { facing };
            (inner.generation, had_previous)
        };
        if had_previous {
            self.surface.detach();
            log::info!("Released previous camera stream");
        }

        log::info!("Requesting {} camera", facing.as_str());
        let request = StreamRequest::new(&self.config, facing);
        let stream = match self.device.acquire(&request).await {
            Ok(stream) => stream,
            Err(error) => {
                if !self.is_current(ticket) {
                    return Err(CameraError::Superseded);
                }
                log::warn!("Camera request failed: {}", error);
                self.fail(facing, error.clone());
                return Err(error);
            }
        };

        {
            let mut inner = self.inner.borrow_mut();
            if inner.generation != ticket {
                log::info!("Discarding camera stream that arrived after close");
                stream.stop_tracks();
                return Err(CameraError::Superseded);
            }
            inner.stream = Some(stream.clone());
        }
        log::info!("Camera stream acquired");

        let startup = async {
            self.surface.attach(&stream).await?;
            self.surface.ready().await;
            Ok::<(), CameraError>(())
        };
        let timeout = self.timer.sleep(self.config.ready_timeout_ms);
        futures::pin_mut!(startup, timeout);

        let fallback = match future::select(startup, timeout).await {
            Either::Left((Ok(()), _)) => false,
            Either::Left((Err(error), _)) => {
                let mut inner = self.inner.borrow_mut();
                if inner.generation != ticket {
                    return Err(CameraError::Superseded);
                }
                inner.release();
                drop(inner);
                self.surface.detach();
                log::warn!("Camera preview failed: {}", error);
                self.fail(facing, error.clone());
                return Err(error);
            }
            Either::Right(((), _)) => {
                log::warn!(
                    "No readiness event after {} ms, treating camera as live",
                    self.config.ready_timeout_ms
                );
                true
            }
        };

        let mut inner = self.inner.borrow_mut();
        if inner.generation != ticket {
            return Err(CameraError::Superseded);
        }
        inner.state = SessionState::Live { facing, fallback };
        log::info!("Camera live ({})", facing.as_str());
        Ok(facing)
    }

    /// Re-open on the opposite side. The current stream is stopped first.
    pub async fn switch_facing(&self) -> Result<CameraFacing, CameraError> {
        let next = self.facing().opposite();
        self.open(next).await
    }

    /// Re-open on the side requested last.
    pub async fn retry(&self) -> Result<CameraFacing, CameraError> {
        self.open(self.facing()).await
    }

    /// Stop every track and invalidate in-flight requests. Idempotent.
    pub fn close(&self) {
        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.state = SessionState::Uninitialized;
            inner.release()
        };
        self.surface.detach();
        if released {
            log::info!("Camera stream released");
        }
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.inner.borrow().generation == ticket
    }

    fn fail(&self, facing: CameraFacing, error: CameraError) {
        let state = match error {
            CameraError::PermissionDenied => SessionState::PermissionDenied { facing },
            error => SessionState::DeviceError { facing, error },
        };
        self.inner.borrow_mut().state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Ledger {
        acquired: u32,
        released: u32,
        requests: Vec<CameraFacing>,
    }

    #[derive(Clone)]
    struct FakeStream {
        ledger: Rc<RefCell<Ledger>>,
    }

    impl StreamHandle for FakeStream {
        fn stop_tracks(&self) {
            self.ledger.borrow_mut().released += 1;
        }
    }

    struct FakeDevice {
        ledger: Rc<RefCell<Ledger>>,
        failures: RefCell<VecDeque<CameraError>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeDevice {
        fn new(ledger: Rc<RefCell<Ledger>>) -> Self {
            Self {
                ledger,
                failures: RefCell::new(VecDeque::new()),
                gate: RefCell::new(None),
            }
        }
    }

    impl CameraDevice for FakeDevice {
        type Stream = FakeStream;

        async fn acquire(&self, request: &StreamRequest) -> Result<FakeStream, CameraError> {
            self.ledger.borrow_mut().requests.push(request.facing);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if let Some(error) = self.failures.borrow_mut().pop_front() {
                return Err(error);
            }
            self.ledger.borrow_mut().acquired += 1;
            Ok(FakeStream {
                ledger: self.ledger.clone(),
            })
        }
    }

    #[derive(Default)]
    struct FakeSurface {
        never_ready: bool,
        attach_error: Option<CameraError>,
        detached: Cell<u32>,
    }

    impl VideoSurface<FakeStream> for FakeSurface {
        async fn attach(&self, _stream: &FakeStream) -> Result<(), CameraError> {
            match &self.attach_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }

        async fn ready(&self) {
            if self.never_ready {
                future::pending::<()>().await;
            }
        }

        fn detach(&self) {
            self.detached.set(self.detached.get() + 1);
        }
    }

    struct FakeTimer {
        fires: bool,
    }

    impl Timer for FakeTimer {
        async fn sleep(&self, _ms: u32) {
            if !self.fires {
                future::pending::<()>().await;
            }
        }
    }

    type Session = MediaSession<FakeDevice, FakeSurface, FakeTimer>;

    fn session_with(device: FakeDevice, surface: FakeSurface, fires: bool) -> Session {
        MediaSession::new(device, surface, FakeTimer { fires }, CameraConfig::default())
    }

    fn setup() -> (Session, Rc<RefCell<Ledger>>) {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let session = session_with(FakeDevice::new(ledger.clone()), FakeSurface::default(), false);
        (session, ledger)
    }

    #[test]
    fn test_open_goes_live() {
        let (session, ledger) = setup();
        assert_eq!(session.state(), SessionState::Uninitialized);

        let result = block_on(session.open(CameraFacing::Environment));

        assert_eq!(result, Ok(CameraFacing::Environment));
        assert_eq!(
            session.state(),
            SessionState::Live { facing: CameraFacing::Environment, fallback: false }
        );
        assert_eq!(ledger.borrow().acquired, 1);
        assert_eq!(ledger.borrow().released, 0);
    }

    #[test]
    fn test_switch_facing_never_holds_two_streams() {
        let (session, ledger) = setup();
        block_on(session.open(CameraFacing::Environment)).unwrap();

        for _ in 0..5 {
            block_on(session.switch_facing()).unwrap();
            let ledger = ledger.borrow();
            assert_eq!(ledger.acquired - ledger.released, 1);
        }

        assert_eq!(session.facing(), CameraFacing::User);
        assert_eq!(
            ledger.borrow().requests,
            vec![
                CameraFacing::Environment,
                CameraFacing::User,
                CameraFacing::Environment,
                CameraFacing::User,
                CameraFacing::Environment,
                CameraFacing::User,
            ]
        );
    }

    #[test]
    fn test_permission_denied_then_retry_same_side() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let device = FakeDevice::new(ledger.clone());
        device.failures.borrow_mut().push_back(CameraError::PermissionDenied);
        let session = session_with(device, FakeSurface::default(), false);

        let result = block_on(session.open(CameraFacing::User));
        assert_eq!(result, Err(CameraError::PermissionDenied));
        assert_eq!(session.state(), SessionState::PermissionDenied { facing: CameraFacing::User });
        assert!(!session.holds_stream());

        block_on(session.retry()).unwrap();
        assert_eq!(ledger.borrow().requests, vec![CameraFacing::User, CameraFacing::User]);
        assert!(session.is_live());
    }

    #[test]
    fn test_device_errors_keep_their_class() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let device = FakeDevice::new(ledger);
        device.failures.borrow_mut().push_back(CameraError::DeviceBusy);
        let session = session_with(device, FakeSurface::default(), false);

        let _ = block_on(session.open(CameraFacing::Environment));
        assert_eq!(
            session.state(),
            SessionState::DeviceError {
                facing: CameraFacing::Environment,
                error: CameraError::DeviceBusy
            }
        );
    }

    #[test]
    fn test_close_is_idempotent_and_releases() {
        let (session, ledger) = setup();
        session.close();
        assert_eq!(ledger.borrow().released, 0);

        block_on(session.open(CameraFacing::Environment)).unwrap();
        session.close();
        session.close();

        assert_eq!(ledger.borrow().released, 1);
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(!session.holds_stream());
    }

    #[test]
    fn test_readiness_fallback_goes_live() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let surface = FakeSurface { never_ready: true, ..Default::default() };
        let session = session_with(FakeDevice::new(ledger), surface, true);

        block_on(session.open(CameraFacing::Environment)).unwrap();
        assert_eq!(
            session.state(),
            SessionState::Live { facing: CameraFacing::Environment, fallback: true }
        );
    }

    #[test]
    fn test_playback_failure_releases_stream() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let surface = FakeSurface {
            attach_error: Some(CameraError::VideoPlaybackFailed("autoplay blocked".into())),
            ..Default::default()
        };
        let session = session_with(FakeDevice::new(ledger.clone()), surface, false);

        let result = block_on(session.open(CameraFacing::Environment));
        assert!(matches!(result, Err(CameraError::VideoPlaybackFailed(_))));
        assert_eq!(ledger.borrow().released, 1);
        assert!(!session.holds_stream());
    }

    #[test]
    fn test_stream_arriving_after_close_is_released() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let device = FakeDevice::new(ledger.clone());
        let (release_gate, gate) = oneshot::channel();
        *device.gate.borrow_mut() = Some(gate);
        let session = session_with(device, FakeSurface::default(), false);

        let outcome = Rc::new(RefCell::new(None));
        let mut pool = LocalPool::new();
        {
            let session = session.clone();
            let outcome = outcome.clone();
            pool.spawner()
                .spawn_local(async move {
                    let result = session.open(CameraFacing::Environment).await;
                    *outcome.borrow_mut() = Some(result);
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!(session.state(), SessionState::Requesting { facing: CameraFacing::Environment });

        session.close();
        release_gate.send(()).unwrap();
        pool.run_until_stalled();

        assert_eq!(*outcome.borrow(), Some(Err(CameraError::Superseded)));
        assert_eq!(ledger.borrow().acquired, 1);
        assert_eq!(ledger.borrow().released, 1);
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(!session.holds_stream());
    }

    #[test]
    fn test_dropping_last_handle_releases() {
        let (session, ledger) = setup();
        block_on(session.open(CameraFacing::Environment)).unwrap();
        drop(session);
        assert_eq!(ledger.borrow().released, 1);
    }

    #[test]
    fn test_stream_request_uses_config_hints() {
        let request = StreamRequest::new(&CameraConfig::default(), CameraFacing::User);
        assert_eq!(request.ideal_width, 1920);
        assert_eq!(request.ideal_height, 1080);
        assert!((request.aspect_ratio - 16.0 / 9.0).abs() < 1e-9);
        assert_eq!(request.facing, CameraFacing::User);
    }
}
