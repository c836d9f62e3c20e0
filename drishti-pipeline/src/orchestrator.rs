//! Pipeline orchestrator
//!
//! Owns the queues and the event sink, launches the three workers as
//! long-lived tokio tasks, supervises them, and drives cooperative
//! shutdown. State machine: Starting -> Running -> Stopping -> Stopped.

use crate::capture::run_capture_worker;
use crate::config::DrishtiConfig;
use crate::error::PipelineError;
use crate::process::run_process_worker;
use crate::queues::PipelineQueues;
use crate::speech::run_speech_worker;
use drishti_core::{EventSink, PipelineEvent};
use drishti_detect::Detector;
use drishti_eye::{CameraManager, RecordingController, RecordingState};
use drishti_spk::SpeechSynthesizer;
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tracing::{error, info, warn};

const SUPERVISOR_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const SUPERVISOR_MAX_BACKOFF: Duration = Duration::from_secs(30);
/// A worker alive this long resets its restart backoff
const SUPERVISOR_STABLE_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

pub struct Orchestrator {
    config: Arc<DrishtiConfig>,
    camera: Arc<CameraManager>,
    recorder: Arc<RecordingController>,
    detector: Arc<dyn Detector>,
    synthesizer: Arc<SpeechSynthesizer>,
    events: EventSink,
    state: Arc<RwLock<PipelineState>>,
    running: Arc<RwLock<bool>>,
    handles: Mutex<Vec<WorkerHandle>>,
}

/// Handle to one supervised worker.
///
/// The supervisor task and the worker task it currently runs are separate;
/// aborting only the supervisor would orphan the worker, so the handle
/// keeps an [`AbortHandle`] to the live worker task as well.
struct WorkerHandle {
    name: &'static str,
    supervisor: JoinHandle<()>,
    worker: Arc<Mutex<Option<AbortHandle>>>,
}

impl WorkerHandle {
    /// Force-terminate the worker task itself, then its supervisor.
    fn abort(&self) {
        if let Some(worker) = self.worker.lock().take() {
            worker.abort();
        }
        self.supervisor.abort();
    }
}

impl Orchestrator {
    pub fn new(
        config: Arc<DrishtiConfig>,
        camera: Arc<CameraManager>,
        recorder: Arc<RecordingController>,
        detector: Arc<dyn Detector>,
        synthesizer: Arc<SpeechSynthesizer>,
        events: EventSink,
    ) -> Self {
        Self {
            config,
            camera,
            recorder,
            detector,
            synthesizer,
            events,
            state: Arc::new(RwLock::new(PipelineState::Starting)),
            running: Arc::new(RwLock::new(false)),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> PipelineState {
        *self.state.read()
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    /// Initialize the devices and launch the three workers.
    ///
    /// Device initialization failure here is the one fatal error of the
    /// system; every error after this point degrades instead.
    pub async fn start(&self) -> Result<(), PipelineError> {
        {
            let state = self.state.read();
            if *state != PipelineState::Starting {
                return Err(PipelineError::State(format!(
                    "Cannot start pipeline in state {:?}",
                    *state
                )));
            }
        }

        self.camera
            .initialize()
            .await
            .map_err(|e| PipelineError::DeviceInit(format!("camera: {}", e)))?;

        if !self.synthesizer.is_available() {
            return Err(PipelineError::DeviceInit(format!(
                "speech engine '{}' unavailable",
                self.synthesizer.engine_name()
            )));
        }

        *self.running.write() = true;

        let queues = PipelineQueues::new(&self.config.pipeline);
        let supervise = self.config.pipeline.supervise_workers;

        let capture = {
            let camera = self.camera.clone();
            let recorder = self.recorder.clone();
            let frame_tx = queues.frame_tx.clone();
            let events = self.events.clone();
            let config = Arc::new(self.config.pipeline.clone());
            let running = self.running.clone();
            spawn_supervised("capture", self.running.clone(), supervise, move || {
                run_capture_worker(
                    camera.clone(),
                    recorder.clone(),
                    frame_tx.clone(),
                    events.clone(),
                    config.clone(),
                    running.clone(),
                )
            })
        };

        let process = {
            let detector = self.detector.clone();
            let frame_rx = queues.frame_rx.clone();
            let speech_tx = queues.speech_tx.clone();
            let events = self.events.clone();
            let running = self.running.clone();
            spawn_supervised("process", self.running.clone(), supervise, move || {
                run_process_worker(
                    detector.clone(),
                    frame_rx.clone(),
                    speech_tx.clone(),
                    events.clone(),
                    running.clone(),
                )
            })
        };

        let speech = {
            let synthesizer = self.synthesizer.clone();
            let speech_rx = queues.speech_rx.clone();
            let retry = self.config.speech.retry.clone();
            let events = self.events.clone();
            let running = self.running.clone();
            spawn_supervised("speech", self.running.clone(), supervise, move || {
                run_speech_worker(
                    synthesizer.clone(),
                    speech_rx.clone(),
                    retry.clone(),
                    events.clone(),
                    running.clone(),
                )
            })
        };

        *self.handles.lock() = vec![capture, process, speech];
        *self.state.write() = PipelineState::Running;
        info!("Pipeline running");
        Ok(())
    }

    /// Cooperative shutdown: flip the flag every worker checks at its
    /// suspension points, wait out the grace period, then abort stragglers
    /// and release both devices.
    pub async fn shutdown(&self) {
        {
            let mut state = self.state.write();
            match *state {
                PipelineState::Stopping | PipelineState::Stopped => return,
                _ => *state = PipelineState::Stopping,
            }
        }
        info!("Pipeline stopping");

        *self.running.write() = false;

        let handles = std::mem::take(&mut *self.handles.lock());
        let deadline =
            Instant::now() + Duration::from_millis(self.config.pipeline.shutdown_grace_ms);
        for mut handle in handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if tokio::time::timeout(remaining, &mut handle.supervisor)
                .await
                .is_err()
            {
                warn!(
                    "Worker '{}' did not stop within grace period, aborting",
                    handle.name
                );
                handle.abort();
            }
        }

        let was_recording = self.recorder.state() == RecordingState::Recording;
        match self.recorder.stop().await {
            Ok(()) if was_recording => self.events.emit(PipelineEvent::RecordingStopped),
            Ok(()) => {}
            Err(e) => warn!("Failed to finalize session recording: {}", e),
        }
        self.camera.release().await;

        *self.state.write() = PipelineState::Stopped;
        info!("Pipeline stopped");
    }
}

/// Run a worker under supervision: if its task exits or panics while the
/// pipeline is still running, restart it after a backoff that doubles up to
/// a cap and resets once a run stays up long enough.
fn spawn_supervised<F, Fut>(
    name: &'static str,
    running: Arc<RwLock<bool>>,
    supervise: bool,
    factory: F,
) -> WorkerHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let worker = Arc::new(Mutex::new(None::<AbortHandle>));
    let worker_slot = worker.clone();

    let supervisor = tokio::spawn(async move {
        let mut backoff = SUPERVISOR_INITIAL_BACKOFF;
        loop {
            let task = tokio::spawn(factory());
            *worker_slot.lock() = Some(task.abort_handle());
            let started = Instant::now();
            let result = task.await;
            // The backoff sleep below must not count toward stability
            let ran_for = started.elapsed();
            worker_slot.lock().take();

            if !*running.read() {
                break;
            }

            match result {
                Ok(()) => warn!("Worker '{}' exited while pipeline is running", name),
                Err(e) => error!("Worker '{}' crashed: {}", name, e),
            }

            if !supervise {
                break;
            }

            info!(
                "Restarting worker '{}' in {} ms",
                name,
                backoff.as_millis()
            );
            tokio::time::sleep(backoff).await;
            if !*running.read() {
                break;
            }

            backoff = if ran_for >= SUPERVISOR_STABLE_AFTER {
                SUPERVISOR_INITIAL_BACKOFF
            } else {
                (backoff * 2).min(SUPERVISOR_MAX_BACKOFF)
            };
        }
    });

    WorkerHandle {
        name,
        supervisor,
        worker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_supervisor_restarts_a_panicking_worker() {
        let running = Arc::new(RwLock::new(true));
        let runs = Arc::new(AtomicUsize::new(0));

        let runs_factory = runs.clone();
        let running_worker = running.clone();
        let handle = spawn_supervised("test", running.clone(), true, move || {
            let runs = runs_factory.clone();
            let running = running_worker.clone();
            async move {
                let run = runs.fetch_add(1, Ordering::SeqCst);
                if run == 0 {
                    panic!("first run dies");
                }
                // Later runs behave like a worker: wait for shutdown
                while *running.read() {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        });

        // First run panics immediately; the supervisor backs off 1 s and
        // restarts. Paused time makes this instantaneous.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        *running.write() = false;
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.supervisor.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupervised_worker_stays_down() {
        let running = Arc::new(RwLock::new(true));
        let runs = Arc::new(AtomicUsize::new(0));

        let runs_factory = runs.clone();
        let handle = spawn_supervised("test", running.clone(), false, move || {
            let runs = runs_factory.clone();
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        handle.supervisor.await.unwrap();
    }

    #[tokio::test]
    async fn test_supervisor_exits_quietly_on_shutdown() {
        let running = Arc::new(RwLock::new(true));

        let running_worker = running.clone();
        let handle = spawn_supervised("test", running.clone(), true, move || {
            let running = running_worker.clone();
            async move {
                while *running.read() {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        });

        *running.write() = false;
        tokio::time::timeout(Duration::from_secs(1), handle.supervisor)
            .await
            .expect("supervisor should stop promptly")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_terminates_the_running_worker() {
        let running = Arc::new(RwLock::new(true));
        let completed = Arc::new(AtomicBool::new(false));

        let completed_worker = completed.clone();
        let handle = spawn_supervised("test", running.clone(), true, move || {
            let completed = completed_worker.clone();
            async move {
                // Stands in for a worker wedged in a long remote call
                tokio::time::sleep(Duration::from_secs(600)).await;
                completed.store(true, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        *running.write() = false;
        handle.abort();

        // Far past the worker's sleep; an orphaned task would finish it
        tokio::time::sleep(Duration::from_secs(1200)).await;
        assert!(
            !completed.load(Ordering::SeqCst),
            "worker task survived the abort"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_stays_saturated_for_instantly_dying_worker() {
        let running = Arc::new(RwLock::new(true));
        let runs = Arc::new(AtomicUsize::new(0));

        let runs_factory = runs.clone();
        let handle = spawn_supervised("test", running.clone(), true, move || {
            let runs = runs_factory.clone();
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Backoff sequence 1, 2, 4, 8, 16 s, then capped at 30 s. A worker
        // that dies instantly never qualifies as stable, so the cadence must
        // settle at one restart per cap interval: about 14 runs in 300 s.
        // Counting the sleep toward stability would reset the backoff each
        // time it reaches the cap and roughly double that.
        tokio::time::sleep(Duration::from_secs(300)).await;
        let total = runs.load(Ordering::SeqCst);
        assert!(
            (10..=16).contains(&total),
            "expected saturated backoff cadence, got {} runs in 300s",
            total
        );

        *running.write() = false;
        handle.abort();
    }
}
