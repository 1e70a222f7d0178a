// src/engine.rs
use crate::config::ScopeConfig;
use crate::drivers::{
    CapturePipeline, CaptureVariant, DecodedCapture, FrameSource, PollOutcome, TransportError,
};
use crate::owon::OwonSession;
use crate::simulator::SimulatedScope;
use crate::types::*;
use log::{error, info};
use std::sync::mpsc::{Receiver, Sender, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

type BoxedSource = Box<dyn FrameSource + Send>;

const IDLE_SLEEP: Duration = Duration::from_millis(50);

/// Why the poll loop stopped.
#[derive(Debug, Error)]
pub enum EngineStop {
    /// The GUI side hung up; the engine has nobody left to report to.
    #[error("display closed")]
    DisplayClosed,
    /// The instrument connection failed. Ends the whole run.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// `tx_capture` is the bounded hand-off to the renderer: a send only returns
/// once the GUI has taken the frame, so the next trigger waits for it.
pub fn spawn_thread(
    tx: Sender<ScopeMessage>,
    tx_capture: SyncSender<DecodedCapture>,
    rx_cmd: Receiver<GuiCommand>,
    config: ScopeConfig,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = Engine::new(tx, tx_capture, config);
        if engine.emit(ScopeMessage::Log("Engine ready.".to_owned())).is_err() {
            return;
        }
        loop {
            match engine.step(&rx_cmd) {
                Ok(()) => {}
                Err(EngineStop::DisplayClosed) => {
                    info!("display closed, engine stopping");
                    break;
                }
                Err(EngineStop::Transport(err)) => {
                    engine.abort(&err);
                    break;
                }
            }
        }
    })
}

/// Poll loop state. Owns the frame source for the whole session.
pub struct Engine {
    tx: Sender<ScopeMessage>,
    tx_capture: SyncSender<DecodedCapture>,
    config: ScopeConfig,
    mode: ConnectionMode,
    sim_variant: CaptureVariant,
    pipeline: Option<CapturePipeline<BoxedSource>>,
    streaming: bool,
}

impl Engine {
    pub fn new(
        tx: Sender<ScopeMessage>,
        tx_capture: SyncSender<DecodedCapture>,
        config: ScopeConfig,
    ) -> Self {
        let sim_variant = config.simulation_variant.into();
        Self {
            tx,
            tx_capture,
            config,
            mode: ConnectionMode::Simulation,
            sim_variant,
            pipeline: None,
            streaming: false,
        }
    }

    fn emit(&self, msg: ScopeMessage) -> Result<(), EngineStop> {
        self.tx.send(msg).map_err(|_| EngineStop::DisplayClosed)
    }

    fn log(&self, line: String) -> Result<(), EngineStop> {
        info!("{line}");
        self.emit(ScopeMessage::Log(line))
    }

    /// One loop iteration: drain commands, then poll once if streaming.
    pub fn step(&mut self, rx_cmd: &Receiver<GuiCommand>) -> Result<(), EngineStop> {
        // 1. commands
        loop {
            match rx_cmd.try_recv() {
                Ok(cmd) => self.handle(cmd)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(EngineStop::DisplayClosed),
            }
        }
        // 2. capture
        if self.streaming && self.pipeline.is_some() {
            self.poll_once()
        } else {
            thread::sleep(IDLE_SLEEP);
            Ok(())
        }
    }

    /// Releases the connection and tells the GUI to shut the run down.
    pub fn abort(&mut self, err: &TransportError) {
        error!("transport failure, aborting: {err}");
        self.pipeline = None;
        self.streaming = false;
        // The GUI may already be gone; nothing left to do then.
        if self.emit(ScopeMessage::Fatal(err.to_string())).is_err() {
            info!("display already closed");
        }
    }

    pub fn attach(&mut self, source: BoxedSource) {
        self.pipeline = Some(CapturePipeline::new(source));
    }

    fn simulated_source(&self) -> BoxedSource {
        Box::new(
            SimulatedScope::new(self.sim_variant, self.config.read_timeout())
                .with_truncate_chance(self.config.simulation_truncate_chance),
        )
    }

    fn handle(&mut self, cmd: GuiCommand) -> Result<(), EngineStop> {
        match cmd {
            GuiCommand::Connect { mode, host, port } => {
                if self.pipeline.is_some() {
                    return Ok(());
                }
                self.mode = mode;
                match mode {
                    ConnectionMode::Simulation => {
                        let source = self.simulated_source();
                        self.attach(source);
                        self.emit(ScopeMessage::Status(true))?;
                        self.log(format!("✅ Simulator connected ({})", self.sim_variant.label()))?;
                    }
                    ConnectionMode::Hardware => {
                        let session = OwonSession::connect(
                            &host,
                            port,
                            self.config.connect_timeout(),
                            self.config.read_timeout(),
                        )?;
                        self.attach(Box::new(session));
                        self.emit(ScopeMessage::Status(true))?;
                        self.log(format!("✅ Connected to {host}:{port}"))?;
                    }
                }
            }
            GuiCommand::Disconnect => {
                self.pipeline = None;
                self.streaming = false;
                self.emit(ScopeMessage::Streaming(false))?;
                self.emit(ScopeMessage::Status(false))?;
                self.log("Disconnected".to_owned())?;
            }
            GuiCommand::StartStream => {
                if self.pipeline.is_some() {
                    self.streaming = true;
                    self.emit(ScopeMessage::Streaming(true))?;
                    self.log("🌊 Polling started".to_owned())?;
                }
            }
            GuiCommand::StopStream => {
                self.streaming = false;
                self.emit(ScopeMessage::Streaming(false))?;
                self.log("🛑 Polling stopped".to_owned())?;
            }
            GuiCommand::SetSimVariant(variant) => {
                self.sim_variant = variant;
                if self.mode == ConnectionMode::Simulation && self.pipeline.is_some() {
                    let source = self.simulated_source();
                    self.attach(source);
                    self.log(format!("Simulator now sends {}", variant.label()))?;
                }
            }
        }
        Ok(())
    }

    fn poll_once(&mut self) -> Result<(), EngineStop> {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return Ok(());
        };
        let outcome = pipeline.pump_once()?;
        let stats = pipeline.stats().clone();
        match outcome {
            // Blocks until the renderer takes it.
            PollOutcome::Decoded(capture) => self
                .tx_capture
                .send(capture)
                .map_err(|_| EngineStop::DisplayClosed)?,
            PollOutcome::Rejected(err) => {
                self.emit(ScopeMessage::Log(format!("⚠ Frame skipped: {err}")))?
            }
        }
        self.emit(ScopeMessage::Stats(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::source::ManualSource;
    use crate::drivers::CaptureFrame;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{channel, sync_channel};
    use std::sync::Arc;

    fn drain(rx: &Receiver<ScopeMessage>) -> Vec<ScopeMessage> {
        rx.try_iter().collect()
    }

    /// Counts triggers and answers each with a valid 1k frame.
    struct CountingSource {
        triggers: Arc<AtomicUsize>,
    }

    impl FrameSource for CountingSource {
        fn next_frame(&mut self) -> Result<CaptureFrame, TransportError> {
            self.triggers.fetch_add(1, Ordering::SeqCst);
            Ok(CaptureFrame::new(vec![0; 1125]))
        }
    }

    #[test]
    fn polls_skips_bad_frames_and_aborts_on_transport_fault() {
        let (tx, rx) = channel();
        let (tx_capture, rx_capture) = sync_channel(1);
        let (tx_cmd, rx_cmd) = channel();
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        engine.attach(Box::new(ManualSource::new(vec![
            CaptureFrame::new(vec![0; 7]),
            CaptureFrame::new(vec![1; 1125]),
        ])));
        tx_cmd.send(GuiCommand::StartStream).unwrap();

        engine.step(&rx_cmd).unwrap();
        let msgs = drain(&rx);
        assert!(msgs.iter().any(|m| matches!(m, ScopeMessage::Streaming(true))));
        assert!(rx_capture.try_recv().is_err());
        assert!(msgs
            .iter()
            .any(|m| matches!(m, ScopeMessage::Stats(s) if s.frames_rejected == 1)));

        engine.step(&rx_cmd).unwrap();
        let capture = rx_capture.try_recv().unwrap();
        assert_eq!(capture.variant, CaptureVariant::OneChannel1k);

        // Source drained: reported as a closed connection, which ends the run.
        let err = engine.step(&rx_cmd).unwrap_err();
        assert!(matches!(err, EngineStop::Transport(TransportError::Closed)));
        engine.abort(&TransportError::Closed);
        assert!(engine.pipeline.is_none());
        assert!(!engine.streaming);
        assert!(drain(&rx)
            .iter()
            .any(|m| matches!(m, ScopeMessage::Fatal(reason) if reason.contains("closed"))));
    }

    #[test]
    fn next_trigger_waits_for_renderer_to_take_frame() {
        let (tx, _rx) = channel();
        let (tx_capture, rx_capture) = sync_channel(0);
        let (tx_cmd, rx_cmd) = channel();
        let triggers = Arc::new(AtomicUsize::new(0));
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        engine.attach(Box::new(CountingSource {
            triggers: triggers.clone(),
        }));
        tx_cmd.send(GuiCommand::StartStream).unwrap();

        let worker = thread::spawn(move || {
            for _ in 0..2 {
                engine.step(&rx_cmd).unwrap();
            }
        });
        // Nobody renders yet: the engine must sit on the first frame.
        thread::sleep(Duration::from_millis(200));
        assert_eq!(triggers.load(Ordering::SeqCst), 1);

        rx_capture.recv_timeout(Duration::from_secs(5)).unwrap();
        rx_capture.recv_timeout(Duration::from_secs(5)).unwrap();
        worker.join().unwrap();
        assert_eq!(triggers.load(Ordering::SeqCst), 2);
        drop(tx_cmd);
    }

    #[test]
    fn refused_hardware_connect_is_fatal() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let (tx, rx) = channel();
        let (tx_capture, _rx_capture) = sync_channel(0);
        let (tx_cmd, rx_cmd) = channel();
        let handle = spawn_thread(tx, tx_capture, rx_cmd, ScopeConfig::default());
        tx_cmd
            .send(GuiCommand::Connect {
                mode: ConnectionMode::Hardware,
                host: "127.0.0.1".to_owned(),
                port,
            })
            .unwrap();
        let fatal = rx
            .iter()
            .find_map(|m| match m {
                ScopeMessage::Fatal(reason) => Some(reason),
                _ => None,
            })
            .unwrap();
        assert!(fatal.contains(&format!("127.0.0.1:{port}")));
        // The thread ends on its own even though the GUI side is still open.
        handle.join().unwrap();
    }

    #[test]
    fn simulator_connects_and_streams() {
        let (tx, rx) = channel();
        let (tx_capture, rx_capture) = sync_channel(1);
        let (tx_cmd, rx_cmd) = channel();
        let config = ScopeConfig {
            read_timeout_ms: 1,
            ..ScopeConfig::default()
        };
        let mut engine = Engine::new(tx, tx_capture, config);
        tx_cmd
            .send(GuiCommand::Connect {
                mode: ConnectionMode::Simulation,
                host: String::new(),
                port: 0,
            })
            .unwrap();
        tx_cmd
            .send(GuiCommand::SetSimVariant(CaptureVariant::TwoChannel10k))
            .unwrap();
        tx_cmd.send(GuiCommand::StartStream).unwrap();
        engine.step(&rx_cmd).unwrap();
        let msgs = drain(&rx);
        assert!(msgs.iter().any(|m| matches!(m, ScopeMessage::Status(true))));
        let capture = rx_capture.try_recv().unwrap();
        assert_eq!(capture.variant, CaptureVariant::TwoChannel10k);
    }

    #[test]
    fn stream_without_connection_is_ignored() {
        let (tx, rx) = channel();
        let (tx_capture, _rx_capture) = sync_channel(1);
        let (tx_cmd, rx_cmd) = channel();
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        tx_cmd.send(GuiCommand::StartStream).unwrap();
        engine.step(&rx_cmd).unwrap();
        assert!(!engine.streaming);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn closed_display_ends_the_loop() {
        let (tx, rx) = channel();
        let (tx_capture, _rx_capture) = sync_channel(1);
        let (tx_cmd, rx_cmd) = channel();
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        engine.attach(Box::new(ManualSource::new(vec![CaptureFrame::new(vec![0; 1125])])));
        tx_cmd.send(GuiCommand::StartStream).unwrap();
        drop(rx);
        assert!(matches!(engine.step(&rx_cmd), Err(EngineStop::DisplayClosed)));

        // Renderer gone while a frame is waiting to be handed over.
        let (tx, _rx) = channel();
        let (tx_capture, rx_capture) = sync_channel(0);
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        engine.attach(Box::new(ManualSource::new(vec![CaptureFrame::new(vec![0; 1125])])));
        engine.streaming = true;
        drop(rx_capture);
        assert!(matches!(engine.step(&rx_cmd), Err(EngineStop::DisplayClosed)));

        let (tx, _rx) = channel();
        let (tx_capture, _rx_capture) = sync_channel(1);
        let mut engine = Engine::new(tx, tx_capture, ScopeConfig::default());
        drop(tx_cmd);
        assert!(matches!(engine.step(&rx_cmd), Err(EngineStop::DisplayClosed)));
    }
}
