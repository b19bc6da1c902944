//! Scripted in-memory backend for dispatcher and handler tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use super::{AttemptOutcome, GenerationBackend, LlmError};

/// Replays queued outcomes in call order and records every attempt.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<AttemptOutcome, LlmError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<AttemptOutcome, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn credentials(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn attempt(&self, credential: &str, prompt: &str) -> Result<AttemptOutcome, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((credential.to_string(), prompt.to_string()));

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(AttemptOutcome::OtherError {
                status: 500,
                body: "script exhausted".to_string(),
            }))
    }
}

/// In-memory sink for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes events on the current thread into this buffer until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
